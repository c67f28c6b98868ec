//! Structural-form resolution against message trees.

use hl7_location::{naming, parse_structural, Instance, MessageNode};
use tracing::trace;

use crate::error::{FinderError, FinderResult};

/// Evaluates a structural path against `root` and returns the text of the
/// single node it selects.
///
/// The leading `/*` selects the root. Each further step keeps the children of
/// the current nodes whose name matches; an index predicate keeps only the
/// nth match under each parent, a step without one keeps every match.
///
/// # Errors
///
/// - [`FinderError::Location`] if `path` is not a structural path.
/// - [`FinderError::Data`] if the path selects zero or several nodes.
///
/// # Example
///
/// ```ignore
/// use hl7_location_finder::resolve_structural;
///
/// let id = resolve_structural(&root, "/*/PID[1]/PID.3[1]/PID.3.1")?;
/// ```
pub fn resolve_structural<N: MessageNode>(root: &N, path: &str) -> FinderResult<String> {
    let location = parse_structural(path)?;

    let segment = location.segment();
    let mut steps: Vec<(Step, Instance)> = location
        .groups()
        .iter()
        .map(|group| (Step::Group(group.name.clone()), group.instance))
        .collect();
    steps.push((Step::Exact(segment.to_string()), location.segment_instance()));

    if let Some(field) = location.field() {
        let field_name = naming::child_name(segment, field.position);
        steps.push((Step::Exact(field_name.clone()), field.instance));

        if let Some(component) = &field.component {
            let component_name = naming::child_name(&field_name, component.position);
            steps.push((Step::Exact(component_name.clone()), Instance::Wildcard));

            if let Some(subcomponent) = component.subcomponent {
                let subcomponent_name = naming::child_name(&component_name, subcomponent);
                steps.push((Step::Exact(subcomponent_name), Instance::Wildcard));
            }
        }
    }

    let mut steps = steps.into_iter();
    let mut selected = match steps.next() {
        Some((step, instance)) => select(root.children(), &step, instance),
        None => Vec::new(),
    };
    for (step, instance) in steps {
        selected = selected
            .iter()
            .flat_map(|node| select(node.children(), &step, instance))
            .collect();
    }

    trace!(path, matches = selected.len(), "resolved structural path");
    match selected.len() {
        1 => Ok(selected.remove(0).text().into_owned()),
        matches => Err(FinderError::Data {
            path: path.to_string(),
            matches,
        }),
    }
}

/// Name test of one path step.
enum Step {
    /// `*[ends-with(name(),'.GROUP')]`
    Group(String),
    /// A literal element name.
    Exact(String),
}

impl Step {
    fn accepts(&self, name: &str) -> bool {
        match self {
            Step::Group(token) => {
                naming::is_group_name(name) && naming::group_token(name) == Some(token.as_str())
            }
            Step::Exact(expected) => name == expected,
        }
    }
}

/// Keeps the siblings the step accepts, then only the nth of them when the
/// instance is a number.
fn select<N: MessageNode>(siblings: Vec<N>, step: &Step, instance: Instance) -> Vec<N> {
    let matching = siblings.into_iter().filter(|node| step.accepts(&node.name()));
    match instance {
        Instance::Wildcard => matching.collect(),
        Instance::Number(n) => matching.skip(n.saturating_sub(1) as usize).take(1).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hl7_location::{ErrorKind, LocationAddress};
    use std::borrow::Cow;

    struct Node {
        name: &'static str,
        text: &'static str,
        children: Vec<Node>,
    }

    fn node(name: &'static str, children: Vec<Node>) -> Node {
        Node {
            name,
            text: "",
            children,
        }
    }

    fn leaf(name: &'static str, text: &'static str) -> Node {
        Node {
            name,
            text,
            children: Vec::new(),
        }
    }

    impl<'a> MessageNode for &'a Node {
        fn name(&self) -> Cow<'_, str> {
            Cow::Borrowed(self.name)
        }

        fn children(&self) -> Vec<Self> {
            let node: &'a Node = self;
            node.children.iter().collect()
        }

        fn text(&self) -> Cow<'_, str> {
            Cow::Borrowed(self.text)
        }
    }

    fn adt() -> Node {
        node(
            "ADT_A01",
            vec![
                node(
                    "PID",
                    vec![
                        node("PID.3", vec![leaf("PID.3.1", "A1"), node("PID.3.4", vec![leaf("PID.3.4.2", "1.2.3")])]),
                        node("PID.3", vec![leaf("PID.3.1", "A2")]),
                    ],
                ),
                node(
                    "ADT_A01.INSURANCE",
                    vec![node("IN1", vec![leaf("IN1.2", "PLAN-1")])],
                ),
                node(
                    "ADT_A01.INSURANCE",
                    vec![node("IN1", vec![leaf("IN1.2", "PLAN-2")])],
                ),
            ],
        )
    }

    fn resolve(path: &str) -> FinderResult<String> {
        let root = adt();
        resolve_structural(&&root, path)
    }

    #[test]
    fn test_resolve_component() {
        assert_eq!(resolve("/*/PID[1]/PID.3[2]/PID.3.1").unwrap(), "A2");
    }

    #[test]
    fn test_resolve_subcomponent() {
        assert_eq!(resolve("/*/PID[1]/PID.3[1]/PID.3.4/PID.3.4.2").unwrap(), "1.2.3");
    }

    #[test]
    fn test_resolve_inside_group_instance() {
        assert_eq!(
            resolve("/*/*[ends-with(name(),'.INSURANCE')][2]/IN1[1]/IN1.2[1]").unwrap(),
            "PLAN-2"
        );
    }

    #[test]
    fn test_round_trips_through_structural_form() {
        let location: LocationAddress = "INSURANCE[1]/IN1[1].2[1]".parse().unwrap();
        let root = adt();
        let value = resolve_structural(&&root, &location.to_structural_form()).unwrap();
        assert_eq!(value, "PLAN-1");
    }

    #[test]
    fn test_no_match_is_data_error() {
        let err = resolve("/*/PID[1]/PID.5[1]").unwrap_err();
        assert_eq!(err, FinderError::Data { path: "/*/PID[1]/PID.5[1]".to_string(), matches: 0 });
        assert_eq!(err.kind(), ErrorKind::Data);
    }

    #[test]
    fn test_wildcard_matching_several_is_data_error() {
        let err = resolve("/*/PID[1]/PID.3/PID.3.1").unwrap_err();
        assert!(matches!(err, FinderError::Data { matches: 2, .. }));
    }

    #[test]
    fn test_compact_form_is_syntax_error() {
        let err = resolve("PID[1].3[1]").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
    }
}
