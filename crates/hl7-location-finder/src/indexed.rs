//! Pre-indexed target message.

use std::collections::HashMap;

use hl7_location::{LocationAddress, MessageNode, SegmentGroupRef};

use crate::config::FinderConfig;
use crate::error::FinderResult;
use crate::finder::LocationFinder;
use crate::result::ValuedLocation;
use crate::traits::MessageQueryable;

type SegmentKey = (Vec<SegmentGroupRef>, String);
type FieldKey = (Vec<SegmentGroupRef>, String, u32, u32);

/// A message tree indexed once so count and value queries are hash lookups.
///
/// Built from a single discovery pass that keeps empty leaves, so empty
/// segments and empty field repetitions still count.
///
/// # Example
///
/// ```ignore
/// use hl7_location_finder::{IndexedMessage, MessageQueryable};
///
/// let message = IndexedMessage::from_tree(&root)?;
/// assert_eq!(message.segment_count(&[], "OBX"), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct IndexedMessage {
    message_type: String,
    locations: Vec<ValuedLocation>,
    segments: HashMap<SegmentKey, usize>,
    fields: HashMap<FieldKey, usize>,
    values: HashMap<LocationAddress, String>,
}

impl IndexedMessage {
    /// Indexes the tree under `root`.
    ///
    /// # Errors
    ///
    /// Propagates the structural errors of discovery.
    pub fn from_tree<N: MessageNode>(root: &N) -> FinderResult<Self> {
        let finder = LocationFinder::with_config(FinderConfig::builder().with_empty_leaves(true).build());
        let discovery = finder.discover(root)?;

        let mut indexed = IndexedMessage {
            message_type: root.name().into_owned(),
            ..Default::default()
        };
        for found in discovery {
            indexed.insert(found);
        }
        Ok(indexed)
    }

    fn insert(&mut self, found: ValuedLocation) {
        let location = &found.location;
        let groups = location.groups().to_vec();
        let segment = location.segment().to_string();

        if let Some(instance) = location.segment_instance().number() {
            let count = self
                .segments
                .entry((groups.clone(), segment.clone()))
                .or_insert(0);
            *count = (*count).max(instance as usize);

            if let (Some(position), Some(field_instance)) = (
                location.field_position(),
                location.field_instance().and_then(|i| i.number()),
            ) {
                let count = self
                    .fields
                    .entry((groups, segment, instance, position))
                    .or_insert(0);
                *count = (*count).max(field_instance as usize);
            }
        }

        self.values
            .entry(location.clone())
            .or_insert_with(|| found.value.clone());
        self.locations.push(found);
    }

    /// Returns the root node name.
    pub fn message_type(&self) -> &str {
        &self.message_type
    }

    /// Returns every discovered location in document order.
    pub fn locations(&self) -> &[ValuedLocation] {
        &self.locations
    }
}

impl MessageQueryable for IndexedMessage {
    fn segment_count(&self, groups: &[SegmentGroupRef], segment: &str) -> usize {
        self.segments
            .get(&(groups.to_vec(), segment.to_string()))
            .copied()
            .unwrap_or(0)
    }

    fn field_count(
        &self,
        groups: &[SegmentGroupRef],
        segment: &str,
        segment_instance: u32,
        field_position: u32,
    ) -> usize {
        self.fields
            .get(&(
                groups.to_vec(),
                segment.to_string(),
                segment_instance,
                field_position,
            ))
            .copied()
            .unwrap_or(0)
    }

    fn get_value(&self, location: &LocationAddress) -> Option<String> {
        self.values.get(location).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expander::WildcardExpander;
    use hl7_location::parse;
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

    fn oru() -> Node {
        node(
            "ORU_R01",
            vec![
                node("MSH", vec![leaf("MSH.1", "|"), leaf("MSH.2", "^~\\&")]),
                node(
                    "ORU_R01.OBSERVATION",
                    vec![
                        node("OBX", vec![leaf("OBX.5", "a"), leaf("OBX.5", "b")]),
                        node("OBX", vec![leaf("OBX.5", "c")]),
                        leaf("OBX", ""),
                    ],
                ),
            ],
        )
    }

    #[test]
    fn test_counts() {
        let root = oru();
        let message = IndexedMessage::from_tree(&&root).unwrap();
        let group = vec![SegmentGroupRef::new("OBSERVATION", 1).unwrap()];

        assert_eq!(message.message_type(), "ORU_R01");
        assert_eq!(message.segment_count(&[], "MSH"), 1);
        assert_eq!(message.segment_count(&group, "OBX"), 3);
        assert_eq!(message.segment_count(&[], "OBX"), 0);
        assert_eq!(message.field_count(&group, "OBX", 1, 5), 2);
        assert_eq!(message.field_count(&group, "OBX", 2, 5), 1);
        assert_eq!(message.field_count(&group, "OBX", 3, 5), 0);
    }

    #[test]
    fn test_get_value() {
        let root = oru();
        let message = IndexedMessage::from_tree(&&root).unwrap();
        assert_eq!(
            message.get_value(&parse("OBSERVATION[1]/OBX[1].5[2]").unwrap()),
            Some("b".to_string())
        );
        assert_eq!(message.get_value(&parse("MSH[1].1[1]").unwrap()), Some("|".to_string()));
        assert_eq!(message.get_value(&parse("MSH[1].3[1]").unwrap()), None);
    }

    #[test]
    fn test_expand_against_indexed_message() {
        let root = oru();
        let message = IndexedMessage::from_tree(&&root).unwrap();
        let expander = WildcardExpander::new(&message);

        let values: Vec<String> = expander
            .resolve_values(&parse("OBSERVATION[1]/OBX[*].5[*]").unwrap())
            .unwrap()
            .into_iter()
            .map(|found| found.value)
            .collect();
        assert_eq!(values, vec!["a", "b", "c"]);
    }
}
