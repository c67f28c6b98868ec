//! Location discovery over message trees.

use std::collections::HashMap;
use std::time::Instant;

use hl7_location::{naming, ElementType, LocationAddress, MessageNode, SegmentGroupRef};
use tracing::debug;

use crate::config::FinderConfig;
use crate::error::{FinderError, FinderResult};
use crate::result::{Discovery, DiscoveryStats, ValuedLocation};

/// Where a node sits while walking: above segment level, or at an address.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Scope {
    /// The message root or a segment group.
    Groups(Vec<SegmentGroupRef>),
    /// A segment, field, component or subcomponent.
    Element(LocationAddress),
}

/// Discovers every populated location of a message tree.
///
/// Nodes are visited depth-first in document order. A node without children
/// is a leaf and yields one [`ValuedLocation`], whatever its depth.
///
/// # Example
///
/// ```ignore
/// use hl7_location_finder::LocationFinder;
///
/// let finder = LocationFinder::new();
/// let discovery = finder.discover(&root)?;
///
/// for found in &discovery {
///     println!("{} = {}", found.location, found.value);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct LocationFinder {
    config: FinderConfig,
}

struct WalkState {
    locations: Vec<ValuedLocation>,
    nodes_visited: usize,
}

impl LocationFinder {
    /// Creates a finder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a finder with custom configuration.
    pub fn with_config(config: FinderConfig) -> Self {
        Self { config }
    }

    /// Returns a reference to the finder configuration.
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Discovers every populated location under `root`.
    ///
    /// # Errors
    ///
    /// [`FinderError::Structural`] when a node name does not match the
    /// pattern expected at its level.
    pub fn discover<N: MessageNode>(&self, root: &N) -> FinderResult<Discovery> {
        let start = Instant::now();
        let mut state = WalkState {
            locations: Vec::new(),
            nodes_visited: 0,
        };

        self.walk(root, &Scope::Groups(Vec::new()), &mut state)?;

        debug!(
            message_type = %root.name(),
            locations = state.locations.len(),
            nodes = state.nodes_visited,
            "discovered message locations"
        );
        Ok(Discovery::new(
            state.locations,
            DiscoveryStats::new(start.elapsed(), state.nodes_visited),
        ))
    }

    /// Discovers several independent messages.
    ///
    /// Runs on the rayon pool when the `parallel` feature is enabled and
    /// [`FinderConfig::parallel`] is set; results keep the input order.
    pub fn discover_many<N>(&self, roots: &[N]) -> Vec<FinderResult<Discovery>>
    where
        N: MessageNode + Sync,
    {
        if self.config.parallel {
            return self.discover_parallel(roots);
        }
        roots.iter().map(|root| self.discover(root)).collect()
    }

    #[cfg(feature = "parallel")]
    fn discover_parallel<N>(&self, roots: &[N]) -> Vec<FinderResult<Discovery>>
    where
        N: MessageNode + Sync,
    {
        use rayon::prelude::*;
        roots.par_iter().map(|root| self.discover(root)).collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn discover_parallel<N>(&self, roots: &[N]) -> Vec<FinderResult<Discovery>>
    where
        N: MessageNode + Sync,
    {
        roots.iter().map(|root| self.discover(root)).collect()
    }

    fn walk<N: MessageNode>(
        &self,
        node: &N,
        scope: &Scope,
        state: &mut WalkState,
    ) -> FinderResult<()> {
        state.nodes_visited += 1;
        let children = node.children();

        if children.is_empty() {
            // Leaves above segment level carry no address.
            if let Scope::Element(location) = scope {
                let text = node.text();
                if self.config.include_empty_leaves || !text.is_empty() {
                    state
                        .locations
                        .push(ValuedLocation::new(location.clone(), text.into_owned()));
                }
            }
            return Ok(());
        }

        let mut seen: HashMap<String, u32> = HashMap::new();
        for child in &children {
            let name = child.name();
            let count = seen.entry(name.to_string()).or_insert(0);
            *count += 1;
            let child_scope =
                derive_child_location(scope, &name, *count).map_err(|message| {
                    FinderError::Structural {
                        tag: name.to_string(),
                        message,
                        position: child.source_position(),
                    }
                })?;
            self.walk(child, &child_scope, state)?;
        }
        Ok(())
    }
}

/// Derives a child's scope from its parent's.
///
/// `instance` is 1 + the number of preceding siblings with the same name
/// under the same parent.
fn derive_child_location(parent: &Scope, name: &str, instance: u32) -> Result<Scope, String> {
    match parent {
        Scope::Groups(groups) => {
            if naming::is_group_name(name) {
                let token = naming::group_token(name)
                    .ok_or_else(|| "malformed segment group name".to_string())?;
                let mut groups = groups.clone();
                groups.push(SegmentGroupRef {
                    name: token.to_string(),
                    instance: instance.into(),
                });
                Ok(Scope::Groups(groups))
            } else {
                let location = LocationAddress::new(name, instance)
                    .map_err(|_| "expected a 3-character segment code or a segment group".to_string())?;
                Ok(Scope::Element(location.with_groups(groups.clone())))
            }
        }
        Scope::Element(location) => match location.element_type() {
            ElementType::Segment => {
                let position = naming::child_position(name, location.segment()).ok_or_else(|| {
                    format!("expected a field named `{}.<position>`", location.segment())
                })?;
                Ok(Scope::Element(location.clone().with_field(position, instance)))
            }
            ElementType::Field => {
                let (_, position) = naming::split_position(name)
                    .ok_or_else(|| "expected a component named `<field>.<position>`".to_string())?;
                Ok(Scope::Element(location.clone().with_component(position)))
            }
            ElementType::Component => {
                let (_, position) = naming::split_position(name).ok_or_else(|| {
                    "expected a subcomponent named `<component>.<position>`".to_string()
                })?;
                Ok(Scope::Element(location.clone().with_subcomponent(position)))
            }
            // Element scopes always hold a segment, so `SegmentGroup` shares
            // the too-deep arm only to keep the match exhaustive.
            ElementType::Subcomponent | ElementType::SegmentGroup => {
                Err("nested deeper than a subcomponent".to_string())
            }
        },
    }
}
