//! Wildcard expansion against a target message.

use hl7_location::{Instance, LocationAddress};
use tracing::trace;

use crate::cache::CachedMessage;
use crate::config::FinderConfig;
use crate::error::{FinderError, FinderResult};
use crate::result::ValuedLocation;
use crate::traits::MessageQueryable;

/// Resolves `*` segment and field instances into concrete locations.
///
/// | Template | Expansion |
/// |----------|-----------|
/// | `PID[1].3[1]` | itself |
/// | `OBX[*].5[1]` | `OBX[1..N].5[1]`, N = segment count |
/// | `PID[1].3[*]` | `PID[1].3[1..M]`, M = field count in `PID[1]` |
/// | `OBX[*].5[*]` | segment-major: every field instance of every segment instance |
///
/// A zero count yields an empty list.
///
/// # Example
///
/// ```ignore
/// use hl7_location_finder::{IndexedMessage, WildcardExpander};
///
/// let message = IndexedMessage::from_tree(&root)?;
/// let expander = WildcardExpander::new(&message);
/// let locations = expander.expand(&"OBX[*].5[1]".parse()?)?;
/// ```
pub struct WildcardExpander<'a> {
    target: &'a dyn MessageQueryable,
    cache: Option<CachedMessage<'a>>,
}

impl<'a> WildcardExpander<'a> {
    /// Creates an expander that queries `target` directly.
    pub fn new(target: &'a dyn MessageQueryable) -> Self {
        Self {
            target,
            cache: None,
        }
    }

    /// Creates an expander, memoizing counts when the config asks for it.
    pub fn with_config(target: &'a dyn MessageQueryable, config: &FinderConfig) -> Self {
        let cache = config
            .count_cache
            .as_ref()
            .map(|c| CachedMessage::new(target, c.clone()));
        Self { target, cache }
    }

    /// Returns the count cache if enabled.
    pub fn cache(&self) -> Option<&CachedMessage<'a>> {
        self.cache.as_ref()
    }

    fn queries(&self) -> &dyn MessageQueryable {
        match &self.cache {
            Some(cache) => cache,
            None => self.target,
        }
    }

    /// Expands one template.
    ///
    /// # Errors
    ///
    /// [`FinderError::UnsupportedWildcard`] when a segment group instance is `*`.
    pub fn expand(&self, template: &LocationAddress) -> FinderResult<Vec<LocationAddress>> {
        if template.groups().iter().any(|g| g.instance.is_wildcard()) {
            return Err(FinderError::UnsupportedWildcard {
                location: template.to_compact_form(),
            });
        }

        let target = self.queries();
        let groups = template.groups();
        let segment = template.segment();
        let wildcard_field = template
            .field()
            .filter(|f| f.instance.is_wildcard())
            .map(|f| f.position);

        let expanded: Vec<LocationAddress> = match (template.segment_instance(), wildcard_field) {
            (Instance::Number(_), None) => vec![template.clone()],
            (Instance::Wildcard, None) => instances(target.segment_count(groups, segment))
                .map(|s| template.clone().with_segment_instance(s))
                .collect(),
            (Instance::Number(s), Some(position)) => {
                instances(target.field_count(groups, segment, s, position))
                    .map(|f| template.clone().with_field_instance(f))
                    .collect()
            }
            (Instance::Wildcard, Some(position)) => {
                let mut expanded = Vec::new();
                for s in instances(target.segment_count(groups, segment)) {
                    for f in instances(target.field_count(groups, segment, s, position)) {
                        expanded.push(
                            template
                                .clone()
                                .with_segment_instance(s)
                                .with_field_instance(f),
                        );
                    }
                }
                expanded
            }
        };

        trace!(template = %template, count = expanded.len(), "expanded location");
        Ok(expanded)
    }

    /// Expands several templates, concatenating the results in template order.
    pub fn expand_all(&self, templates: &[LocationAddress]) -> FinderResult<Vec<LocationAddress>> {
        let mut expanded = Vec::new();
        for template in templates {
            expanded.extend(self.expand(template)?);
        }
        Ok(expanded)
    }

    /// Expands a template and pairs each populated location with its value.
    ///
    /// Locations the target has no value for are skipped.
    pub fn resolve_values(&self, template: &LocationAddress) -> FinderResult<Vec<ValuedLocation>> {
        let target = self.queries();
        Ok(self
            .expand(template)?
            .into_iter()
            .filter_map(|location| {
                let value = target.get_value(&location)?;
                Some(ValuedLocation::new(location, value))
            })
            .collect())
    }
}

fn instances(count: usize) -> impl Iterator<Item = u32> {
    1..=u32::try_from(count).unwrap_or(u32::MAX)
}
