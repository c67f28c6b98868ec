//! Message services consumed by wildcard expansion.
//!
//! This module defines the [`MessageQueryable`] trait that a target message
//! implements so wildcard locations can be resolved against it.
//!
//! [`IndexedMessage`](crate::IndexedMessage) implements it for any tree that
//! implements [`MessageNode`](hl7_location::MessageNode). Other message layers
//! can implement it directly:
//!
//! ```ignore
//! use hl7_location::{LocationAddress, SegmentGroupRef};
//! use hl7_location_finder::MessageQueryable;
//!
//! impl MessageQueryable for MyMessage {
//!     fn segment_count(&self, groups: &[SegmentGroupRef], segment: &str) -> usize {
//!         self.segments_under(groups).filter(|s| s.code() == segment).count()
//!     }
//!
//!     fn field_count(
//!         &self,
//!         groups: &[SegmentGroupRef],
//!         segment: &str,
//!         segment_instance: u32,
//!         field_position: u32,
//!     ) -> usize {
//!         self.segment(groups, segment, segment_instance)
//!             .map_or(0, |s| s.repetitions(field_position))
//!     }
//!
//!     fn get_value(&self, location: &LocationAddress) -> Option<String> {
//!         self.lookup(location)
//!     }
//! }
//! ```

use hl7_location::{LocationAddress, SegmentGroupRef};

/// Count and value queries answered by a concrete message.
///
/// Counts are scoped to a segment group path; an empty `groups` slice means
/// segments directly under the message root. Implementations should answer
/// counts in O(1) or O(log n); wrap slower ones in
/// [`CachedMessage`](crate::CachedMessage).
pub trait MessageQueryable: Send + Sync {
    /// Number of `segment` instances under the group path.
    ///
    /// Returns 0 if there are none.
    fn segment_count(&self, groups: &[SegmentGroupRef], segment: &str) -> usize;

    /// Number of repetitions of a field in one segment instance.
    ///
    /// Returns 0 if the segment or field is absent.
    fn field_count(
        &self,
        groups: &[SegmentGroupRef],
        segment: &str,
        segment_instance: u32,
        field_position: u32,
    ) -> usize;

    /// Leaf text at a concrete location.
    fn get_value(&self, location: &LocationAddress) -> Option<String>;
}
