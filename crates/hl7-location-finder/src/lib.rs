//! # hl7-location-finder
//!
//! Location discovery and wildcard expansion for HL7 v2 messages.
//!
//! This crate walks any tree implementing [`MessageNode`] and reports every
//! populated [`LocationAddress`] with its text, and resolves wildcard
//! addresses such as `OBX[*].5[1]` against a concrete message.
//!
//! ## Key Features
//!
//! - **Format independent** - the walker only needs [`MessageNode`], so the
//!   same discovery runs over markup trees and parsed wire messages
//! - **Deterministic order** - document order for discovery, segment-major
//!   order for expansion
//! - **Memoized counts** - [`CachedMessage`] puts an LRU cache in front of
//!   slow message layers
//! - **Optional parallelism** - enable the `parallel` feature to discover
//!   batches of messages on the rayon pool
//!
//! ## Quick Start
//!
//! ```ignore
//! use hl7_location_finder::{IndexedMessage, LocationFinder, WildcardExpander};
//!
//! // Every populated location, in document order
//! let discovery = LocationFinder::new().discover(&root)?;
//! for found in &discovery {
//!     println!("{}", found);
//! }
//!
//! // Resolve a wildcard template against the same message
//! let message = IndexedMessage::from_tree(&root)?;
//! let expander = WildcardExpander::new(&message);
//! let results = expander.resolve_values(&"OBX[*].5[1]".parse()?)?;
//! ```
//!
//! ## With Configuration
//!
//! ```ignore
//! use hl7_location_finder::{CountCacheConfig, FinderConfig, WildcardExpander};
//!
//! let config = FinderConfig::builder()
//!     .with_count_cache(CountCacheConfig { max_entries: 1_024 })
//!     .with_empty_leaves(false)
//!     .build();
//!
//! let expander = WildcardExpander::with_config(&message, &config);
//! ```
//!
//! ## Wildcard Expansion
//!
//! | Template | Result |
//! |----------|--------|
//! | `PID[1].3[1]` | unchanged |
//! | `OBX[*]` | one address per `OBX` |
//! | `PID[1].3[*]` | one address per repetition of `PID-3` |
//! | `OBX[*].5[*]` | every repetition of every `OBX`, segment-major |
//! | `GROUP[*]/...` | [`FinderError::UnsupportedWildcard`] |
//!
//! ## Feature Flags
//!
//! - `parallel` - Enables parallel batch discovery using rayon
//! - `serde` - Serialize/deserialize valued locations

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod cache;
mod config;
mod error;
mod expander;
mod finder;
mod indexed;
mod result;
mod structural;
mod traits;

// Public re-exports
pub use cache::{CacheStats, CachedMessage};
pub use config::{CountCacheConfig, FinderConfig, FinderConfigBuilder};
pub use error::{FinderError, FinderResult};
pub use expander::WildcardExpander;
pub use finder::LocationFinder;
pub use indexed::IndexedMessage;
pub use result::{Discovery, DiscoveryStats, ValuedLocation};
pub use structural::resolve_structural;
pub use traits::MessageQueryable;

// Re-export commonly used types from dependencies for convenience
pub use hl7_location::{ElementType, Instance, LocationAddress, MessageNode};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_accessible() {
        let _: Option<FinderConfig> = None;
        let _: Option<CountCacheConfig> = None;
        let _: Option<Discovery> = None;
        let _: Option<DiscoveryStats> = None;
        let _: Option<FinderResult<()>> = None;
    }

    #[test]
    fn test_re_exports() {
        let location: LocationAddress = "OBX[*].5[1]".parse().unwrap();
        assert_eq!(location.element_type(), ElementType::Field);
        assert_eq!(location.segment_instance(), Instance::Wildcard);
    }
}
