//! Discovery result types.

use std::time::Duration;

use hl7_location::LocationAddress;

/// A location paired with the leaf text found there in one message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValuedLocation {
    /// Where the value was found.
    pub location: LocationAddress,
    /// The leaf text.
    pub value: String,
}

impl ValuedLocation {
    /// Creates a valued location.
    pub fn new(location: LocationAddress, value: impl Into<String>) -> Self {
        Self {
            location,
            value: value.into(),
        }
    }
}

impl std::fmt::Display for ValuedLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {:?}", self.location, self.value)
    }
}

/// Result of discovering every populated location of a message.
///
/// # Example
///
/// ```ignore
/// let discovery = LocationFinder::new().discover(&root)?;
///
/// println!("Found {} locations", discovery.count());
///
/// for found in discovery.iter() {
///     println!("{}", found);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Discovery {
    /// Locations in document order.
    pub locations: Vec<ValuedLocation>,
    /// Discovery statistics.
    pub stats: DiscoveryStats,
}

impl Discovery {
    /// Creates a new Discovery.
    pub fn new(locations: Vec<ValuedLocation>, stats: DiscoveryStats) -> Self {
        Self { locations, stats }
    }

    /// Returns the number of locations found.
    pub fn count(&self) -> usize {
        self.locations.len()
    }

    /// Returns true if nothing was found.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Returns an iterator over the locations in document order.
    pub fn iter(&self) -> impl Iterator<Item = &ValuedLocation> {
        self.locations.iter()
    }

    /// Returns the first value recorded at `location`.
    pub fn value_at(&self, location: &LocationAddress) -> Option<&str> {
        self.locations
            .iter()
            .find(|found| &found.location == location)
            .map(|found| found.value.as_str())
    }
}

impl IntoIterator for Discovery {
    type Item = ValuedLocation;
    type IntoIter = std::vec::IntoIter<ValuedLocation>;

    fn into_iter(self) -> Self::IntoIter {
        self.locations.into_iter()
    }
}

impl<'a> IntoIterator for &'a Discovery {
    type Item = &'a ValuedLocation;
    type IntoIter = std::slice::Iter<'a, ValuedLocation>;

    fn into_iter(self) -> Self::IntoIter {
        self.locations.iter()
    }
}

/// Statistics from one discovery pass.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryStats {
    /// Total discovery duration.
    pub duration: Duration,
    /// Number of nodes visited.
    pub nodes_visited: usize,
}

impl DiscoveryStats {
    /// Creates new DiscoveryStats.
    pub fn new(duration: Duration, nodes_visited: usize) -> Self {
        Self {
            duration,
            nodes_visited,
        }
    }
}
