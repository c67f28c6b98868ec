//! Configuration types for location discovery.

/// Configuration for discovery and expansion.
///
/// # Example
///
/// ```rust
/// use hl7_location_finder::{CountCacheConfig, FinderConfig};
///
/// let config = FinderConfig::builder()
///     .with_count_cache(CountCacheConfig::default())
///     .with_empty_leaves(false)
///     .with_parallel(true)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct FinderConfig {
    /// Record leaves whose text is empty (default: true).
    pub include_empty_leaves: bool,
    /// Discover batches in parallel (requires `parallel` feature).
    pub parallel: bool,
    /// Memoize count queries during expansion (None = no memoization).
    pub count_cache: Option<CountCacheConfig>,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            include_empty_leaves: true,
            parallel: false,
            count_cache: None,
        }
    }
}

impl FinderConfig {
    /// Creates a new builder for FinderConfig.
    pub fn builder() -> FinderConfigBuilder {
        FinderConfigBuilder::default()
    }
}

/// Builder for FinderConfig.
#[derive(Debug, Clone, Default)]
pub struct FinderConfigBuilder {
    config: FinderConfig,
}

impl FinderConfigBuilder {
    /// Records or drops leaves with empty text.
    pub fn with_empty_leaves(mut self, include: bool) -> Self {
        self.config.include_empty_leaves = include;
        self
    }

    /// Enables or disables parallel batch discovery.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Enables count memoization with the given configuration.
    pub fn with_count_cache(mut self, cache: CountCacheConfig) -> Self {
        self.config.count_cache = Some(cache);
        self
    }

    /// Builds the FinderConfig.
    pub fn build(self) -> FinderConfig {
        self.config
    }
}

/// Configuration for the count cache.
#[derive(Debug, Clone)]
pub struct CountCacheConfig {
    /// Maximum number of memoized counts.
    pub max_entries: usize,
}

impl Default for CountCacheConfig {
    fn default() -> Self {
        Self { max_entries: 4_096 }
    }
}
