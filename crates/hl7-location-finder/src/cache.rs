//! Memoized count queries.
//!
//! Wraps any [`MessageQueryable`] so repeated count queries made while
//! expanding many templates are answered from an LRU cache.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use hl7_location::{LocationAddress, SegmentGroupRef};
use lru::LruCache;

use crate::config::CountCacheConfig;
use crate::traits::MessageQueryable;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CountKey {
    Segment {
        groups: Vec<SegmentGroupRef>,
        segment: String,
    },
    Field {
        groups: Vec<SegmentGroupRef>,
        segment: String,
        segment_instance: u32,
        field_position: u32,
    },
}

/// A target message whose count answers are memoized.
///
/// Thread-safe: the cache sits behind a `Mutex`, so a `CachedMessage` can be
/// shared by expanders on several threads.
///
/// # Example
///
/// ```ignore
/// use hl7_location_finder::{CachedMessage, CountCacheConfig, WildcardExpander};
///
/// let cached = CachedMessage::new(&message, CountCacheConfig::default());
/// let expander = WildcardExpander::new(&cached);
/// for template in templates {
///     expander.expand(&template)?;
/// }
/// println!("hit rate: {:.2}", cached.stats().hit_rate());
/// ```
pub struct CachedMessage<'a> {
    inner: &'a dyn MessageQueryable,
    counts: Mutex<LruCache<CountKey, usize>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl<'a> CachedMessage<'a> {
    /// Wraps `inner` with a count cache.
    pub fn new(inner: &'a dyn MessageQueryable, config: CountCacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            counts: Mutex::new(LruCache::new(capacity)),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    fn cached_count(&self, key: CountKey, compute: impl FnOnce() -> usize) -> usize {
        if let Ok(mut counts) = self.counts.lock() {
            if let Some(count) = counts.get(&key) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return *count;
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let count = compute();
        if let Ok(mut counts) = self.counts.lock() {
            counts.put(key, count);
        }
        count
    }

    /// Clears all memoized counts.
    pub fn clear(&self) {
        if let Ok(mut counts) = self.counts.lock() {
            counts.clear();
        }
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        let entries = match self.counts.lock() {
            Ok(counts) => counts.len(),
            _ => 0,
        };
        CacheStats {
            entries,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl MessageQueryable for CachedMessage<'_> {
    fn segment_count(&self, groups: &[SegmentGroupRef], segment: &str) -> usize {
        let key = CountKey::Segment {
            groups: groups.to_vec(),
            segment: segment.to_string(),
        };
        self.cached_count(key, || self.inner.segment_count(groups, segment))
    }

    fn field_count(
        &self,
        groups: &[SegmentGroupRef],
        segment: &str,
        segment_instance: u32,
        field_position: u32,
    ) -> usize {
        let key = CountKey::Field {
            groups: groups.to_vec(),
            segment: segment.to_string(),
            segment_instance,
            field_position,
        };
        self.cached_count(key, || {
            self.inner
                .field_count(groups, segment, segment_instance, field_position)
        })
    }

    fn get_value(&self, location: &LocationAddress) -> Option<String> {
        self.inner.get_value(location)
    }
}

impl std::fmt::Debug for CachedMessage<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stats = self.stats();
        f.debug_struct("CachedMessage")
            .field("entries", &stats.entries)
            .field("hits", &stats.hits)
            .field("misses", &stats.misses)
            .finish()
    }
}

/// Statistics about the count cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of memoized counts.
    pub entries: usize,
    /// Queries answered from the cache.
    pub hits: usize,
    /// Queries forwarded to the message.
    pub misses: usize,
}

impl CacheStats {
    /// Fraction of queries answered from the cache.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
