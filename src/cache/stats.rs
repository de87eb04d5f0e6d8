//! Cache Statistics Module
//!
//! Hit/miss accounting plus eviction and expiration counters.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of cache performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Lookups that found a live entry
    pub hits: u64,
    /// Lookups that found nothing or an expired entry
    pub misses: u64,
    /// Entries removed by the LRU policy
    pub evictions: u64,
    /// Expired entries reclaimed
    pub expirations: u64,
    /// Live entries at snapshot time
    pub size: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Total number of counted lookups.
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    pub fn set_size(&mut self, size: usize) {
        self.size = size;
    }

    // == Reset ==
    /// Zeroes every counter. `size` describes the store, not the history,
    /// and is left alone.
    pub fn reset_counters(&mut self) {
        *self = Self {
            size: self.size,
            ..Self::default()
        };
    }
}
