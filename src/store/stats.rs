//! Store Statistics Module
//!
//! Per-store hit/miss/eviction counters, kept for logging and introspection.

use serde::Serialize;

// == Store Stats ==
/// Tracks lookup and eviction activity for a single store.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreStats {
    /// Number of successful lookups
    pub hits: u64,
    /// Number of failed lookups
    pub misses: u64,
    /// Number of entries removed by the eviction manager
    pub evictions: u64,
}

impl StoreStats {
    /// Creates a new StoreStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculates the lookup hit rate, or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Increments the eviction counter.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }
}
