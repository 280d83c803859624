//! Memoization Statistics Module
//!
//! Tracks how memoized calls were served.

use serde::Serialize;

// == Memo Stats ==
#[derive(Debug, Clone, Default, Serialize)]
pub struct MemoStats {
    /// Calls answered from the cache
    pub hits: u64,
    /// Calls with no cached entry
    pub misses: u64,
    /// Calls that found a stale entry and evicted it
    pub expirations: u64,
}

impl MemoStats {
    // == Constructor ==
    /// Creates a new MemoStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses + expirations), or 0.0 before any call.
    pub fn hit_rate(&self) -> f64 {
        let total = self.calls();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Total memoized calls observed.
    pub fn calls(&self) -> u64 {
        self.hits + self.misses + self.expirations
    }

    // == Recorders ==
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }
}
