//! Cache Entry Module
//!
//! Defines one memoized result with its write timestamp and optional TTL.

use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// A stored value and the metadata needed to judge its freshness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The stored value
    pub value: serde_json::Value,
    /// Write timestamp (Unix milliseconds)
    pub timestamp: u64,
    /// TTL in milliseconds the entry was written with, None = no expiration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry written at `timestamp` with no TTL.
    pub fn new(value: serde_json::Value, timestamp: u64) -> Self {
        Self {
            value,
            timestamp,
            ttl: None,
        }
    }

    /// Records the TTL the entry was written with. Zero means no expiration.
    pub fn with_ttl(mut self, ttl_ms: Option<u64>) -> Self {
        self.ttl = ttl_ms.filter(|ttl| *ttl > 0);
        self
    }

    // == Age ==
    /// Milliseconds elapsed since the entry was written. A timestamp in the
    /// future counts as age zero.
    pub fn age_ms(&self, now: u64) -> u64 {
        now.saturating_sub(self.timestamp)
    }

    // == Is Fresh ==
    /// Checks the entry against a caller-supplied TTL.
    ///
    /// # Returns
    /// - `true` if `ttl_ms` is `None` or zero (never expires)
    /// - `true` if the entry is younger than `ttl_ms`
    /// - `false` once the full TTL has elapsed
    pub fn is_fresh(&self, now: u64, ttl_ms: Option<u64>) -> bool {
        match ttl_ms {
            None | Some(0) => true,
            Some(ttl) => self.age_ms(now) < ttl,
        }
    }

    // == Is Expired ==
    /// Checks the entry against the TTL it was written with.
    ///
    /// Entries written without a TTL never expire.
    pub fn is_expired(&self, now: u64) -> bool {
        !self.is_fresh(now, self.ttl)
    }
}
