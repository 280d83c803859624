//! Response DTOs for the admin API

use serde::Serialize;

use crate::cache::{CacheEntry, CacheStore, MemoStats};
use crate::storage::Provider;

/// One cache entry as shown by the API
#[derive(Debug, Clone, Serialize)]
pub struct EntryView {
    pub key: String,
    pub value: serde_json::Value,
    /// Write timestamp (Unix milliseconds)
    pub timestamp: u64,
    /// TTL in milliseconds, omitted when the entry never expires
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
}

impl EntryView {
    pub fn new(key: impl Into<String>, entry: CacheEntry) -> Self {
        Self {
            key: key.into(),
            value: entry.value,
            timestamp: entry.timestamp,
            ttl: entry.ttl,
        }
    }
}

/// Response body for GET /stores/:provider/:id
#[derive(Debug, Clone, Serialize)]
pub struct StoreResponse {
    pub id: String,
    pub provider: Provider,
    pub size: usize,
    /// Entries in insertion order
    pub entries: Vec<EntryView>,
}

impl StoreResponse {
    pub fn from_store(store: &CacheStore) -> Self {
        let entries: Vec<EntryView> = store
            .entries()
            .into_iter()
            .map(|(key, entry)| EntryView::new(key, entry))
            .collect();

        Self {
            id: store.id().to_string(),
            provider: store.provider(),
            size: entries.len(),
            entries,
        }
    }
}

/// Response body for PUT /stores/:provider/:id/entries/:key
#[derive(Debug, Clone, Serialize)]
pub struct PutResponse {
    /// Success message
    pub message: String,
    /// The key that was stored
    pub key: String,
}

impl PutResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' stored successfully", key),
            key,
        }
    }
}

/// Response body for DELETE /stores/:provider/:id/entries/:key
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: String,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
        }
    }
}

/// Response body for DELETE /stores/:provider/:id
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
    pub id: String,
    pub provider: Provider,
    /// Entries dropped by the clear
    pub removed: usize,
}

impl ClearResponse {
    pub fn new(id: impl Into<String>, provider: Provider, removed: usize) -> Self {
        let id = id.into();
        Self {
            message: format!("Cache '{}' ({}) cleared", id, provider),
            id,
            provider,
            removed,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Memoized calls answered from cache
    pub hits: u64,
    /// Memoized calls with no cached entry
    pub misses: u64,
    /// Memoized calls that found a stale entry
    pub expirations: u64,
    /// hits / all memoized calls
    pub hit_rate: f64,
    /// Cache stores currently open
    pub open_stores: usize,
}

impl StatsResponse {
    pub fn new(stats: &MemoStats, open_stores: usize) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            expirations: stats.expirations,
            hit_rate: stats.hit_rate(),
            open_stores,
        }
    }
}

/// Response body for POST /notify
#[derive(Debug, Clone, Serialize)]
pub struct NotifyResponse {
    /// Listeners the notification reached
    pub listeners: usize,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
