//! Request DTOs for the admin API

use serde::Deserialize;

/// Request body for seeding an entry (PUT /stores/:provider/:id/entries/:key)
#[derive(Debug, Clone, Deserialize)]
pub struct PutEntryRequest {
    /// The value to store
    pub value: serde_json::Value,
    /// Optional TTL in milliseconds, recorded with the entry
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl PutEntryRequest {
    /// Validates the request against the target key.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self, key: &str) -> Option<String> {
        if key.trim().is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if self.value.is_null() {
            return Some("Value cannot be null".to_string());
        }
        None
    }
}
