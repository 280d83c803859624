//! Storage Module
//!
//! Durable key-value backends the cache stores write through to.
//!
//! Each backend is byte/text oriented: a cache store hands it one serialized
//! payload per cache id. Retention is the backend's concern; the `session`
//! provider is backed by process memory, the `local` provider by files.

mod file;
mod memory;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

// == Storage Error ==
/// Failures reported by a durable backend.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Filesystem access failed for the given cache id
    #[error("I/O error for '{id}': {source}")]
    Io {
        id: String,
        #[source]
        source: std::io::Error,
    },

    /// Backend is missing or refused the operation
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

// == Durable Store ==
/// Persistent key-value interface consumed by [`crate::cache::CacheStore`].
pub trait DurableStore: Send + Sync + fmt::Debug {
    /// Returns the payload stored under `id`, or `None` if nothing is stored.
    fn read(&self, id: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the payload stored under `id`.
    fn write(&self, id: &str, payload: &str) -> Result<(), StorageError>;

    /// Removes the payload stored under `id`. Deleting a missing id is not an error.
    fn delete(&self, id: &str) -> Result<(), StorageError>;
}

// == Provider ==
/// Storage scope of a cache store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Lives as long as the process
    #[default]
    Session,
    /// Survives restarts
    Local,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Session => "session",
            Provider::Local => "local",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "session" => Ok(Provider::Session),
            "local" => Ok(Provider::Local),
            other => Err(format!("unknown provider '{}'", other)),
        }
    }
}

// == Provider Set ==
/// One durable backend per provider.
#[derive(Debug, Clone)]
pub struct ProviderSet {
    session: Arc<dyn DurableStore>,
    local: Arc<dyn DurableStore>,
}

impl ProviderSet {
    pub fn new(session: Arc<dyn DurableStore>, local: Arc<dyn DurableStore>) -> Self {
        Self { session, local }
    }

    /// Both providers backed by separate in-memory stores.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()))
    }

    /// Session in memory, local on disk under `dir`.
    pub fn with_local_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(FileStore::new(dir)))
    }

    pub fn backend(&self, provider: Provider) -> Arc<dyn DurableStore> {
        match provider {
            Provider::Session => Arc::clone(&self.session),
            Provider::Local => Arc::clone(&self.local),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parse() {
        assert_eq!("session".parse::<Provider>().unwrap(), Provider::Session);
        assert_eq!(" LOCAL ".parse::<Provider>().unwrap(), Provider::Local);
        assert!("cookie".parse::<Provider>().is_err());
    }

    #[test]
    fn test_provider_serde_lowercase() {
        let json = serde_json::to_string(&Provider::Local).unwrap();
        assert_eq!(json, "\"local\"");
        let back: Provider = serde_json::from_str("\"session\"").unwrap();
        assert_eq!(back, Provider::Session);
    }

    #[test]
    fn test_provider_set_backends_are_distinct() {
        let providers = ProviderSet::in_memory();
        providers
            .backend(Provider::Session)
            .write("cache", "payload")
            .unwrap();

        assert_eq!(
            providers.backend(Provider::Session).read("cache").unwrap(),
            Some("payload".to_string())
        );
        assert!(providers.backend(Provider::Local).read("cache").unwrap().is_none());
    }
}
