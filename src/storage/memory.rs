//! In-process durable backend.

use std::collections::HashMap;

use parking_lot::Mutex;

use super::{DurableStore, StorageError};

/// Payloads kept in process memory for the lifetime of the store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ids currently holding a payload.
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}

impl DurableStore for MemoryStore {
    fn read(&self, id: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.lock().get(id).cloned())
    }

    fn write(&self, id: &str, payload: &str) -> Result<(), StorageError> {
        self.items.lock().insert(id.to_string(), payload.to_string());
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.items.lock().remove(id);
        Ok(())
    }
}
