//! Cache Store Module
//!
//! In-memory entry map kept in sync with a durable backend on every mutation.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::cache::{CacheEntry, InsertionOrder};
use crate::error::Result;
use crate::storage::{DurableStore, Provider};

/// Map and key order guarded together so a mutation and its persist are atomic.
#[derive(Debug, Default)]
struct StoreState {
    entries: HashMap<String, CacheEntry>,
    order: InsertionOrder,
}

impl StoreState {
    fn from_pairs(pairs: Vec<(String, CacheEntry)>) -> Self {
        let mut state = Self::default();
        for (key, entry) in pairs {
            state.order.insert(&key);
            state.entries.insert(key, entry);
        }
        state
    }

    fn ordered(&self) -> Vec<(&String, &CacheEntry)> {
        self.order
            .iter()
            .filter_map(|key| self.entries.get(key).map(|entry| (key, entry)))
            .collect()
    }
}

// == Cache Store ==
/// Write-through key-value map for one (id, provider) pair.
///
/// State is loaded from the backend once, in [`CacheStore::open`]. After every
/// `put`, `remove` or `clear` the whole map is written back; an empty map
/// deletes the durable payload instead of writing an empty collection.
#[derive(Debug)]
pub struct CacheStore {
    id: String,
    provider: Provider,
    backend: Arc<dyn DurableStore>,
    state: Mutex<StoreState>,
}

impl CacheStore {
    // == Constructor ==
    /// Opens the store and loads whatever the backend holds for `id`.
    ///
    /// A read failure or an unparseable payload starts the store empty.
    pub fn open(id: impl Into<String>, provider: Provider, backend: Arc<dyn DurableStore>) -> Self {
        let id = id.into();
        let state = load_state(&id, provider, backend.as_ref());

        Self {
            id,
            provider,
            backend,
            state: Mutex::new(state),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    // == Get ==
    /// Looks up `key` without touching the backend.
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        self.state.lock().entries.get(key).cloned()
    }

    // == Put ==
    /// Inserts or replaces the entry for `key`, then persists.
    pub fn put(&self, key: impl Into<String>, entry: CacheEntry) -> Result<()> {
        let key = key.into();
        let mut state = self.state.lock();
        state.order.insert(&key);
        state.entries.insert(key, entry);
        self.persist(&state)
    }

    // == Remove ==
    /// Removes the entry for `key` if present, then persists.
    pub fn remove(&self, key: &str) -> Result<()> {
        let mut state = self.state.lock();
        if state.entries.remove(key).is_some() {
            state.order.remove(key);
        }
        self.persist(&state)
    }

    // == Remove Where ==
    /// Removes every entry matching `pred` and persists once. Nothing is
    /// written when no entry matches.
    ///
    /// Returns the number of entries removed.
    pub fn remove_where<F>(&self, mut pred: F) -> Result<usize>
    where
        F: FnMut(&str, &CacheEntry) -> bool,
    {
        let mut state = self.state.lock();
        let doomed: Vec<String> = state
            .entries
            .iter()
            .filter(|(key, entry)| pred(key.as_str(), *entry))
            .map(|(key, _)| key.clone())
            .collect();

        if doomed.is_empty() {
            return Ok(0);
        }

        for key in &doomed {
            state.entries.remove(key);
            state.order.remove(key);
        }

        self.persist(&state)?;
        Ok(doomed.len())
    }

    // == Clear ==
    /// Empties the store, deleting the durable payload.
    pub fn clear(&self) -> Result<()> {
        let mut state = self.state.lock();
        state.entries.clear();
        state.order.clear();
        self.persist(&state)
    }

    // == Size ==
    pub fn size(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    // == Entries ==
    /// Snapshot of all entries in insertion order.
    pub fn entries(&self) -> Vec<(String, CacheEntry)> {
        let state = self.state.lock();
        state
            .ordered()
            .into_iter()
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect()
    }

    // == Iter ==
    /// Iterates `(key, value)` pairs over a snapshot taken at call time.
    ///
    /// Each call starts a fresh traversal; later mutations are not observed.
    pub fn iter(&self) -> impl Iterator<Item = (String, serde_json::Value)> {
        self.entries()
            .into_iter()
            .map(|(key, entry)| (key, entry.value))
    }

    // == Persist ==
    fn persist(&self, state: &StoreState) -> Result<()> {
        if state.entries.is_empty() {
            self.backend.delete(&self.id)?;
            debug!("Cache '{}' ({}) empty, durable payload deleted", self.id, self.provider);
            return Ok(());
        }

        let payload = serde_json::to_string(&state.ordered())?;
        self.backend.write(&self.id, &payload)?;
        debug!(
            "Cache '{}' ({}) persisted {} entries",
            self.id,
            self.provider,
            state.entries.len()
        );
        Ok(())
    }
}

fn load_state(id: &str, provider: Provider, backend: &dyn DurableStore) -> StoreState {
    let payload = match backend.read(id) {
        Ok(Some(payload)) => payload,
        Ok(None) => return StoreState::default(),
        Err(e) => {
            warn!("Cache '{}' ({}) unreadable, starting empty: {}", id, provider, e);
            return StoreState::default();
        }
    };

    match serde_json::from_str::<Vec<(String, CacheEntry)>>(&payload) {
        Ok(pairs) => {
            debug!("Cache '{}' ({}) loaded {} entries", id, provider, pairs.len());
            StoreState::from_pairs(pairs)
        }
        Err(e) => {
            warn!("Cache '{}' ({}) payload malformed, starting empty: {}", id, provider, e);
            StoreState::default()
        }
    }
}
