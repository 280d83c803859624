//! Cache Registry Module
//!
//! Owns every live cache store, one per (id, provider) pair.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

use crate::cache::CacheStore;
use crate::storage::{Provider, ProviderSet};

// == Cache Registry ==
/// Registry handing out a single shared [`CacheStore`] per (id, provider).
///
/// The registry lives in the application context rather than in a global, so
/// tests can build a fresh one each.
#[derive(Debug)]
pub struct CacheRegistry {
    providers: ProviderSet,
    stores: Mutex<HashMap<(String, Provider), Arc<CacheStore>>>,
}

impl CacheRegistry {
    pub fn new(providers: ProviderSet) -> Self {
        Self {
            providers,
            stores: Mutex::new(HashMap::new()),
        }
    }

    // == Get Instance ==
    /// Returns the store for `(id, provider)`, opening and loading it on first use.
    pub fn get_instance(&self, id: &str, provider: Provider) -> Arc<CacheStore> {
        let mut stores = self.stores.lock();
        let key = (id.to_string(), provider);

        if let Some(store) = stores.get(&key) {
            return Arc::clone(store);
        }

        let store = Arc::new(CacheStore::open(id, provider, self.providers.backend(provider)));
        info!(
            "Opened cache '{}' ({}) with {} entries",
            id,
            provider,
            store.size()
        );
        stores.insert(key, Arc::clone(&store));
        store
    }

    /// Returns the store for `(id, provider)` only if it is already open.
    pub fn lookup(&self, id: &str, provider: Provider) -> Option<Arc<CacheStore>> {
        self.stores.lock().get(&(id.to_string(), provider)).cloned()
    }

    /// Returns the open store for `(id, provider)`, or a transient one loaded
    /// from the backend that is not registered. For read-only access.
    pub fn peek(&self, id: &str, provider: Provider) -> Arc<CacheStore> {
        self.lookup(id, provider).unwrap_or_else(|| {
            Arc::new(CacheStore::open(id, provider, self.providers.backend(provider)))
        })
    }

    // == Stores ==
    /// All open stores, ordered by provider then id.
    pub fn stores(&self) -> Vec<Arc<CacheStore>> {
        let mut stores: Vec<Arc<CacheStore>> = self.stores.lock().values().cloned().collect();
        stores.sort_by(|a, b| {
            (a.provider().as_str(), a.id()).cmp(&(b.provider().as_str(), b.id()))
        });
        stores
    }

    pub fn len(&self) -> usize {
        self.stores.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.lock().is_empty()
    }
}
