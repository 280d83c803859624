//! Memoized operation wrappers.
//!
//! [`Memoized`] wraps a synchronous operation and answers synchronously;
//! [`MemoizedAsync`] wraps an operation returning a future and answers with a
//! future. Both consult the shared memoize cache before invoking the
//! operation and store fresh results with the time they were produced.
//!
//! A cache hit skips the operation entirely, side effects included. Only wrap
//! operations whose arguments and results serialize with serde.
//!
//! Two concurrent calls that both miss will both run the operation; the later
//! store wins.

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::{CacheEntry, CacheStore};
use crate::context::MemoContext;
use crate::error::{CacheError, Result};
use crate::memoize::{MemoizeKey, MemoizeOptions};
use crate::storage::Provider;

/// Outcome of the cache consultation that precedes every call.
enum Lookup<T> {
    Hit(T),
    Miss {
        key: MemoizeKey,
        store: Arc<CacheStore>,
    },
}

/// Identity and options of one wrapped operation.
#[derive(Debug, Clone)]
struct MemoSite {
    ctx: MemoContext,
    owner: String,
    operation: String,
    options: MemoizeOptions,
}

impl MemoSite {
    fn provider(&self) -> Provider {
        self.options
            .provider
            .unwrap_or(self.ctx.settings().default_provider)
    }

    fn lookup<A, T>(&self, args: &A) -> Result<Lookup<T>>
    where
        A: Serialize,
        T: DeserializeOwned,
    {
        let key = MemoizeKey::derive(
            &self.owner,
            &self.operation,
            self.options.key.as_deref(),
            args,
        )?;
        let store = self.ctx.memo_store(self.provider());

        let Some(entry) = store.get(key.as_str()) else {
            debug!("Memoize miss: {}", key);
            self.ctx.record(|stats| stats.record_miss());
            return Ok(Lookup::Miss { key, store });
        };

        if !entry.is_fresh(self.ctx.now_ms(), self.options.ttl_ms()) {
            debug!("Memoize entry expired: {}", key);
            store.remove(key.as_str())?;
            self.ctx.record(|stats| stats.record_expiration());
            return Ok(Lookup::Miss { key, store });
        }

        match serde_json::from_value::<T>(entry.value) {
            Ok(value) => {
                debug!("Memoize hit: {}", key);
                self.ctx.record(|stats| stats.record_hit());
                Ok(Lookup::Hit(value))
            }
            Err(e) => {
                warn!("Memoize entry {} no longer matches its result type, recomputing: {}", key, e);
                store.remove(key.as_str())?;
                self.ctx.record(|stats| stats.record_miss());
                Ok(Lookup::Miss { key, store })
            }
        }
    }

    fn store<T>(&self, key: MemoizeKey, store: &CacheStore, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        let entry = CacheEntry::new(serde_json::to_value(value)?, self.ctx.now_ms())
            .with_ttl(self.options.ttl_ms());
        store.put(key.into_string(), entry)
    }
}

// == Memoized ==
/// A synchronous operation with memoized results.
#[derive(Debug, Clone)]
pub struct Memoized<F> {
    site: MemoSite,
    func: F,
}

impl<F> Memoized<F> {
    pub(crate) fn new(
        ctx: MemoContext,
        owner: impl Into<String>,
        operation: impl Into<String>,
        options: MemoizeOptions,
        func: F,
    ) -> Self {
        Self {
            site: MemoSite {
                ctx,
                owner: owner.into(),
                operation: operation.into(),
                options,
            },
            func,
        }
    }

    pub fn options(&self) -> &MemoizeOptions {
        &self.site.options
    }

    /// Returns the cached result for `args`, or runs the operation and caches it.
    ///
    /// Multiple arguments are passed as a tuple.
    pub fn call<A, T>(&self, args: A) -> Result<T>
    where
        F: Fn(A) -> T,
        A: Serialize,
        T: Serialize + DeserializeOwned,
    {
        let (key, store) = match self.site.lookup::<A, T>(&args)? {
            Lookup::Hit(value) => return Ok(value),
            Lookup::Miss { key, store } => (key, store),
        };

        let value = (self.func)(args);
        self.site.store(key, &store, &value)?;
        Ok(value)
    }

    /// Like [`Memoized::call`] for fallible operations. Failures are returned
    /// as [`CacheError::Operation`] and never cached.
    pub fn try_call<A, T, E>(&self, args: A) -> Result<T>
    where
        F: Fn(A) -> std::result::Result<T, E>,
        E: Into<anyhow::Error>,
        A: Serialize,
        T: Serialize + DeserializeOwned,
    {
        let (key, store) = match self.site.lookup::<A, T>(&args)? {
            Lookup::Hit(value) => return Ok(value),
            Lookup::Miss { key, store } => (key, store),
        };

        let value = (self.func)(args).map_err(|e| CacheError::Operation(e.into()))?;
        self.site.store(key, &store, &value)?;
        Ok(value)
    }
}

// == Memoized Async ==
/// An asynchronous operation with memoized results.
#[derive(Debug, Clone)]
pub struct MemoizedAsync<F> {
    site: MemoSite,
    func: F,
}

impl<F> MemoizedAsync<F> {
    pub(crate) fn new(
        ctx: MemoContext,
        owner: impl Into<String>,
        operation: impl Into<String>,
        options: MemoizeOptions,
        func: F,
    ) -> Self {
        Self {
            site: MemoSite {
                ctx,
                owner: owner.into(),
                operation: operation.into(),
                options,
            },
            func,
        }
    }

    pub fn options(&self) -> &MemoizeOptions {
        &self.site.options
    }

    /// Resolves to the cached result for `args`, or awaits the operation and
    /// caches its output.
    pub async fn call<A, T, Fut>(&self, args: A) -> Result<T>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = T>,
        A: Serialize,
        T: Serialize + DeserializeOwned,
    {
        let (key, store) = match self.site.lookup::<A, T>(&args)? {
            Lookup::Hit(value) => return Ok(value),
            Lookup::Miss { key, store } => (key, store),
        };

        let value = (self.func)(args).await;
        self.site.store(key, &store, &value)?;
        Ok(value)
    }

    /// Like [`MemoizedAsync::call`] for fallible operations.
    pub async fn try_call<A, T, E, Fut>(&self, args: A) -> Result<T>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: Into<anyhow::Error>,
        A: Serialize,
        T: Serialize + DeserializeOwned,
    {
        let (key, store) = match self.site.lookup::<A, T>(&args)? {
            Lookup::Hit(value) => return Ok(value),
            Lookup::Miss { key, store } => (key, store),
        };

        let value = (self.func)(args)
            .await
            .map_err(|e| CacheError::Operation(e.into()))?;
        self.site.store(key, &store, &value)?;
        Ok(value)
    }
}
