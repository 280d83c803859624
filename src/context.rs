//! Application Context Module
//!
//! Bundles the state every memoized operation shares: the cache registry,
//! the clock, the notification channel and call statistics.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cache::{CacheRegistry, CacheStore, MemoStats, MEMOIZE_CACHE};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::memoize::{Memoized, MemoizedAsync, MemoizeOptions};
use crate::storage::{Provider, ProviderSet};
use crate::tasks::{spawn_sweeper, Notifier, SweepPolicy};

// == Settings ==
/// Context-wide memoization settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoSettings {
    /// Cache id memoized results are stored under
    pub cache_name: String,
    /// Provider used when options do not name one
    pub default_provider: Provider,
    /// Eviction rule applied when the notification channel fires
    pub sweep_policy: SweepPolicy,
}

impl Default for MemoSettings {
    fn default() -> Self {
        Self {
            cache_name: MEMOIZE_CACHE.to_string(),
            default_provider: Provider::Session,
            sweep_policy: SweepPolicy::Expired,
        }
    }
}

impl From<&Config> for MemoSettings {
    fn from(config: &Config) -> Self {
        Self {
            cache_name: config.cache_name.clone(),
            default_provider: config.default_provider,
            sweep_policy: config.sweep_policy,
        }
    }
}

#[derive(Debug)]
struct ContextInner {
    registry: CacheRegistry,
    clock: Arc<dyn Clock>,
    notifier: Notifier,
    stats: Mutex<MemoStats>,
    settings: MemoSettings,
    sweeper_installed: AtomicBool,
}

// == Memo Context ==
/// Shared handle to the application-lifetime memoization state.
///
/// Cloning is cheap; clones share the same registry and statistics.
#[derive(Debug, Clone)]
pub struct MemoContext {
    inner: Arc<ContextInner>,
}

/// Non-owning handle to a [`MemoContext`], held by background tasks so they
/// do not keep the context alive.
#[derive(Debug, Clone)]
pub struct WeakMemoContext {
    inner: Weak<ContextInner>,
}

impl WeakMemoContext {
    /// The context, if any strong handle to it still exists.
    pub fn upgrade(&self) -> Option<MemoContext> {
        self.inner.upgrade().map(|inner| MemoContext { inner })
    }
}

impl MemoContext {
    // == Constructors ==
    pub fn new(providers: ProviderSet, settings: MemoSettings, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                registry: CacheRegistry::new(providers),
                clock,
                notifier: Notifier::new(),
                stats: Mutex::new(MemoStats::new()),
                settings,
                sweeper_installed: AtomicBool::new(false),
            }),
        }
    }

    /// Both providers in memory, default settings, wall clock.
    pub fn in_memory() -> Self {
        Self::new(
            ProviderSet::in_memory(),
            MemoSettings::default(),
            Arc::new(SystemClock),
        )
    }

    /// Session in memory, local provider on disk under `config.local_dir`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            ProviderSet::with_local_dir(&config.local_dir),
            MemoSettings::from(config),
            Arc::new(SystemClock),
        )
    }

    // == Accessors ==
    pub fn registry(&self) -> &CacheRegistry {
        &self.inner.registry
    }

    pub fn settings(&self) -> &MemoSettings {
        &self.inner.settings
    }

    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    pub fn downgrade(&self) -> WeakMemoContext {
        WeakMemoContext {
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.inner.clock.now_ms()
    }

    /// Snapshot of memoization statistics.
    pub fn stats(&self) -> MemoStats {
        self.inner.stats.lock().clone()
    }

    pub(crate) fn record<F>(&self, update: F)
    where
        F: FnOnce(&mut MemoStats),
    {
        update(&mut *self.inner.stats.lock());
    }

    /// The memoize cache store for `provider`.
    pub fn memo_store(&self, provider: Provider) -> Arc<CacheStore> {
        self.inner
            .registry
            .get_instance(&self.inner.settings.cache_name, provider)
    }

    // == Memoize ==
    /// Wraps a synchronous operation.
    ///
    /// `owner` and `operation` name the call site and prefix every cache key.
    /// With `purge_on_notify` set, the sweeper is installed (once per context);
    /// that requires a running Tokio runtime.
    pub fn memoize<F>(
        &self,
        owner: impl Into<String>,
        operation: impl Into<String>,
        options: MemoizeOptions,
        func: F,
    ) -> Memoized<F> {
        if options.purge_on_notify {
            self.install_sweeper();
        }
        Memoized::new(self.clone(), owner, operation, options, func)
    }

    /// Wraps an operation returning a future.
    pub fn memoize_async<F>(
        &self,
        owner: impl Into<String>,
        operation: impl Into<String>,
        options: MemoizeOptions,
        func: F,
    ) -> MemoizedAsync<F> {
        if options.purge_on_notify {
            self.install_sweeper();
        }
        MemoizedAsync::new(self.clone(), owner, operation, options, func)
    }

    // == Notifications ==
    /// Fires the notification channel. Returns how many listeners saw it.
    pub fn notify(&self) -> usize {
        self.inner.notifier.notify()
    }

    /// Starts the sweeper for the memoize cache unless this context already has one.
    ///
    /// Returns the task handle on first installation, `None` afterwards or
    /// when called outside a Tokio runtime. The task ends on its own once the
    /// last handle to this context is dropped.
    pub fn install_sweeper(&self) -> Option<JoinHandle<()>> {
        if self
            .inner
            .sweeper_installed
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return None;
        }

        if tokio::runtime::Handle::try_current().is_err() {
            warn!("No Tokio runtime available, sweeper not installed");
            self.inner.sweeper_installed.store(false, Ordering::SeqCst);
            return None;
        }

        let settings = self.settings();
        info!(
            "Installing sweeper for cache '{}' with policy {}",
            settings.cache_name, settings.sweep_policy
        );
        Some(spawn_sweeper(
            self,
            settings.cache_name.clone(),
            settings.sweep_policy,
        ))
    }

    pub fn sweeper_installed(&self) -> bool {
        self.inner.sweeper_installed.load(Ordering::SeqCst)
    }
}
