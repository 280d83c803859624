//! Expiration Sweeper
//!
//! Background task that evicts memoize cache entries each time the
//! notification channel fires.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::CacheStore;
use crate::context::MemoContext;
use crate::error::Result;
use crate::storage::Provider;

// == Sweep Policy ==
/// Which entries a sweep evicts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SweepPolicy {
    /// Entries whose stored TTL has fully elapsed; entries without TTL stay
    #[default]
    Expired,
    /// Every entry, whatever its age
    ClearAll,
}

impl fmt::Display for SweepPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SweepPolicy::Expired => f.write_str("expired"),
            SweepPolicy::ClearAll => f.write_str("clear-all"),
        }
    }
}

impl FromStr for SweepPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expired" => Ok(SweepPolicy::Expired),
            "clear-all" | "clear_all" | "all" => Ok(SweepPolicy::ClearAll),
            other => Err(format!("unknown sweep policy '{}'", other)),
        }
    }
}

// == Sweep ==
/// Evicts entries from `store` according to `policy`, as of `now`.
///
/// Returns the number of entries removed.
pub fn sweep(store: &CacheStore, now: u64, policy: SweepPolicy) -> Result<usize> {
    match policy {
        SweepPolicy::Expired => store.remove_where(|_, entry| entry.is_expired(now)),
        // Every entry aged zero or more; future-stamped entries stay.
        SweepPolicy::ClearAll => store.remove_where(|_, entry| entry.timestamp <= now),
    }
}

/// Spawns a task sweeping the `cache_id` stores of every provider once per
/// notification.
///
/// Notifications that pile up while a sweep runs collapse into a single
/// sweep. The task holds only a weak handle to `ctx`; it ends when the last
/// `MemoContext` clone is dropped, or when the handle is aborted.
///
/// # Example
/// ```ignore
/// let ctx = MemoContext::in_memory();
/// let handle = spawn_sweeper(&ctx, "memoize-cache".to_string(), SweepPolicy::Expired);
/// ctx.notify();
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_sweeper(ctx: &MemoContext, cache_id: String, policy: SweepPolicy) -> JoinHandle<()> {
    // Subscribe before spawning so a notification fired right after
    // installation is not lost.
    let mut rx = ctx.notifier().subscribe();
    let weak = ctx.downgrade();

    tokio::spawn(async move {
        info!("Starting sweeper for cache '{}' ({})", cache_id, policy);

        loop {
            match rx.recv().await {
                Ok(()) => {}
                Err(RecvError::Lagged(skipped)) => {
                    debug!("Sweeper coalesced {} notifications", skipped);
                }
                Err(RecvError::Closed) => {
                    info!("Notification channel closed, sweeper stopping");
                    break;
                }
            }

            let Some(ctx) = weak.upgrade() else {
                info!("Memo context dropped, sweeper stopping");
                break;
            };

            let now = ctx.now_ms();
            for provider in [Provider::Session, Provider::Local] {
                let store = ctx.registry().get_instance(&cache_id, provider);
                match sweep(&store, now, policy) {
                    Ok(0) => debug!("Sweep of '{}' ({}): nothing to evict", cache_id, provider),
                    Ok(removed) => info!(
                        "Sweep of '{}' ({}): removed {} entries",
                        cache_id, provider, removed
                    ),
                    Err(e) => warn!("Sweep of '{}' ({}) failed: {}", cache_id, provider, e),
                }
            }
        }
    })
}
