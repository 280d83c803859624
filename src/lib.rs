//! Memo Cache - persistent TTL-bounded memoization
//!
//! Wraps sync or async operations so repeated calls with equivalent arguments
//! are answered from a write-through cache store, with event-driven sweeping
//! of stale entries.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod context;
pub mod error;
pub mod memoize;
pub mod models;
pub mod storage;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use context::{MemoContext, MemoSettings, WeakMemoContext};
pub use error::{CacheError, Result};
pub use memoize::{ttl, MemoizeOptions, Memoized, MemoizedAsync};
pub use storage::Provider;
pub use tasks::spawn_sweeper;
