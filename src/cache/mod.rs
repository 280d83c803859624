//! Cache Module
//!
//! Write-through cache stores and the registry that owns them.

mod entry;
mod order;
mod registry;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use order::InsertionOrder;
pub use registry::CacheRegistry;
pub use stats::MemoStats;
pub use store::CacheStore;

// == Public Constants ==
/// Logical cache name memoized results are stored under
pub const MEMOIZE_CACHE: &str = "memoize-cache";
