//! Memoize Module
//!
//! Wraps operations so equivalent calls are answered from the memoize cache.
//!
//! ```ignore
//! let ctx = MemoContext::in_memory();
//! let double = ctx.memoize("Calc", "double", MemoizeOptions::new().ttl(ttl::ONE_MINUTE), |x: i64| x * 2);
//! assert_eq!(double.call(3)?, 6); // computed
//! assert_eq!(double.call(3)?, 6); // replayed
//! ```

mod key;
mod options;
mod wrapper;

pub use key::{args_digest, type_owner, MemoizeKey};
pub use options::{ttl, MemoizeOptions};
pub use wrapper::{Memoized, MemoizedAsync};
