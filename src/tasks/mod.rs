//! Background Tasks Module
//!
//! # Tasks
//! - Sweeper: evicts memoize cache entries whenever the notification channel fires

mod notify;
mod sweeper;

pub use notify::Notifier;
pub use sweeper::{spawn_sweeper, sweep, SweepPolicy};
