//! Memoization options, fixed once per wrapped operation.

use std::time::Duration;

use crate::storage::Provider;

/// Common TTL values.
pub mod ttl {
    use std::time::Duration;

    pub const ONE_MINUTE: Duration = Duration::from_secs(60);
    pub const FIVE_MINUTES: Duration = Duration::from_secs(5 * 60);
    pub const TEN_MINUTES: Duration = Duration::from_secs(10 * 60);
    pub const HALF_HOUR: Duration = Duration::from_secs(30 * 60);
    pub const ONE_HOUR: Duration = Duration::from_secs(60 * 60);
}

// == Memoize Options ==
/// How a memoized operation keys, ages and stores its results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoizeOptions {
    /// Explicit discriminator; every call shares it regardless of arguments
    pub key: Option<String>,
    /// Maximum age of a cached result; `None` or zero never expires
    pub ttl: Option<Duration>,
    /// Storage scope; falls back to the context default
    pub provider: Option<Provider>,
    /// Installs the notification-driven sweeper when the operation is wrapped
    pub purge_on_notify: bool,
}

impl MemoizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit key given ahead of the options. A key already set in
    /// `options` takes precedence.
    pub fn keyed(key: impl Into<String>, options: MemoizeOptions) -> Self {
        let key = options.key.clone().or_else(|| Some(key.into()));
        Self { key, ..options }
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn provider(mut self, provider: Provider) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn purge_on_notify(mut self, enabled: bool) -> Self {
        self.purge_on_notify = enabled;
        self
    }

    /// TTL in milliseconds, `None` when results never expire.
    ///
    /// Partial milliseconds round up, so only `Duration::ZERO` means no expiry.
    pub fn ttl_ms(&self) -> Option<u64> {
        self.ttl.filter(|ttl| !ttl.is_zero()).map(|ttl| {
            let ms = ttl.as_nanos().div_ceil(1_000_000);
            u64::try_from(ms).unwrap_or(u64::MAX)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = MemoizeOptions::new();
        assert!(options.key.is_none());
        assert!(options.ttl_ms().is_none());
        assert!(options.provider.is_none());
        assert!(!options.purge_on_notify);
    }

    #[test]
    fn test_zero_ttl_never_expires() {
        let options = MemoizeOptions::new().ttl(Duration::ZERO);
        assert!(options.ttl_ms().is_none());
    }

    #[test]
    fn test_ttl_ms() {
        let options = MemoizeOptions::new().ttl(ttl::FIVE_MINUTES);
        assert_eq!(options.ttl_ms(), Some(300_000));
    }

    #[test]
    fn test_sub_millisecond_ttl_rounds_up() {
        let options = MemoizeOptions::new().ttl(Duration::from_micros(500));
        assert_eq!(options.ttl_ms(), Some(1));

        let options = MemoizeOptions::new().ttl(Duration::from_nanos(1_000_001));
        assert_eq!(options.ttl_ms(), Some(2));
    }

    #[test]
    fn test_keyed_uses_positional_key() {
        let options = MemoizeOptions::keyed("users", MemoizeOptions::new().ttl(ttl::ONE_MINUTE));
        assert_eq!(options.key.as_deref(), Some("users"));
        assert_eq!(options.ttl, Some(ttl::ONE_MINUTE));
    }

    #[test]
    fn test_keyed_prefers_option_key() {
        let options = MemoizeOptions::keyed("positional", MemoizeOptions::new().key("explicit"));
        assert_eq!(options.key.as_deref(), Some("explicit"));
    }
}
