//! Configuration Module
//!
//! Handles loading and managing configuration from environment variables.

use std::env;
use std::path::PathBuf;

use crate::cache::MEMOIZE_CACHE;
use crate::storage::Provider;
use crate::tasks::SweepPolicy;

/// Memoization and admin server configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache id memoized results are stored under
    pub cache_name: String,
    /// Provider used when memoize options name none
    pub default_provider: Provider,
    /// Directory backing the `local` provider
    pub local_dir: PathBuf,
    /// Eviction rule applied on each notification
    pub sweep_policy: SweepPolicy,
    /// Admin HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MEMO_CACHE_NAME` - Memoize cache id (default: memoize-cache)
    /// - `MEMO_DEFAULT_PROVIDER` - `session` or `local` (default: session)
    /// - `MEMO_LOCAL_DIR` - Directory for the local provider (default: .memo-cache)
    /// - `MEMO_SWEEP_POLICY` - `expired` or `clear-all` (default: expired)
    /// - `SERVER_PORT` - Admin HTTP port (default: 3000)
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            cache_name: env::var("MEMO_CACHE_NAME")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.cache_name),
            default_provider: env::var("MEMO_DEFAULT_PROVIDER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_provider),
            local_dir: env::var("MEMO_LOCAL_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.local_dir),
            sweep_policy: env::var("MEMO_SWEEP_POLICY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.sweep_policy),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_name: MEMOIZE_CACHE.to_string(),
            default_provider: Provider::Session,
            local_dir: PathBuf::from(".memo-cache"),
            sweep_policy: SweepPolicy::Expired,
            server_port: 3000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_name, "memoize-cache");
        assert_eq!(config.default_provider, Provider::Session);
        assert_eq!(config.local_dir, PathBuf::from(".memo-cache"));
        assert_eq!(config.sweep_policy, SweepPolicy::Expired);
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_config_from_env() {
        // Single test touches the env so parallel tests do not race
        env::remove_var("MEMO_CACHE_NAME");
        env::remove_var("MEMO_DEFAULT_PROVIDER");
        env::remove_var("MEMO_LOCAL_DIR");
        env::remove_var("MEMO_SWEEP_POLICY");
        env::remove_var("SERVER_PORT");

        let config = Config::from_env();
        assert_eq!(config.cache_name, "memoize-cache");
        assert_eq!(config.default_provider, Provider::Session);
        assert_eq!(config.sweep_policy, SweepPolicy::Expired);
        assert_eq!(config.server_port, 3000);

        env::set_var("MEMO_DEFAULT_PROVIDER", "local");
        env::set_var("MEMO_SWEEP_POLICY", "clear-all");
        env::set_var("SERVER_PORT", "not-a-port");

        let config = Config::from_env();
        assert_eq!(config.default_provider, Provider::Local);
        assert_eq!(config.sweep_policy, SweepPolicy::ClearAll);
        assert_eq!(config.server_port, 3000);

        env::remove_var("MEMO_DEFAULT_PROVIDER");
        env::remove_var("MEMO_SWEEP_POLICY");
        env::remove_var("SERVER_PORT");
    }
}
