//! Configuration Module
//!
//! Cache construction parameters and the server settings loaded from
//! environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

// == Cache Config ==
/// Parameters fixed for the lifetime of a cache store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// TTL in seconds applied when `set` is called without one
    pub default_ttl: u64,
    /// Maximum number of live entries
    pub max_size: usize,
}

impl CacheConfig {
    pub fn new(default_ttl: u64, max_size: usize) -> Self {
        Self {
            default_ttl,
            max_size,
        }
    }

    /// Raises a zero `default_ttl` or `max_size` to one.
    ///
    /// A zero default TTL would store every TTL-less entry already expired;
    /// a zero capacity would evict a key as soon as it is set.
    pub fn normalized(self) -> Self {
        Self {
            default_ttl: self.default_ttl.max(1),
            max_size: self.max_size.max(1),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: 300,
            max_size: 1000,
        }
    }
}

// == Server Config ==
/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_size: usize,
    /// Default TTL in seconds for entries without explicit TTL
    pub default_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Loads the configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_SIZE` - Maximum cache entries (default: 1000)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    ///
    /// Unparseable values fall back to their defaults. Zero `MAX_SIZE` and
    /// `DEFAULT_TTL` are accepted here and raised to one when the cache is
    /// built (see [`CacheConfig::normalized`]).
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_size: env_or("MAX_SIZE", defaults.max_size),
            default_ttl: env_or("DEFAULT_TTL", defaults.default_ttl),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
        }
    }

    /// The store parameters carried by this configuration.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new(self.default_ttl, self.max_size)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        let cache = CacheConfig::default();
        Self {
            max_size: cache.max_size,
            default_ttl: cache.default_ttl,
            server_port: 3000,
            cleanup_interval: 60,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
