//! Cache Entry Module
//!
//! Defines a single cached value together with its expiration deadline.

use std::time::{SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// A stored value and its lifetime bounds.
///
/// The value is opaque to the cache: it is cloned out on reads and never
/// inspected.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry that expires `ttl_seconds` from now.
    pub fn new(value: V, ttl_seconds: u64) -> Self {
        let now = current_timestamp_ms();
        Self {
            value,
            created_at: now,
            expires_at: now.saturating_add(ttl_seconds.saturating_mul(1000)),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches `expires_at`, so a
    /// fully elapsed TTL is never observed as live.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    /// Expiration check against an explicit clock reading.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at
    }

    // == Time To Live ==
    /// Remaining lifetime in milliseconds, `0` once expired.
    pub fn ttl_remaining_ms(&self) -> u64 {
        self.expires_at.saturating_sub(current_timestamp_ms())
    }

    /// Remaining lifetime in whole seconds, `0` once expired.
    pub fn ttl_remaining(&self) -> u64 {
        self.ttl_remaining_ms() / 1000
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
///
/// A clock set before the epoch reads as `0`.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
