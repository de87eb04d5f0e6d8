//! Shared Cache Handle
//!
//! Thread-safe front for [`CacheStore`], meant to be constructed once and
//! cloned into every component that needs it.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cache::{resolve_ttl, validate_key, CacheEntry, CacheStats, CacheStore};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::tasks::spawn_cleanup_task;

/// Per-key gates serializing `get_or_set` misses.
type InFlightMap = Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>;

// == Cache ==
/// Cloneable handle to a shared cache store.
///
/// Every operation locks one mutex for a short, non-suspending critical
/// section. Only the factory passed to [`get_or_set`](Self::get_or_set) may
/// suspend, and it runs with the store unlocked.
pub struct Cache<V> {
    inner: Arc<Inner<V>>,
}

struct Inner<V> {
    store: Mutex<CacheStore<V>>,
    config: CacheConfig,
    in_flight: InFlightMap,
    cleanup: Mutex<Option<JoinHandle<()>>>,
    shut_down: AtomicBool,
    warned: AtomicBool,
}

impl<V> Clone for Cache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: Clone + Send + 'static> Cache<V> {
    // == Constructors ==
    /// Creates a cache without a background sweeper. Expired entries are
    /// reclaimed lazily when observed.
    pub fn new(config: CacheConfig) -> Self {
        let config = config.normalized();
        Self {
            inner: Arc::new(Inner {
                store: Mutex::new(CacheStore::new(config)),
                config,
                in_flight: Mutex::new(HashMap::new()),
                cleanup: Mutex::new(None),
                shut_down: AtomicBool::new(false),
                warned: AtomicBool::new(false),
            }),
        }
    }

    /// Creates a cache and spawns a sweeper that reclaims expired entries
    /// every `interval`. Must be called from within a Tokio runtime.
    ///
    /// The sweeper keeps the cache alive until [`shutdown`](Self::shutdown).
    pub fn with_cleanup(config: CacheConfig, interval: Duration) -> Self {
        let cache = Self::new(config);
        let handle = spawn_cleanup_task(cache.clone(), interval);
        *cache.inner.cleanup.lock() = Some(handle);
        cache
    }

    pub fn config(&self) -> CacheConfig {
        self.inner.config
    }

    // == Store Operations ==

    /// See [`CacheStore::set`].
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Option<u64>) -> Result<()> {
        self.store().set(key.into(), value, ttl)
    }

    /// See [`CacheStore::get`].
    pub fn get(&self, key: &str) -> Option<V> {
        self.store().get(key)
    }

    /// See [`CacheStore::get_entry`].
    pub fn get_entry(&self, key: &str) -> Option<CacheEntry<V>> {
        self.store().get_entry(key)
    }

    /// Live value without counting a lookup or refreshing recency.
    pub fn peek(&self, key: &str) -> Option<V> {
        self.store().peek(key)
    }

    /// See [`CacheStore::has`].
    pub fn has(&self, key: &str) -> bool {
        self.store().has(key)
    }

    pub fn delete(&self, key: &str) -> bool {
        self.store().delete(key)
    }

    /// See [`CacheStore::delete_pattern`].
    pub fn delete_pattern(&self, pattern: &str) -> Result<usize> {
        self.store().delete_pattern(pattern)
    }

    /// See [`CacheStore::keys`].
    pub fn keys(&self, pattern: Option<&str>) -> Result<Vec<String>> {
        self.store().keys(pattern)
    }

    pub fn stats(&self) -> CacheStats {
        self.store().stats()
    }

    pub fn reset_stats(&self) {
        self.store().reset_stats()
    }

    pub fn clear(&self) {
        self.store().clear()
    }

    pub fn cleanup_expired(&self) -> usize {
        self.store().cleanup_expired()
    }

    /// Number of held entries, including expired ones not yet reclaimed.
    pub fn len(&self) -> usize {
        self.store().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store().is_empty()
    }

    // == Get Or Set ==
    /// Returns the cached value for `key`, computing and caching it with
    /// `factory` on a miss.
    ///
    /// The initial lookup is counted like [`get`](Self::get). Concurrent
    /// misses on the same key queue behind one another: the first caller runs
    /// its factory, the rest pick up the value it cached without running
    /// theirs. A factory error is returned as-is and nothing is cached; the
    /// next queued caller then tries its own factory.
    ///
    /// Key and TTL are validated before the factory runs.
    pub async fn get_or_set<F, Fut, E>(
        &self,
        key: &str,
        factory: F,
        ttl: Option<u64>,
    ) -> std::result::Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<V, E>>,
        E: From<CacheError>,
    {
        validate_key(key)?;
        resolve_ttl(ttl, self.inner.config.default_ttl)?;

        if let Some(value) = self.get(key) {
            return Ok(value);
        }

        let flight = InFlight::join(&self.inner.in_flight, key);
        let _turn = flight.gate.lock().await;

        // Someone ahead of us in the queue may have filled the key.
        let cached = self.peek(key);
        if let Some(value) = cached {
            return Ok(value);
        }

        let value = factory().await?;
        self.set(key, value.clone(), ttl)?;
        Ok(value)
    }

    // == Shutdown ==
    /// Stops the sweeper and releases every entry.
    ///
    /// Repeated calls are no-ops. The cache must not be used afterwards.
    pub fn shutdown(&self) {
        if self.inner.shut_down.swap(true, Ordering::SeqCst) {
            return;
        }

        if let Some(handle) = self.inner.cleanup.lock().take() {
            handle.abort();
        }

        let released = {
            let mut store = self.inner.store.lock();
            let count = store.len();
            store.clear();
            count
        };
        self.inner.in_flight.lock().clear();

        info!(released, "Cache shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.shut_down.load(Ordering::SeqCst)
    }

    fn store(&self) -> MutexGuard<'_, CacheStore<V>> {
        if self.is_shut_down() && !self.inner.warned.swap(true, Ordering::SeqCst) {
            warn!("Cache used after shutdown");
        }
        self.inner.store.lock()
    }
}

// == In-Flight Gate ==
/// Membership in the queue of `get_or_set` callers for one key. The map
/// entry is dropped by the last member to leave, including on cancellation.
struct InFlight<'a> {
    map: &'a InFlightMap,
    key: String,
    gate: Arc<tokio::sync::Mutex<()>>,
}

impl<'a> InFlight<'a> {
    fn join(map: &'a InFlightMap, key: &str) -> Self {
        let gate = map
            .lock()
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone();

        Self {
            map,
            key: key.to_string(),
            gate,
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut map = self.map.lock();
        // one reference in the map, one held here
        if Arc::strong_count(&self.gate) <= 2 {
            if let Some(current) = map.get(&self.key) {
                if Arc::ptr_eq(current, &self.gate) {
                    map.remove(&self.key);
                }
            }
        }
    }
}
