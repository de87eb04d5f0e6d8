//! Cache Store Module
//!
//! Single-owner cache engine combining HashMap storage with LRU tracking and
//! TTL expiration. Every method takes `&mut self`; sharing across tasks goes
//! through [`Cache`](crate::cache::Cache).

use std::collections::HashMap;

use tracing::debug;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::{CacheEntry, CacheStats, GlobPattern, LruTracker, MAX_KEY_LENGTH};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Capacity- and time-bounded key/value storage.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_size: usize,
    /// Default TTL in seconds for entries without explicit TTL
    default_ttl: u64,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// A `max_size` or `default_ttl` of zero is raised to one so a freshly
    /// set key is always readable.
    pub fn new(config: CacheConfig) -> Self {
        let config = config.normalized();
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_size: config.max_size,
            default_ttl: config.default_ttl,
        }
    }

    // == Set ==
    /// Stores a value under `key`, replacing any previous value and TTL.
    ///
    /// Inserting a new key into a full store evicts the least recently used
    /// entry first. Overwriting never evicts.
    ///
    /// # Errors
    /// - `InvalidKey` for an empty key or one longer than `MAX_KEY_LENGTH`
    /// - `InvalidTtl` for an explicit TTL of zero
    pub fn set(&mut self, key: String, value: V, ttl: Option<u64>) -> Result<()> {
        validate_key(&key)?;
        let ttl = resolve_ttl(ttl, self.default_ttl)?;

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_size {
            self.evict_lru();
        }

        self.entries.insert(key.clone(), CacheEntry::new(value, ttl));
        self.lru.touch(&key);

        Ok(())
    }

    // == Get ==
    /// Returns the live value for `key`.
    ///
    /// A hit marks the key most recently used. Absent and expired keys count
    /// as misses; an expired entry is removed on the way out.
    pub fn get(&mut self, key: &str) -> Option<V> {
        self.get_entry(key).map(|entry| entry.value)
    }

    /// Like [`get`](Self::get), but returns the whole entry so callers can
    /// report its age and remaining lifetime.
    pub fn get_entry(&mut self, key: &str) -> Option<CacheEntry<V>> {
        match self.live_entry(key) {
            Some(entry) => {
                let entry = entry.clone();
                self.stats.record_hit();
                self.lru.touch(key);
                Some(entry)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Peek ==
    /// Returns the live value without touching counters or recency.
    pub fn peek(&mut self, key: &str) -> Option<V> {
        self.live_entry(key).map(|entry| entry.value.clone())
    }

    // == Has ==
    /// Checks for a live entry without touching counters or recency.
    pub fn has(&mut self, key: &str) -> bool {
        self.live_entry(key).is_some()
    }

    // == Delete ==
    /// Removes `key`. Returns whether an entry was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove_entry(key).is_some()
    }

    // == Delete Pattern ==
    /// Removes every live key matching the glob `pattern` and returns how
    /// many were removed. Expired entries met during the scan are reclaimed
    /// but not counted.
    pub fn delete_pattern(&mut self, pattern: &str) -> Result<usize> {
        let glob = GlobPattern::new(pattern)?;
        self.cleanup_expired();

        let matched: Vec<String> = self
            .entries
            .keys()
            .filter(|key| glob.matches(key))
            .cloned()
            .collect();

        for key in &matched {
            self.remove_entry(key);
        }

        debug!(pattern, removed = matched.len(), "Deleted keys by pattern");
        Ok(matched.len())
    }

    // == Keys ==
    /// Lists live keys, optionally filtered by a glob pattern. Order is
    /// unspecified.
    pub fn keys(&mut self, pattern: Option<&str>) -> Result<Vec<String>> {
        let glob = pattern.map(GlobPattern::new).transpose()?;
        self.cleanup_expired();

        Ok(self
            .entries
            .keys()
            .filter(|key| glob.as_ref().map_or(true, |g| g.matches(key)))
            .cloned()
            .collect())
    }

    // == Stats ==
    /// Returns a statistics snapshot. Expired entries are reclaimed first so
    /// `size` only counts live entries.
    pub fn stats(&mut self) -> CacheStats {
        self.cleanup_expired();
        let mut stats = self.stats.clone();
        stats.set_size(self.entries.len());
        stats
    }

    /// Zeroes hit, miss, eviction and expiration counters.
    pub fn reset_stats(&mut self) {
        self.stats.reset_counters();
    }

    // == Clear ==
    /// Removes every entry. Counters are kept; see [`reset_stats`](Self::reset_stats).
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
    }

    // == Cleanup Expired ==
    /// Removes all expired entries and returns how many were removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = current_timestamp_ms();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        self.stats.record_expirations(expired.len());
        expired.len()
    }

    /// Number of held entries, including expired ones not yet reclaimed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn default_ttl(&self) -> u64 {
        self.default_ttl
    }

    // == Internals ==

    /// Looks up a live entry, reclaiming it if it has expired.
    fn live_entry(&mut self, key: &str) -> Option<&CacheEntry<V>> {
        let expired = self.entries.get(key)?.is_expired();
        if expired {
            self.remove_entry(key);
            self.stats.record_expirations(1);
            debug!(key, "Reclaimed expired entry on lookup");
            return None;
        }
        self.entries.get(key)
    }

    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let entry = self.entries.remove(key)?;
        self.lru.remove(key);
        Some(entry)
    }

    fn evict_lru(&mut self) {
        let Some(victim) = self.lru.evict_oldest() else {
            return;
        };

        match self.entries.remove(&victim) {
            Some(entry) if entry.is_expired() => self.stats.record_expirations(1),
            Some(_) => {
                self.stats.record_eviction();
                debug!(key = %victim, "Evicted least recently used entry");
            }
            None => {}
        }
    }
}

// == Validation ==
/// Rejects empty and oversized keys.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidKey("key cannot be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidKey(format!(
            "key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}

/// Picks the effective TTL, rejecting an explicit zero.
pub fn resolve_ttl(ttl: Option<u64>, default_ttl: u64) -> Result<u64> {
    match ttl {
        Some(0) => Err(CacheError::InvalidTtl(
            "ttl must be at least one second".to_string(),
        )),
        Some(ttl) => Ok(ttl),
        None => Ok(default_ttl),
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    fn store(max_size: usize) -> CacheStore<String> {
        CacheStore::new(CacheConfig::new(300, max_size))
    }

    fn set(store: &mut CacheStore<String>, key: &str, value: &str) {
        store.set(key.to_string(), value.to_string(), None).unwrap();
    }

    #[test]
    fn test_store_new() {
        let store = store(100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.max_size(), 100);
        assert_eq!(store.default_ttl(), 300);
    }

    #[test]
    fn test_zero_max_size_is_raised() {
        let mut store = store(0);
        assert_eq!(store.max_size(), 1);

        set(&mut store, "a", "1");
        assert_eq!(store.get("a").as_deref(), Some("1"));
    }

    #[test]
    fn test_zero_default_ttl_is_raised() {
        let mut store: CacheStore<String> = CacheStore::new(CacheConfig::new(0, 10));
        assert_eq!(store.default_ttl(), 1);

        set(&mut store, "k", "v");
        assert_eq!(store.get("k").as_deref(), Some("v"));

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.expirations, 0);
        assert_eq!(stats.size, 1);
    }

    #[test]
    fn test_get_entry_reports_lifetime() {
        let mut store = store(100);
        store
            .set("themes:all".to_string(), "[]".to_string(), Some(60))
            .unwrap();

        let entry = store.get_entry("themes:all").unwrap();
        assert_eq!(entry.value, "[]");
        assert!(entry.ttl_remaining() >= 59 && entry.ttl_remaining() <= 60);
        assert_eq!(entry.expires_at - entry.created_at, 60_000);

        assert!(store.get_entry("missing").is_none());
        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = store(100);

        set(&mut store, "project:1", "deck");

        assert_eq!(store.get("project:1").as_deref(), Some("deck"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = store(100);
        assert_eq!(store.get("nonexistent"), None);
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_store_delete() {
        let mut store = store(100);

        set(&mut store, "key1", "value1");

        assert!(store.delete("key1"));
        assert!(store.is_empty());
        assert_eq!(store.get("key1"), None);
        assert!(!store.delete("key1"));
    }

    #[test]
    fn test_delete_does_not_touch_counters() {
        let mut store = store(100);
        set(&mut store, "key1", "value1");

        store.delete("key1");
        store.delete("missing");

        assert_eq!(store.stats().lookups(), 0);
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = store(100);

        set(&mut store, "key1", "value1");
        set(&mut store, "key1", "value2");

        assert_eq!(store.get("key1").as_deref(), Some("value2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_invalid_keys_are_rejected() {
        let mut store = store(100);

        let empty = store.set(String::new(), "v".to_string(), None);
        assert!(matches!(empty, Err(CacheError::InvalidKey(_))));

        let long_key = "x".repeat(MAX_KEY_LENGTH + 1);
        let long = store.set(long_key, "v".to_string(), None);
        assert!(matches!(long, Err(CacheError::InvalidKey(_))));

        assert!(store.is_empty());
    }

    #[test]
    fn test_zero_ttl_is_rejected() {
        let mut store = store(100);
        let result = store.set("key".to_string(), "v".to_string(), Some(0));
        assert!(matches!(result, Err(CacheError::InvalidTtl(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = store(100);

        store
            .set("short-ttl".to_string(), "value".to_string(), Some(1))
            .unwrap();
        assert_eq!(store.get("short-ttl").as_deref(), Some("value"));
        assert_eq!(store.len(), 1);

        sleep(Duration::from_millis(1100));

        assert_eq!(store.get("short-ttl"), None);
        assert_eq!(store.len(), 0);

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.expirations, 1);
    }

    #[test]
    fn test_has_treats_expired_as_absent() {
        let mut store = store(100);

        store.set("soon".to_string(), "v".to_string(), Some(1)).unwrap();
        assert!(store.has("soon"));

        sleep(Duration::from_millis(1100));

        assert!(!store.has("soon"));
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_has_is_a_peek() {
        let mut store = store(2);

        set(&mut store, "a", "1");
        set(&mut store, "b", "2");

        assert!(store.has("a"));
        assert!(!store.has("missing"));
        assert_eq!(store.stats().lookups(), 0);

        // "a" was not refreshed by has(), so it is still the LRU victim
        set(&mut store, "c", "3");
        assert!(!store.has("a"));
        assert!(store.has("b"));
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = store(3);

        set(&mut store, "key1", "value1");
        set(&mut store, "key2", "value2");
        set(&mut store, "key3", "value3");
        set(&mut store, "key4", "value4");

        assert_eq!(store.len(), 3);
        assert!(!store.has("key1"));
        assert!(store.has("key2"));
        assert!(store.has("key3"));
        assert!(store.has("key4"));
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_lru_touch_on_get() {
        let mut store = store(3);

        set(&mut store, "key1", "value1");
        set(&mut store, "key2", "value2");
        set(&mut store, "key3", "value3");

        store.get("key1").unwrap();
        set(&mut store, "key4", "value4");

        assert!(store.has("key1"));
        assert!(!store.has("key2"));
        assert!(store.has("key3"));
        assert!(store.has("key4"));
    }

    #[test]
    fn test_overwrite_at_capacity_does_not_evict() {
        let mut store = store(2);

        set(&mut store, "a", "1");
        set(&mut store, "b", "2");
        set(&mut store, "a", "3");

        assert_eq!(store.len(), 2);
        assert!(store.has("b"));
        assert_eq!(store.stats().evictions, 0);

        // the overwrite refreshed "a", so "b" goes next
        set(&mut store, "c", "4");
        assert!(!store.has("b"));
        assert!(store.has("a"));
    }

    #[test]
    fn test_store_stats() {
        let mut store = store(100);

        set(&mut store, "key", "value");
        store.get("key");
        store.get("key");
        store.get("missing");

        let stats = store.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
        assert!((stats.hit_rate() - 0.667).abs() < 0.001);
    }

    #[test]
    fn test_stats_size_excludes_expired() {
        let mut store = store(100);

        store.set("a".to_string(), "1".to_string(), Some(1)).unwrap();
        set(&mut store, "b", "2");

        sleep(Duration::from_millis(1100));

        assert_eq!(store.stats().size, 1);
    }

    #[test]
    fn test_delete_pattern() {
        let mut store = store(100);

        set(&mut store, "user:1:data", "data1");
        set(&mut store, "user:2:data", "data2");
        set(&mut store, "project:1:data", "data3");

        assert_eq!(store.delete_pattern("user:*").unwrap(), 2);
        assert_eq!(store.get("user:1:data"), None);
        assert_eq!(store.get("user:2:data"), None);
        assert_eq!(store.get("project:1:data").as_deref(), Some("data3"));
    }

    #[test]
    fn test_delete_pattern_skips_expired() {
        let mut store = store(100);

        store
            .set("user:1:data".to_string(), "old".to_string(), Some(1))
            .unwrap();
        set(&mut store, "user:2:data", "live");

        sleep(Duration::from_millis(1100));

        assert_eq!(store.delete_pattern("user:*").unwrap(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_pattern_no_match() {
        let mut store = store(100);
        set(&mut store, "themes:all", "[]");

        assert_eq!(store.delete_pattern("user:*").unwrap(), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_keys() {
        let mut store = store(100);

        set(&mut store, "user:1:projects", "a");
        set(&mut store, "user:2:projects", "b");
        set(&mut store, "themes:all", "c");

        let mut all = store.keys(None).unwrap();
        all.sort();
        assert_eq!(all, vec!["themes:all", "user:1:projects", "user:2:projects"]);

        let mut users = store.keys(Some("user:*")).unwrap();
        users.sort();
        assert_eq!(users, vec!["user:1:projects", "user:2:projects"]);
    }

    #[test]
    fn test_keys_excludes_expired() {
        let mut store = store(100);

        store
            .set("user:1:projects".to_string(), "a".to_string(), Some(1))
            .unwrap();
        set(&mut store, "user:2:projects", "b");

        sleep(Duration::from_millis(1100));

        assert_eq!(store.keys(Some("user:*")).unwrap(), vec!["user:2:projects"]);
    }

    #[test]
    fn test_clear_keeps_counters() {
        let mut store = store(100);

        set(&mut store, "a", "1");
        store.get("a");
        store.get("b");
        store.clear();

        let stats = store.stats();
        assert_eq!(stats.size, 0);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(store.get("a"), None);

        store.reset_stats();
        assert_eq!(store.stats().lookups(), 0);
    }

    #[test]
    fn test_store_cleanup_expired() {
        let mut store = store(100);

        store.set("key1".to_string(), "v".to_string(), Some(1)).unwrap();
        store.set("key2".to_string(), "v".to_string(), Some(10)).unwrap();

        sleep(Duration::from_millis(1100));

        assert_eq!(store.cleanup_expired(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.has("key2"));
    }

    #[test]
    fn test_expired_lru_victim_counts_as_expiration() {
        let mut store = store(2);

        store.set("old".to_string(), "v".to_string(), Some(1)).unwrap();
        set(&mut store, "live", "v");

        sleep(Duration::from_millis(1100));
        set(&mut store, "new", "v");

        let stats = store.stats();
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.size, 2);
    }

    #[test]
    fn test_peek() {
        let mut store = store(100);
        set(&mut store, "a", "1");

        assert_eq!(store.peek("a").as_deref(), Some("1"));
        assert_eq!(store.peek("b"), None);
        assert_eq!(store.stats().lookups(), 0);
    }
}
