//! LRU Tracker Module
//!
//! Recency ordering used to pick eviction victims.

use std::collections::{BTreeMap, HashMap};

// == LRU Tracker ==
/// Tracks access order for LRU eviction.
///
/// Every touch stamps the key with a fresh, strictly increasing tick. The
/// smallest live tick in `order` is the least recently used key, so touch,
/// remove and eviction are all O(log n).
#[derive(Debug, Default)]
pub struct LruTracker {
    /// Key -> tick of its most recent touch
    ticks: HashMap<String, u64>,
    /// Tick -> key, oldest first
    order: BTreeMap<u64, String>,
    /// Next tick to hand out
    next_tick: u64,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used, inserting it if unknown.
    pub fn touch(&mut self, key: &str) {
        let tick = self.next_tick;
        self.next_tick += 1;

        match self.ticks.get_mut(key) {
            Some(previous) => {
                if let Some(owned) = self.order.remove(&*previous) {
                    *previous = tick;
                    self.order.insert(tick, owned);
                }
            }
            None => {
                self.ticks.insert(key.to_string(), tick);
                self.order.insert(tick, key.to_string());
            }
        }
    }

    // == Remove ==
    /// Stops tracking a key. Unknown keys are ignored.
    pub fn remove(&mut self, key: &str) {
        if let Some(tick) = self.ticks.remove(key) {
            self.order.remove(&tick);
        }
    }

    // == Evict Oldest ==
    /// Removes and returns the least recently used key.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.order.pop_first()?;
        self.ticks.remove(&key);
        Some(key)
    }

    /// Number of tracked keys.
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// Forgets every key.
    pub fn clear(&mut self) {
        self.ticks.clear();
        self.order.clear();
    }
}
