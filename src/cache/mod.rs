//! Cache Module
//!
//! In-process caching with TTL expiration, LRU eviction and hit/miss
//! accounting.

mod entry;
mod lru;
mod pattern;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use lru::LruTracker;
pub use pattern::{glob_to_regex, GlobPattern};
pub use shared::Cache;
pub use stats::CacheStats;
pub use store::{resolve_ttl, validate_key, CacheStore};

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;
