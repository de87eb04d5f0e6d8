//! Deckcache - in-process cache store
//!
//! Memoizes expensive lookups with TTL expiration, LRU eviction and hit/miss
//! accounting, plus an optional HTTP surface for inspecting a live store.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod keys;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{Cache, CacheStats, CacheStore};
pub use config::{CacheConfig, Config};
pub use error::CacheError;
pub use tasks::spawn_cleanup_task;
