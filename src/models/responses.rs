//! Response DTOs for the cache inspection API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::{CacheEntry, CacheStats};

/// Response body for GET /get/:key
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub key: String,
    pub value: Value,
    /// Remaining lifetime in whole seconds
    pub ttl: u64,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, entry: CacheEntry<Value>) -> Self {
        Self {
            key: key.into(),
            ttl: entry.ttl_remaining(),
            created_at: entry.created_at,
            value: entry.value,
        }
    }
}

/// Response body for PUT /set
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
}

impl SetResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }
}

/// Response body for DELETE /del/:key
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub key: String,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
        }
    }
}

/// Response body for GET /has/:key
#[derive(Debug, Clone, Serialize)]
pub struct HasResponse {
    pub key: String,
    pub exists: bool,
}

/// Response body for GET /keys
#[derive(Debug, Clone, Serialize)]
pub struct KeysResponse {
    pub pattern: Option<String>,
    pub count: usize,
    pub keys: Vec<String>,
}

impl KeysResponse {
    /// Sorts keys so listings are stable for operators.
    pub fn new(pattern: Option<String>, mut keys: Vec<String>) -> Self {
        keys.sort();
        Self {
            pattern,
            count: keys.len(),
            keys,
        }
    }
}

/// Response body for DELETE /keys
#[derive(Debug, Clone, Serialize)]
pub struct DeletePatternResponse {
    pub pattern: String,
    pub removed: usize,
}

/// Response body for GET /stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    /// Live entries
    pub size: usize,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            size: stats.size,
        }
    }
}

/// Response body for GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
