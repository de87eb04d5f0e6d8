//! Request DTOs for the cache inspection API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;
use serde_json::Value;

use crate::cache::validate_key;

/// Request body for the SET operation (PUT /set)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// Arbitrary JSON payload
    pub value: Value,
    /// Optional TTL in seconds
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl SetRequest {
    /// Returns an error message if the request cannot be stored.
    pub fn validate(&self) -> Option<String> {
        if let Err(e) = validate_key(&self.key) {
            return Some(e.to_string());
        }
        if self.ttl == Some(0) {
            return Some("TTL must be at least one second".to_string());
        }
        None
    }
}

/// Query string for `GET /keys` and `DELETE /keys`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatternQuery {
    /// Glob pattern; `*` matches any run of characters
    #[serde(default)]
    pub pattern: Option<String>,
}
