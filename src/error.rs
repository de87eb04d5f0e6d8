//! Error types for the cache store and its inspection API
//!
//! The store only rejects caller misuse; capacity is always resolved by
//! eviction and never reported as an error.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Empty or oversized key
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// TTL of zero seconds
    #[error("Invalid TTL: {0}")]
    InvalidTtl(String),

    /// Glob pattern that could not be compiled
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// Key not found (HTTP layer)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Malformed request (HTTP layer)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidKey(_)
            | CacheError::InvalidTtl(_)
            | CacheError::InvalidPattern(_)
            | CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
