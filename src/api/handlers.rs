//! API Handlers
//!
//! HTTP request handlers for each inspection endpoint.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;

use crate::cache::Cache;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    DeletePatternResponse, DeleteResponse, GetResponse, HasResponse, HealthResponse,
    KeysResponse, PatternQuery, SetRequest, SetResponse, StatsResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache of JSON values
    pub cache: Cache<Value>,
}

impl AppState {
    pub fn new(cache: Cache<Value>) -> Self {
        Self { cache }
    }

    /// Builds the cache described by `config` and starts its sweeper.
    /// Must be called from within a Tokio runtime.
    pub fn from_config(config: &Config) -> Self {
        Self::new(Cache::with_cleanup(
            config.cache_config(),
            config.cleanup_interval(),
        ))
    }
}

/// Handler for PUT /set
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    state.cache.set(req.key.clone(), req.value, req.ttl)?;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let entry = state
        .cache
        .get_entry(&key)
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(GetResponse::new(key, entry)))
}

/// Handler for GET /has/:key
pub async fn has_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<HasResponse> {
    let exists = state.cache.has(&key);
    Json(HasResponse { key, exists })
}

/// Handler for DELETE /del/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    if !state.cache.delete(&key) {
        return Err(CacheError::NotFound(key));
    }

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for GET /keys?pattern=
pub async fn keys_handler(
    State(state): State<AppState>,
    Query(query): Query<PatternQuery>,
) -> Result<Json<KeysResponse>> {
    let keys = state.cache.keys(query.pattern.as_deref())?;
    Ok(Json(KeysResponse::new(query.pattern, keys)))
}

/// Handler for DELETE /keys?pattern=
///
/// The pattern is required; use `DELETE /clear` to drop everything.
pub async fn delete_pattern_handler(
    State(state): State<AppState>,
    Query(query): Query<PatternQuery>,
) -> Result<Json<DeletePatternResponse>> {
    let pattern = query
        .pattern
        .ok_or_else(|| CacheError::InvalidRequest("pattern is required".to_string()))?;

    let removed = state.cache.delete_pattern(&pattern)?;

    Ok(Json(DeletePatternResponse { pattern, removed }))
}

/// Handler for DELETE /clear
pub async fn clear_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    state.cache.clear();
    Json(state.cache.stats().into())
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.cache.stats().into())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
