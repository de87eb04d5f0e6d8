//! API Routes
//!
//! Configures the Axum router with all inspection endpoints. The router is
//! an ops surface over one [`Cache`](crate::Cache), not its API.

use axum::{
    routing::{delete, get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, delete_handler, delete_pattern_handler, get_handler, has_handler,
    health_handler, keys_handler, set_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/set", put(set_handler))
        .route("/get/:key", get(get_handler))
        .route("/has/:key", get(has_handler))
        .route("/del/:key", delete(delete_handler))
        .route("/keys", get(keys_handler).delete(delete_pattern_handler))
        .route("/clear", delete(clear_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
