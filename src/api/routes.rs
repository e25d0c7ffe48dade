//! API Routes
//!
//! Configures the Axum router with all gateway endpoints.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, delete_handler, get_handler, health_handler, set_handler, stats_handler,
    AppState,
};

/// Creates the gateway router.
///
/// # Endpoints
/// - `PUT /ns/:namespace/:key` - Store a value
/// - `GET /ns/:namespace/:key` - Retrieve a value
/// - `DELETE /ns/:namespace/:key` - Delete a key
/// - `DELETE /ns/:namespace` - Clear a namespace
/// - `GET /stats` - Coordinator statistics
/// - `GET /health` - Health check
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/ns/:namespace/:key",
            get(get_handler).put(set_handler).delete(delete_handler),
        )
        .route("/ns/:namespace", delete(clear_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
