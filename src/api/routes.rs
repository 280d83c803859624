//! API Routes
//!
//! Configures the Axum router with all admin endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, delete_entry_handler, get_entry_handler, health_handler, notify_handler,
    put_entry_handler, stats_handler, store_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/stores/:provider/:id", get(store_handler).delete(clear_handler))
        .route(
            "/stores/:provider/:id/entries/:key",
            get(get_entry_handler)
                .put(put_entry_handler)
                .delete(delete_entry_handler),
        )
        .route("/notify", post(notify_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
