//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/answer", post(handlers::answer))
        .route("/search", get(handlers::search))
        .route("/search/all", get(handlers::search_all))
        .route(
            "/document",
            get(handlers::get_document)
                .put(handlers::put_document)
                .delete(handlers::delete_document),
        )
        .route("/flags", get(handlers::get_flags).put(handlers::put_flags))
        .route("/stats", get(handlers::stats))
        .route("/health", get(handlers::health))
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}
