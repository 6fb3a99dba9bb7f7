//! Route definitions for the QrLink HTTP API.
//!
//! Management routes are mounted under `/api`. The short-link redirect
//! and the signed blob route live at the root because their URLs are
//! handed out to end users.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Room for multipart boundaries and the non-file fields.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.links.max_upload_size_bytes as usize + MULTIPART_OVERHEAD;
    let request_timeout = Duration::from_secs(state.config.server.request_timeout_seconds);
    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    let api_routes = Router::new().merge(image_routes()).merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .merge(public_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Owner-scoped image management
fn image_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/images",
            post(handlers::image::upload_image).get(handlers::image::list_images),
        )
        .route("/images/{id}", delete(handlers::image::delete_image))
        .route("/images/{id}/link", get(handlers::image::get_link))
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Short-link redirect and signed blob access
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/i/{id}", get(handlers::resolve::resolve_link))
        .route("/blobs/{*path}", get(handlers::blob::serve_blob))
}
