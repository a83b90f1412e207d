//! Route definitions for the SecureShare HTTP API.
//!
//! File routes live under `/file`. The router receives `AppState` and passes
//! it to all handlers via Axum's `State` extractor.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post},
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Room for multipart framing on top of the largest accepted file.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build the complete Axum router with all routes and middleware.
///
/// Receives the fully-constructed `AppState` and threads it through
/// every route via `.with_state(state)`.
pub fn build_router(state: AppState) -> Router {
    let max_upload = usize::try_from(state.config.storage.max_upload_size_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD);
    let request_timeout = Duration::from_secs(state.config.server.request_timeout_seconds);
    let cors = build_cors_layer(&state.config.server);

    Router::new()
        .merge(file_routes())
        .merge(health_routes())
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Upload, download tokens, listing and delete
fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/file/upload", post(handlers::file::upload_file))
        .route("/file/presigned", post(handlers::file::presign_files))
        .route("/file/presigned/{id}", post(handlers::file::presign_file))
        .route("/file/download/{id}", get(handlers::file::download_file))
        .route("/file/list", get(handlers::file::list_files))
        .route("/file/metadata/{id}", get(handlers::file::get_metadata))
        .route("/file/delete", post(handlers::file::delete_files))
        .route("/file/{id}", delete(handlers::file::delete_file))
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
