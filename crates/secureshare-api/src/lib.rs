//! # secureshare-api
//!
//! HTTP API layer for SecureShare built on Axum.
//!
//! Provides the file transfer endpoints, the bearer-token extractor,
//! request/response DTOs, and the mapping from `AppError` to HTTP status.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, serve};
pub use state::AppState;
