//! Maps `AppError` to HTTP responses.
//!
//! Lives in core because the orphan rule requires `IntoResponse for AppError`
//! to be implemented in the crate that defines `AppError`; re-exported from
//! `secureshare_api::error`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code, e.g. `TOKEN_EXPIRED`.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

impl From<&AppError> for ApiErrorResponse {
    fn from(err: &AppError) -> Self {
        Self {
            error: err.kind.code().to_string(),
            message: err.message.clone(),
        }
    }
}

/// HTTP status for an error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorKind::Authentication | ErrorKind::InvalidToken => StatusCode::UNAUTHORIZED,
        ErrorKind::Unauthorized => StatusCode::FORBIDDEN,
        ErrorKind::NotFoundOrForbidden => StatusCode::NOT_FOUND,
        ErrorKind::TokenExpired => StatusCode::GONE,
        ErrorKind::StorageWriteFailure
        | ErrorKind::MetadataWriteFailure
        | ErrorKind::StorageDeletionFailure
        | ErrorKind::MetadataDeletionFailure
        | ErrorKind::FullDeletionFailure
        | ErrorKind::Storage
        | ErrorKind::Database => StatusCode::BAD_GATEWAY,
        ErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
        ErrorKind::TokenGenerationFailure
        | ErrorKind::Configuration
        | ErrorKind::Serialization
        | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_for(self.kind);
        if status.is_server_error() {
            tracing::error!(kind = %self.kind, error = %self.message, "Request failed");
        }
        (status, Json(ApiErrorResponse::from(&self))).into_response()
    }
}

