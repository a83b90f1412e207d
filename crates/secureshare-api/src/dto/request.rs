//! Request DTOs with validation.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::Validate;

use secureshare_core::error::AppError;
use secureshare_entity::TokenType;

/// Most identifiers accepted by one batch request.
pub const MAX_BATCH: usize = 100;

/// Body of `POST /file/presigned[/{id}]`.
///
/// Either `file_id` (or the path segment) or a non-empty `file_ids`
/// selects the files. `duration` is in minutes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PresignRequest {
    /// Single file identifier.
    #[serde(default)]
    pub file_id: Option<String>,
    /// Batch of file identifiers.
    #[serde(default)]
    #[validate(length(max = 100, message = "At most 100 file IDs per request"))]
    pub file_ids: Vec<String>,
    /// `one-time` or `time-limited` (default).
    #[serde(default)]
    pub token_type: Option<String>,
    /// Requested lifetime in minutes; zero or negative selects the default.
    #[serde(default)]
    #[validate(range(max = 10080, message = "Duration must not exceed 7 days"))]
    pub duration: i64,
}

impl PresignRequest {
    /// Parsed token type, defaulting to time-limited.
    pub fn token_type(&self) -> Result<TokenType, AppError> {
        match self.token_type.as_deref().map(str::trim) {
            None | Some("") => Ok(TokenType::TimeLimited),
            Some(raw) => raw.parse(),
        }
    }

    /// Requested lifetime; non-positive values become zero.
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration.max(0).unsigned_abs().saturating_mul(60))
    }
}

/// Body of `POST /file/delete`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct DeleteRequest {
    /// Single file identifier.
    #[serde(default)]
    pub file_id: Option<String>,
    /// Batch of file identifiers.
    #[serde(default)]
    #[validate(length(max = 100, message = "At most 100 file IDs per request"))]
    pub file_ids: Vec<String>,
}

/// Query of `GET /file/download/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DownloadQuery {
    /// The download token from the presigned URL.
    #[serde(default)]
    pub token: Option<String>,
}

/// Map validator failures to `InvalidInput`.
pub fn validation_error(errors: validator::ValidationErrors) -> AppError {
    AppError::invalid_input(format!("Validation failed: {errors}"))
}
