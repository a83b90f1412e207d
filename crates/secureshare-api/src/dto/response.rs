//! Response DTOs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use secureshare_core::error::AppError;
use secureshare_entity::FileRecord;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Result of an upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    /// Message.
    pub message: String,
    /// The stored record.
    pub file: FileRecord,
}

/// A single presigned URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresignedUrlResponse {
    /// URL carrying the download token.
    pub presigned_url: String,
    /// Token type that was issued.
    pub token_type: String,
}

/// One failed slot of a batch request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchError {
    /// Identifier as sent by the client.
    pub file_id: String,
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

impl BatchError {
    /// Build the slot for `file_id` from an error.
    pub fn new(file_id: String, err: &AppError) -> Self {
        Self {
            file_id,
            error: err.kind.code().to_string(),
            message: err.message.clone(),
        }
    }
}

/// Presigned URLs for a batch of files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchPresignResponse {
    /// URLs by file identifier.
    pub presigned_urls: BTreeMap<String, String>,
    /// Per-file failures.
    pub errors: Vec<BatchError>,
}

/// Download URL returned after token validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadResponse {
    /// Short-lived URL to the blob.
    pub download_url: String,
    /// Lifetime of the URL in minutes.
    pub expires_in_minutes: u64,
}

/// Outcome of one slot of a batch delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteOutcome {
    /// Whether the file was removed from both stores.
    pub deleted: bool,
    /// Error code when not deleted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Error message when not deleted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&Result<(), AppError>> for DeleteOutcome {
    fn from(result: &Result<(), AppError>) -> Self {
        match result {
            Ok(()) => Self {
                deleted: true,
                error: None,
                message: None,
            },
            Err(e) => Self {
                deleted: false,
                error: Some(e.kind.code().to_string()),
                message: Some(e.message.clone()),
            },
        }
    }
}

/// Results of a batch delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchDeleteResponse {
    /// Outcome by file identifier.
    pub results: BTreeMap<String, DeleteOutcome>,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

/// Liveness and store reachability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Object store provider and reachability.
    pub storage: String,
    /// Metadata store provider and reachability.
    pub database: String,
}
