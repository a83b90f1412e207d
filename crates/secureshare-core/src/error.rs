//! Unified application error types for SecureShare.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the `?` operator. The kinds listed first in
//! [`ErrorKind`] are the domain failures of the transfer layer; the rest
//! describe adapter, edge and startup failures.

use std::fmt;
use thiserror::Error;

/// Error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Malformed identifier, missing file, or otherwise unusable input.
    InvalidInput,
    /// The caller is not the owner of the record.
    Unauthorized,
    /// The record is absent or not owned by the caller. Deliberately merged
    /// so that non-owners cannot probe for existence.
    NotFoundOrForbidden,
    /// Writing the blob to the object store failed.
    StorageWriteFailure,
    /// Writing or updating the metadata record failed.
    MetadataWriteFailure,
    /// The metadata record was removed but the blob was not.
    StorageDeletionFailure,
    /// The blob was removed but the metadata record was not.
    MetadataDeletionFailure,
    /// Neither the blob nor the metadata record could be removed.
    FullDeletionFailure,
    /// The presented download token does not match the stored token.
    InvalidToken,
    /// The presented download token is past its expiry instant.
    TokenExpired,
    /// The secure random source could not produce a token.
    TokenGenerationFailure,
    /// The caller's credentials are missing or invalid.
    Authentication,
    /// An object store adapter call failed.
    Storage,
    /// A metadata store adapter call failed.
    Database,
    /// An external call did not finish within its deadline.
    Timeout,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl ErrorKind {
    /// Machine-readable code for this kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput => "INVALID_INPUT",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::NotFoundOrForbidden => "NOT_FOUND_OR_FORBIDDEN",
            Self::StorageWriteFailure => "STORAGE_WRITE_FAILURE",
            Self::MetadataWriteFailure => "METADATA_WRITE_FAILURE",
            Self::StorageDeletionFailure => "STORAGE_DELETION_FAILURE",
            Self::MetadataDeletionFailure => "METADATA_DELETION_FAILURE",
            Self::FullDeletionFailure => "FULL_DELETION_FAILURE",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::TokenGenerationFailure => "TOKEN_GENERATION_FAILURE",
            Self::Authentication => "AUTHENTICATION",
            Self::Storage => "STORAGE",
            Self::Database => "DATABASE",
            Self::Timeout => "TIMEOUT",
            Self::Configuration => "CONFIGURATION",
            Self::Serialization => "SERIALIZATION",
            Self::Internal => "INTERNAL",
        }
    }
}

/// The unified application error used throughout SecureShare.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Re-categorize an error while keeping it as the source of the new one.
    ///
    /// Used by the transfer layer to turn an adapter failure into a domain
    /// failure with operation and identifier context.
    pub fn wrap(kind: ErrorKind, context: impl Into<String>, cause: AppError) -> Self {
        let context = context.into();
        Self {
            kind,
            message: format!("{context}: {}", cause.message),
            source: Some(Box::new(cause)),
        }
    }

    /// Whether this error has the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }

    /// Create an invalid-input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    /// Create an ownership-mismatch error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// Create a not-found-or-forbidden error.
    pub fn not_found_or_forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFoundOrForbidden, message)
    }

    /// Create an invalid-token error.
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidToken, message)
    }

    /// Create a token-expired error.
    pub fn token_expired(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenExpired, message)
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    /// Create an object store error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// Create a metadata store error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Internal, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
