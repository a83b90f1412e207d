//! Convenience result type alias for SecureShare.

use crate::error::AppError;

/// A specialized `Result` type for SecureShare operations.
pub type AppResult<T> = Result<T, AppError>;
