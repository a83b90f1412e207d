//! Maps `AppError` to HTTP responses.
//!
//! The mapping itself lives in `secureshare_core::http` (orphan rule).

pub use secureshare_core::http::{ApiErrorResponse, status_for};
