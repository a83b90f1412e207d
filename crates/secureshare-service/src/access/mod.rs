//! Download token issuance and validation.

pub mod manager;

pub use manager::{AccessTokenManager, BatchIssue, MAX_PRESIGN_DURATION};
