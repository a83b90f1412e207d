//! # secureshare-core
//!
//! Core crate for SecureShare. Contains the collaborator traits consumed by
//! the transfer layer, configuration schemas, typed identifiers, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other SecureShare crates.

pub mod config;
pub mod error;
pub mod http;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
