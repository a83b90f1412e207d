//! # secureshare-auth
//!
//! Verification of the HS256 bearer tokens issued by the external identity
//! service. The authenticated identity is the `user_id` claim; SecureShare
//! keeps no user table of its own.
//!
//! ## Modules
//!
//! - `jwt`: claims, decoding with expiry validation, and an encoder used
//!   by tooling and tests

pub mod jwt;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
