//! JWT claims carried by bearer tokens.

use serde::{Deserialize, Serialize};

/// Claims payload of a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Identity of the caller. Becomes the owner of uploaded files.
    pub user_id: String,
    /// Role name assigned by the identity service.
    #[serde(default)]
    pub role: String,
    /// Issued-at timestamp (seconds since epoch).
    #[serde(default)]
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}
