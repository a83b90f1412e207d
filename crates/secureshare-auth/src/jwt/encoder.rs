//! Bearer token creation.
//!
//! Production tokens come from the identity service. This encoder shares
//! its secret and claim layout so local tooling and tests can mint tokens.

use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};

use secureshare_core::config::AuthConfig;
use secureshare_core::error::AppError;

use super::claims::Claims;

/// Signs HS256 bearer tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder").finish_non_exhaustive()
    }
}

impl JwtEncoder {
    /// Creates an encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        }
    }

    /// Mint a token for `user_id` valid for `ttl` from now.
    pub fn issue(&self, user_id: &str, role: &str, ttl: chrono::Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            user_id: user_id.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))
    }
}
