//! `AuthUser` extractor: pulls the bearer token from the Authorization
//! header and verifies it.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use secureshare_core::error::AppError;

use crate::state::AppState;

/// The verified caller.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Identity from the `user_id` claim.
    pub user_id: String,
    /// Role from the `role` claim.
    pub role: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::authentication("Missing Authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::authentication("Invalid Authorization header format"))?;

        let claims = state.jwt_decoder.decode(token)?;
        Ok(Self {
            user_id: claims.user_id,
            role: claims.role,
        })
    }
}
