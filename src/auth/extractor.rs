use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::auth::token::TokenPurpose;
use crate::error::AppError;
use crate::state::SharedState;

/// Authenticated caller, extracted from a Bearer login token. Reset-purpose
/// tokens are rejected here; they only authorize the password-reset endpoint.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub account_id: Uuid,
}

impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .ok_or_else(|| AppError::Unauthorized("Missing authentication token".to_string()))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid authorization header".to_string()))?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Missing authentication token".to_string()))?;

        let claims = state
            .tokens
            .validate(token, TokenPurpose::Login, state.clock.now())
            .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(AuthUser {
            account_id: claims.sub,
        })
    }
}
