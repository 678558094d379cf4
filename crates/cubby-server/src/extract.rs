//! Request authentication.
//!
//! Handlers that operate on a user's vault take a [`Session`] argument;
//! axum builds it from the `Authorization: Bearer <token>` header before
//! the handler body runs. A missing, malformed, or expired token turns
//! into a 401 without touching storage.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use crate::error::ApiError;
use crate::routes::AppState;

/// An authenticated caller.
#[derive(Debug, Clone)]
pub struct Session {
    /// Username the token was issued to. Doubles as the vault identity.
    pub identity: String,
    /// The raw bearer token, kept so `/logout` can revoke it.
    pub token: String,
}

impl FromRequestParts<AppState> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(ApiError::unauthorized)?;

        let identity = state
            .auth
            .authorize(token)
            .await
            .ok_or_else(ApiError::unauthorized)?;

        Ok(Session {
            identity,
            token: token.to_string(),
        })
    }
}
