//! The error → HTTP response mapping.
//!
//! Every typed failure from the kernel, auth, or the voice supervisor
//! lands on exactly one status code, with the message in a JSON body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use cubby_auth::AuthError;
use cubby_types::VfsError;

use crate::voice::VoiceError;

/// A request-level failure, ready to render.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "invalid or missing token".to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<VfsError> for ApiError {
    fn from(err: VfsError) -> Self {
        let status = match &err {
            VfsError::InvalidName(_) | VfsError::AtRoot | VfsError::NotADirectory(_) => {
                StatusCode::BAD_REQUEST
            }
            VfsError::OutsideRoot => StatusCode::FORBIDDEN,
            VfsError::NotFound(_) => StatusCode::NOT_FOUND,
            VfsError::Conflict(_) => StatusCode::CONFLICT,
            VfsError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let status = match &err {
            AuthError::InvalidName(_) => StatusCode::BAD_REQUEST,
            AuthError::Taken(_) => StatusCode::CONFLICT,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Corrupt(_) | AuthError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<VoiceError> for ApiError {
    fn from(err: VoiceError) -> Self {
        let status = match &err {
            VoiceError::AlreadyRunning => StatusCode::CONFLICT,
            VoiceError::NotConfigured => StatusCode::NOT_IMPLEMENTED,
            VoiceError::Spawn(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(error = %self.message, "request failed");
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
