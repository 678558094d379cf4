//! Error types for credential handling.

use thiserror::Error;

/// Result type for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Credential and session errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Username fails the shared name grammar (identities become
    /// directory names under the storage root).
    #[error("invalid name: {0:?}")]
    InvalidName(String),
    #[error("username taken: {0}")]
    Taken(String),
    /// Unknown user or wrong password — deliberately not distinguished.
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("user store corrupted: {0}")]
    Corrupt(String),
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for AuthError {
    fn from(err: std::io::Error) -> Self {
        AuthError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        AuthError::Corrupt(err.to_string())
    }
}
