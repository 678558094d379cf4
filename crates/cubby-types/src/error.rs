//! Error taxonomy shared by every vault operation.
//!
//! All variants are recoverable per-request: they are reported to the
//! caller as typed failures and never take the process down. The only
//! fatal condition in the system is failing to create the base storage
//! root at startup, and that is handled before any of these can occur.

use thiserror::Error;

/// Result type for vault operations.
pub type VfsResult<T> = Result<T, VfsError>;

/// Vault operation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VfsError {
    /// A path token failed the name grammar. Rejected before any
    /// storage call is made.
    #[error("invalid name: {0:?}")]
    InvalidName(String),
    /// A resolved path fell outside the identity's private root.
    #[error("path escapes private root")]
    OutsideRoot,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    /// Attempted to move above the private root.
    #[error("already at root")]
    AtRoot,
    #[error("not a directory: {0}")]
    NotADirectory(String),
    /// Underlying storage failure, wrapping an opaque diagnostic.
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for VfsError {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind;
        match err.kind() {
            ErrorKind::NotFound => VfsError::NotFound(err.to_string()),
            ErrorKind::AlreadyExists => VfsError::Conflict(err.to_string()),
            ErrorKind::NotADirectory => VfsError::NotADirectory(err.to_string()),
            _ => VfsError::Io(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn maps_io_error_kinds() {
        let err: VfsError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, VfsError::NotFound(_)));

        let err: VfsError = io::Error::new(io::ErrorKind::AlreadyExists, "taken").into();
        assert!(matches!(err, VfsError::Conflict(_)));

        let err: VfsError = io::Error::other("disk fell over").into();
        assert!(matches!(err, VfsError::Io(_)));
    }

    #[test]
    fn messages_are_lowercase_and_terse() {
        assert_eq!(VfsError::AtRoot.to_string(), "already at root");
        assert_eq!(
            VfsError::NotFound("a.txt".into()).to_string(),
            "not found: a.txt"
        );
    }
}
