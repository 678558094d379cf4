//! The shared name grammar for path tokens.
//!
//! A token is one filename or directory-name segment, never a path. The
//! grammar is the primary anti-traversal defense: separators and `..`
//! never pass it, so nothing reaching the storage layer can climb out of
//! a private root on its own. The root-boundary check downstream is a
//! second, independent defense.
//!
//! Usernames go through the same grammar — an identity becomes a
//! directory name under the storage root.

use crate::error::{VfsError, VfsResult};

/// Returns true if `token` is a valid single segment: non-empty, only
/// `[A-Za-z0-9_.-]`, and without a `..` sequence.
pub fn is_valid_name(token: &str) -> bool {
    !token.is_empty()
        && !token.contains("..")
        && token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'-'))
}

/// Validate a token, rejecting with `InvalidName` before anything
/// touches storage.
pub fn validate_name(token: &str) -> VfsResult<()> {
    if is_valid_name(token) {
        Ok(())
    } else {
        Err(VfsError::InvalidName(token.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_names() {
        for name in ["a.txt", "notes", "My_File-2.log", ".hidden", "2024"] {
            assert!(is_valid_name(name), "{name:?} should be valid");
        }
    }

    #[test]
    fn rejects_separators_and_traversal() {
        for name in ["", "..", "../../etc/passwd", "a/b", "a..b", "/etc"] {
            assert!(!is_valid_name(name), "{name:?} should be rejected");
        }
    }

    #[test]
    fn rejects_non_ascii_and_whitespace() {
        for name in ["sp ace", "tab\there", "naïve", "emoji💾", "back\\slash"] {
            assert!(!is_valid_name(name), "{name:?} should be rejected");
        }
    }

    #[test]
    fn validate_reports_the_offending_token() {
        let err = validate_name("../up").unwrap_err();
        assert_eq!(err, VfsError::InvalidName("../up".to_string()));
    }
}
