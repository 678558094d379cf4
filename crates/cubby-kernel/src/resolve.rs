//! Pure path resolution against a session cursor.
//!
//! `resolve_step` computes where one requested step lands; `ensure_contained`
//! is the independent root-boundary check every operation runs on the
//! result. Neither function touches storage.

use std::path::{Path, PathBuf};

use cubby_types::{validate_name, VfsError, VfsResult};

/// Resolve one requested step against the current cursor.
///
/// - `".."` moves to the cursor's parent; rejected with `AtRoot` when the
///   cursor already sits at the private root.
/// - `""` leaves the cursor unchanged.
/// - Anything else must pass the name grammar and joins onto the cursor
///   as a single segment. Existence is the caller's concern.
pub fn resolve_step(root: &Path, cursor: &Path, requested: &str) -> VfsResult<PathBuf> {
    match requested {
        ".." => {
            if cursor == root {
                return Err(VfsError::AtRoot);
            }
            match cursor.parent() {
                Some(parent) => Ok(parent.to_path_buf()),
                None => Err(VfsError::AtRoot),
            }
        }
        "" => Ok(cursor.to_path_buf()),
        name => {
            validate_name(name)?;
            // Collecting components drops any `.` segment, so cursors
            // stay in normalized form.
            Ok(cursor.join(name).components().collect())
        }
    }
}

/// Reject `candidate` unless it equals `root` or sits below it.
///
/// `Path::starts_with` compares whole components, so a sibling such as
/// `/srv/store2` never passes for the root `/srv/store`.
pub fn ensure_contained(root: &Path, candidate: &Path) -> VfsResult<()> {
    if candidate.starts_with(root) {
        Ok(())
    } else {
        Err(VfsError::OutsideRoot)
    }
}
