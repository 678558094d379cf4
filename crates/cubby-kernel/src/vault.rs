//! The vault: every filesystem operation an identity can perform.
//!
//! All operations run the same sequence — name grammar, cursor resolution,
//! containment check, storage call — and report failures as typed
//! `VfsError` values. The session table owns the cursors; operations work
//! on snapshots and never hold a table lock across I/O, so requests for
//! different identities proceed independently.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;

use cubby_types::{validate_name, DirEntry, VfsError, VfsResult};

use crate::resolve;
use crate::sessions::SessionTable;

/// Root handle for all per-identity filesystem state.
///
/// Cheap to share behind an `Arc`; every method takes `&self`.
#[derive(Debug)]
pub struct Vault {
    sessions: SessionTable,
}

impl Vault {
    /// Open a vault over `base`, creating the directory if missing and
    /// canonicalizing it so containment prefixes stay stable. Failure
    /// here is the one fatal condition in the system; the caller aborts
    /// startup on it.
    pub async fn open(base: impl Into<PathBuf>) -> VfsResult<Self> {
        let base = base.into();
        fs::create_dir_all(&base).await?;
        let base = fs::canonicalize(&base).await?;
        tracing::info!(base = %base.display(), "vault opened");
        Ok(Self {
            sessions: SessionTable::new(base),
        })
    }

    // ════════════════════════════════════════════════════════════════════
    // File and directory operations (cursor-relative)
    // ════════════════════════════════════════════════════════════════════

    /// Entries directly under the cursor, in storage enumeration order.
    ///
    /// A cursor directory that has gone missing (removed out from under
    /// the session) is lazily re-created and listed as empty.
    pub async fn list(&self, identity: &str) -> VfsResult<Vec<DirEntry>> {
        let cursor = self.sessions.cursor(identity).await?;
        let root = self.sessions.root_of(identity);
        self.guard(identity, &root, &cursor)?;

        fs::create_dir_all(&cursor).await?;
        let mut dir = fs::read_dir(&cursor).await?;
        let mut entries = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            let file_type = entry.file_type().await?;
            entries.push(if file_type.is_dir() {
                DirEntry::directory(name)
            } else {
                DirEntry::file(name)
            });
        }
        Ok(entries)
    }

    /// Create a directory named `name` under the cursor.
    pub async fn make_directory(&self, identity: &str, name: &str) -> VfsResult<()> {
        let target = self.resolve_name(identity, name).await?;
        fs::create_dir(&target).await.map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => VfsError::Conflict(name.to_string()),
            _ => e.into(),
        })
    }

    /// Remove the directory `name` under the cursor, recursively.
    /// Succeeds even when the directory still has contents.
    pub async fn remove_directory(&self, identity: &str, name: &str) -> VfsResult<()> {
        let target = self.resolve_name(identity, name).await?;
        fs::remove_dir_all(&target).await.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => VfsError::NotFound(name.to_string()),
            io::ErrorKind::NotADirectory => VfsError::NotADirectory(name.to_string()),
            _ => e.into(),
        })
    }

    /// Create `name` under the cursor with the given bytes. Truncates an
    /// existing file of the same name.
    pub async fn create_file(&self, identity: &str, name: &str, content: &[u8]) -> VfsResult<()> {
        self.write_file(identity, name, content).await
    }

    /// Read the bytes of `name` under the cursor.
    ///
    /// A missing file is `NotFound`; an empty file reads back as zero
    /// bytes. The two never conflate.
    pub async fn read_file(&self, identity: &str, name: &str) -> VfsResult<Vec<u8>> {
        let target = self.resolve_name(identity, name).await?;
        fs::read(&target).await.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => VfsError::NotFound(name.to_string()),
            _ => e.into(),
        })
    }

    /// Truncating write of `content` to `name` under the cursor.
    pub async fn write_file(&self, identity: &str, name: &str, content: &[u8]) -> VfsResult<()> {
        let target = self.resolve_name(identity, name).await?;
        fs::write(&target, content).await.map_err(Into::into)
    }

    /// Append `content` to `name` under the cursor, creating the file if
    /// it does not exist yet.
    pub async fn append_file(&self, identity: &str, name: &str, content: &[u8]) -> VfsResult<()> {
        let target = self.resolve_name(identity, name).await?;
        let mut file = fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&target)
            .await?;
        file.write_all(content).await?;
        Ok(())
    }

    /// Delete the file `name` under the cursor.
    pub async fn delete_file(&self, identity: &str, name: &str) -> VfsResult<()> {
        let target = self.resolve_name(identity, name).await?;
        fs::remove_file(&target).await.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => VfsError::NotFound(name.to_string()),
            _ => e.into(),
        })
    }

    /// Rename `old_name` to `new_name`, both under the cursor.
    ///
    /// Fails with `NotFound` when the source is absent and `Conflict`
    /// when the destination already exists. The move itself is a single
    /// rename syscall, so after success exactly one of the two names
    /// exists.
    pub async fn rename(&self, identity: &str, old_name: &str, new_name: &str) -> VfsResult<()> {
        validate_name(old_name)?;
        validate_name(new_name)?;
        let cursor = self.sessions.cursor(identity).await?;
        let root = self.sessions.root_of(identity);
        let src = resolve::resolve_step(&root, &cursor, old_name)?;
        let dst = resolve::resolve_step(&root, &cursor, new_name)?;
        self.guard(identity, &root, &src)?;
        self.guard(identity, &root, &dst)?;

        if fs::try_exists(&dst).await? {
            return Err(VfsError::Conflict(new_name.to_string()));
        }
        fs::rename(&src, &dst).await.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => VfsError::NotFound(old_name.to_string()),
            _ => e.into(),
        })
    }

    // ════════════════════════════════════════════════════════════════════
    // Navigation (cursor-mutating)
    // ════════════════════════════════════════════════════════════════════

    /// Change the cursor to `target` — `".."`, `""`, or the name of an
    /// existing child directory. On any failure the cursor is left
    /// unchanged and a typed rejection comes back, never a silent no-op.
    /// Returns the new virtual path (`/`, `/docs`, ...).
    pub async fn change_directory(&self, identity: &str, target: &str) -> VfsResult<String> {
        let cursor = self.sessions.cursor(identity).await?;
        let root = self.sessions.root_of(identity);
        let next = resolve::resolve_step(&root, &cursor, target)?;
        self.guard(identity, &root, &next)?;

        if next != cursor {
            let meta = fs::metadata(&next).await.map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => VfsError::NotFound(target.to_string()),
                _ => e.into(),
            })?;
            if !meta.is_dir() {
                return Err(VfsError::NotADirectory(target.to_string()));
            }
        }
        self.sessions.set_cursor(identity, next.clone());
        Ok(virtual_path(&root, &next))
    }

    /// Move the cursor to its parent. `AtRoot` at the private root.
    pub async fn move_up(&self, identity: &str) -> VfsResult<String> {
        self.change_directory(identity, "..").await
    }

    /// Reset the cursor to the private root.
    pub async fn go_home(&self, identity: &str) -> VfsResult<String> {
        self.sessions.cursor(identity).await?;
        let root = self.sessions.root_of(identity);
        self.sessions.set_cursor(identity, root);
        Ok("/".to_string())
    }

    /// The cursor as a virtual path. Pure read, no mutation.
    pub async fn current_directory(&self, identity: &str) -> VfsResult<String> {
        let cursor = self.sessions.cursor(identity).await?;
        let root = self.sessions.root_of(identity);
        Ok(virtual_path(&root, &cursor))
    }

    // ════════════════════════════════════════════════════════════════════
    // Helpers
    // ════════════════════════════════════════════════════════════════════

    /// Grammar → cursor → resolve → containment, for single-name
    /// operations. Rejected names never reach storage.
    async fn resolve_name(&self, identity: &str, name: &str) -> VfsResult<PathBuf> {
        validate_name(name)?;
        let cursor = self.sessions.cursor(identity).await?;
        let root = self.sessions.root_of(identity);
        let target = resolve::resolve_step(&root, &cursor, name)?;
        self.guard(identity, &root, &target)?;
        Ok(target)
    }

    fn guard(&self, identity: &str, root: &Path, candidate: &Path) -> VfsResult<()> {
        resolve::ensure_contained(root, candidate).inspect_err(|_| {
            tracing::warn!(
                identity,
                candidate = %candidate.display(),
                "blocked path outside private root"
            );
        })
    }
}

/// Render a cursor as its identity-relative virtual path.
fn virtual_path(root: &Path, cursor: &Path) -> String {
    match cursor.strip_prefix(root) {
        Ok(rel) if rel.as_os_str().is_empty() => "/".to_string(),
        Ok(rel) => format!("/{}", rel.display()),
        // Cursors are root-contained by invariant.
        Err(_) => "/".to_string(),
    }
}
