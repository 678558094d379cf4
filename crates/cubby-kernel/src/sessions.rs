//! Per-identity session cursors.
//!
//! Maps identity → current-directory cursor. The map is sharded, so
//! requests for different identities never contend, and an update for one
//! identity is atomic at its shard. Cursor values are handed out as owned
//! copies: nothing outside this table holds a live reference into it, and
//! no shard lock is ever held across storage I/O.

use std::path::PathBuf;

use dashmap::DashMap;
use tokio::fs;

use cubby_types::{validate_name, VfsResult};

/// Identity → cursor table, plus the storage-root convention.
#[derive(Debug)]
pub struct SessionTable {
    base: PathBuf,
    cursors: DashMap<String, PathBuf>,
}

impl SessionTable {
    /// Wrap an existing base storage directory. The caller creates and
    /// canonicalizes `base` at startup.
    pub fn new(base: PathBuf) -> Self {
        Self {
            base,
            cursors: DashMap::new(),
        }
    }

    /// The private root for an identity: `base / identity`.
    pub fn root_of(&self, identity: &str) -> PathBuf {
        self.base.join(identity)
    }

    /// Current cursor for `identity`.
    ///
    /// First reference to an identity creates its private root on disk
    /// and seeds the cursor with it; both steps are idempotent, so a
    /// racing first reference is harmless. Directory-creation failures
    /// surface as `Io`, never silently.
    pub async fn cursor(&self, identity: &str) -> VfsResult<PathBuf> {
        validate_name(identity)?;
        if let Some(cursor) = self.cursors.get(identity) {
            return Ok(cursor.clone());
        }
        let root = self.root_of(identity);
        fs::create_dir_all(&root).await?;
        tracing::debug!(identity, root = %root.display(), "initialized session cursor");
        // Keep whichever entry a racing first reference landed.
        let cursor = self.cursors.entry(identity.to_string()).or_insert(root);
        Ok(cursor.clone())
    }

    /// Commit a new cursor for `identity`. Callers only pass paths that
    /// already passed resolution and containment.
    pub fn set_cursor(&self, identity: &str, cursor: PathBuf) {
        self.cursors.insert(identity.to_string(), cursor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubby_types::VfsError;
    use std::env;
    use std::path::Path;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_base() -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        env::temp_dir().join(format!("cubby-test-{}-{}", std::process::id(), id))
    }

    async fn setup() -> (SessionTable, PathBuf) {
        let base = temp_base();
        let _ = fs::remove_dir_all(&base).await;
        fs::create_dir_all(&base).await.unwrap();
        (SessionTable::new(base.clone()), base)
    }

    async fn cleanup(base: &Path) {
        let _ = fs::remove_dir_all(base).await;
    }

    #[tokio::test]
    async fn test_first_reference_creates_private_root() {
        let (table, base) = setup().await;

        let cursor = table.cursor("alice").await.unwrap();
        assert_eq!(cursor, base.join("alice"));
        assert!(base.join("alice").is_dir());

        cleanup(&base).await;
    }

    #[tokio::test]
    async fn test_repeated_references_are_idempotent() {
        let (table, base) = setup().await;

        let first = table.cursor("alice").await.unwrap();
        let second = table.cursor("alice").await.unwrap();
        assert_eq!(first, second);

        cleanup(&base).await;
    }

    #[tokio::test]
    async fn test_set_cursor_survives_reads() {
        let (table, base) = setup().await;

        table.cursor("alice").await.unwrap();
        let docs = base.join("alice").join("docs");
        table.set_cursor("alice", docs.clone());
        assert_eq!(table.cursor("alice").await.unwrap(), docs);

        cleanup(&base).await;
    }

    #[tokio::test]
    async fn test_identities_get_disjoint_roots() {
        let (table, base) = setup().await;

        let alice = table.cursor("alice").await.unwrap();
        let bob = table.cursor("bob").await.unwrap();
        assert_ne!(alice, bob);
        assert!(!alice.starts_with(&bob));
        assert!(!bob.starts_with(&alice));

        cleanup(&base).await;
    }

    #[tokio::test]
    async fn test_invalid_identity_is_rejected_before_storage() {
        let (table, base) = setup().await;

        let err = table.cursor("../escape").await.unwrap_err();
        assert!(matches!(err, VfsError::InvalidName(_)));
        assert!(!base.join("..").join("escape").exists());

        cleanup(&base).await;
    }

    #[tokio::test]
    async fn test_concurrent_first_references_agree() {
        let (table, base) = setup().await;
        let table = Arc::new(table);

        let mut handles = Vec::new();
        for _ in 0..16 {
            let table = Arc::clone(&table);
            handles.push(tokio::spawn(
                async move { table.cursor("carol").await.unwrap() },
            ));
        }
        let expected = base.join("carol");
        for handle in handles {
            assert_eq!(handle.await.unwrap(), expected);
        }

        cleanup(&base).await;
    }
}
