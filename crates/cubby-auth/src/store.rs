//! JSON-backed user records with salted password digests.
//!
//! The store holds `username → {salt, digest}` where
//! `digest = sha256(salt ‖ password)`, hex-encoded. Plaintext passwords
//! never touch disk. The whole map is loaded at startup and rewritten
//! through a temp-file rename on every mutation, so a crash mid-write
//! leaves the previous file intact.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::sync::RwLock;
use uuid::Uuid;

use cubby_types::validate_name;

use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserRecord {
    salt: String,
    digest: String,
}

/// On-disk user registry.
#[derive(Debug)]
pub struct UserStore {
    path: PathBuf,
    users: RwLock<HashMap<String, UserRecord>>,
}

impl UserStore {
    /// Load the registry at `path`, starting empty when the file does
    /// not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> AuthResult<Self> {
        let path = path.into();
        let users = match fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            users: RwLock::new(users),
        })
    }

    /// Register a new user. The username must satisfy the shared name
    /// grammar; a taken name is a `Taken` error.
    pub async fn register(&self, username: &str, password: &str) -> AuthResult<()> {
        validate_name(username).map_err(|_| AuthError::InvalidName(username.to_string()))?;

        let mut users = self.users.write().await;
        if users.contains_key(username) {
            return Err(AuthError::Taken(username.to_string()));
        }
        let salt = Uuid::new_v4().simple().to_string();
        let digest = digest(&salt, password);
        users.insert(username.to_string(), UserRecord { salt, digest });
        self.persist(&users).await?;
        tracing::info!(username, "registered user");
        Ok(())
    }

    /// Check a username/password pair. Unknown users and wrong passwords
    /// both come back `false`.
    pub async fn authenticate(&self, username: &str, password: &str) -> bool {
        let users = self.users.read().await;
        match users.get(username) {
            Some(record) => digest(&record.salt, password) == record.digest,
            None => false,
        }
    }

    /// Rewrite the registry through a temp file so the previous version
    /// survives a crash mid-write.
    async fn persist(&self, users: &HashMap<String, UserRecord>) -> AuthResult<()> {
        let json = serde_json::to_string_pretty(users)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn digest(salt: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_store_path() -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        env::temp_dir().join(format!(
            "cubby-users-{}-{}.json",
            std::process::id(),
            id
        ))
    }

    async fn cleanup(path: &Path) {
        let _ = fs::remove_file(path).await;
    }

    #[tokio::test]
    async fn test_register_then_authenticate() {
        let path = temp_store_path();
        let store = UserStore::open(&path).await.unwrap();

        store.register("alice", "hunter2").await.unwrap();
        assert!(store.authenticate("alice", "hunter2").await);
        assert!(!store.authenticate("alice", "wrong").await);
        assert!(!store.authenticate("nobody", "hunter2").await);

        cleanup(&path).await;
    }

    #[tokio::test]
    async fn test_duplicate_username_is_taken() {
        let path = temp_store_path();
        let store = UserStore::open(&path).await.unwrap();

        store.register("alice", "one").await.unwrap();
        let err = store.register("alice", "two").await.unwrap_err();
        assert_eq!(err, AuthError::Taken("alice".to_string()));

        cleanup(&path).await;
    }

    #[tokio::test]
    async fn test_username_must_pass_name_grammar() {
        let path = temp_store_path();
        let store = UserStore::open(&path).await.unwrap();

        for bad in ["", "..", "a/b", "with space"] {
            let err = store.register(bad, "pw").await.unwrap_err();
            assert!(matches!(err, AuthError::InvalidName(_)), "{bad:?}");
        }

        cleanup(&path).await;
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let path = temp_store_path();
        {
            let store = UserStore::open(&path).await.unwrap();
            store.register("alice", "hunter2").await.unwrap();
        }
        let store = UserStore::open(&path).await.unwrap();
        assert!(store.authenticate("alice", "hunter2").await);

        cleanup(&path).await;
    }

    #[tokio::test]
    async fn test_passwords_are_not_stored_in_the_clear() {
        let path = temp_store_path();
        let store = UserStore::open(&path).await.unwrap();
        store.register("alice", "hunter2").await.unwrap();

        let raw = fs::read_to_string(&path).await.unwrap();
        assert!(!raw.contains("hunter2"));

        cleanup(&path).await;
    }

    #[tokio::test]
    async fn test_salts_differ_between_users() {
        let path = temp_store_path();
        let store = UserStore::open(&path).await.unwrap();
        store.register("alice", "same-pw").await.unwrap();
        store.register("bob", "same-pw").await.unwrap();

        let raw = fs::read_to_string(&path).await.unwrap();
        let users: HashMap<String, UserRecord> = serde_json::from_str(&raw).unwrap();
        assert_ne!(users["alice"].digest, users["bob"].digest);

        cleanup(&path).await;
    }
}
