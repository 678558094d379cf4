//! The auth collaborator surface.
//!
//! Consumers hold an `Arc<dyn Authority>` and never see password or
//! token internals — only resolved identities or rejections.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AuthError, AuthResult};
use crate::store::UserStore;
use crate::tokens::TokenTable;

/// What the rest of the system is allowed to ask of auth.
#[async_trait]
pub trait Authority: Send + Sync {
    /// Create a new user record.
    async fn register(&self, identity: &str, secret: &str) -> AuthResult<()>;
    /// Verify credentials and issue an opaque session token.
    async fn login(&self, identity: &str, secret: &str) -> AuthResult<String>;
    /// Resolve an opaque credential to an identity, or reject it.
    async fn authorize(&self, credential: &str) -> Option<String>;
    /// Invalidate a credential. Unknown credentials are a no-op.
    async fn revoke(&self, credential: &str);
}

/// Production [`Authority`]: JSON user store + in-memory token table.
#[derive(Debug)]
pub struct AuthService {
    store: UserStore,
    tokens: TokenTable,
}

impl AuthService {
    /// Open the user store at `users_path`; issued tokens live for `ttl`.
    pub async fn open(users_path: impl Into<PathBuf>, ttl: Duration) -> AuthResult<Self> {
        Ok(Self {
            store: UserStore::open(users_path).await?,
            tokens: TokenTable::new(ttl),
        })
    }
}

#[async_trait]
impl Authority for AuthService {
    async fn register(&self, identity: &str, secret: &str) -> AuthResult<()> {
        self.store.register(identity, secret).await
    }

    async fn login(&self, identity: &str, secret: &str) -> AuthResult<String> {
        if self.store.authenticate(identity, secret).await {
            tracing::info!(identity, "login");
            Ok(self.tokens.issue(identity))
        } else {
            tracing::debug!(identity, "rejected login");
            Err(AuthError::InvalidCredentials)
        }
    }

    async fn authorize(&self, credential: &str) -> Option<String> {
        self.tokens.authorize(credential)
    }

    async fn revoke(&self, credential: &str) {
        self.tokens.revoke(credential);
    }
}
