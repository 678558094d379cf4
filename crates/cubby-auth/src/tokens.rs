//! Opaque session tokens with expiry.
//!
//! A token is a random 128-bit value issued at login and held only in
//! this table; authorizing is a lookup, so revocation is immediate and
//! nothing about a token can be validated offline. Expired entries are
//! evicted when they are next observed.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use uuid::Uuid;

#[derive(Debug)]
struct Session {
    identity: String,
    expires_at: Instant,
}

/// token → session table. Sharded, so lookups for unrelated tokens never
/// contend.
#[derive(Debug)]
pub struct TokenTable {
    ttl: Duration,
    sessions: DashMap<String, Session>,
}

impl TokenTable {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: DashMap::new(),
        }
    }

    /// Issue a fresh token for `identity`.
    pub fn issue(&self, identity: &str) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.sessions.insert(
            token.clone(),
            Session {
                identity: identity.to_string(),
                expires_at: Instant::now() + self.ttl,
            },
        );
        token
    }

    /// Resolve a token to its identity, if it exists and has not expired.
    pub fn authorize(&self, token: &str) -> Option<String> {
        {
            let session = self.sessions.get(token)?;
            if Instant::now() < session.expires_at {
                return Some(session.identity.clone());
            }
        }
        // Expired: evict now that the shard guard is released.
        self.sessions.remove(token);
        None
    }

    /// Drop a token. Unknown tokens are a no-op.
    pub fn revoke(&self, token: &str) {
        self.sessions.remove(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_then_authorize() {
        let table = TokenTable::new(Duration::from_secs(3600));
        let token = table.issue("alice");
        assert_eq!(table.authorize(&token), Some("alice".to_string()));
    }

    #[test]
    fn test_tokens_are_unique_and_opaque() {
        let table = TokenTable::new(Duration::from_secs(3600));
        let a = table.issue("alice");
        let b = table.issue("alice");
        assert_ne!(a, b);
        assert!(!a.contains("alice"));
    }

    #[test]
    fn test_unknown_token_is_rejected() {
        let table = TokenTable::new(Duration::from_secs(3600));
        assert_eq!(table.authorize("no-such-token"), None);
    }

    #[test]
    fn test_revoked_token_is_rejected() {
        let table = TokenTable::new(Duration::from_secs(3600));
        let token = table.issue("alice");
        table.revoke(&token);
        assert_eq!(table.authorize(&token), None);
    }

    #[test]
    fn test_expired_token_is_rejected_and_evicted() {
        let table = TokenTable::new(Duration::ZERO);
        let token = table.issue("alice");
        assert_eq!(table.authorize(&token), None);
        // Evicted on first observation; still rejected afterwards.
        assert_eq!(table.authorize(&token), None);
    }
}
