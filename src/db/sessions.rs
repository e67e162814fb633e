// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory session store keyed by the id carried in the signed session cookie.
//!
//! Sessions only live as long as the process. Each operation touches a single
//! entry under the map's shard lock, so a writer never exposes a half-updated
//! token set to a concurrent reader.

use crate::models::{Session, TokenGrant};
use dashmap::DashMap;
use std::sync::Arc;

/// Shared session store; cheap to clone.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the session for `id`, if any.
    pub fn get(&self, id: &str) -> Option<Session> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    /// Store a complete session, replacing any previous one.
    pub fn set(&self, id: &str, session: Session) {
        self.sessions.insert(id.to_string(), session);
    }

    /// Overwrite the token set of an existing session, keeping the athlete.
    ///
    /// Returns `false` if the session disappeared (e.g. a concurrent logout).
    pub fn update_tokens(&self, id: &str, grant: TokenGrant) -> bool {
        match self.sessions.get_mut(id) {
            Some(mut entry) => {
                entry.apply_grant(grant);
                true
            }
            None => false,
        }
    }

    /// Remove the whole session. Returns whether one existed.
    pub fn clear(&self, id: &str) -> bool {
        self.sessions.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session(access: &str) -> Session {
        Session::new(
            TokenGrant {
                access_token: access.to_string(),
                refresh_token: "refresh".to_string(),
                expires_at: 100,
            },
            json!({ "id": 7 }),
        )
    }

    #[test]
    fn test_set_get_clear() {
        let store = SessionStore::new();
        assert!(store.get("sid").is_none());

        store.set("sid", session("abc"));
        assert_eq!(store.get("sid").unwrap().access_token, "abc");
        assert_eq!(store.len(), 1);

        assert!(store.clear("sid"));
        assert!(store.get("sid").is_none());
        assert!(!store.clear("sid"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = SessionStore::new();
        store.set("one", session("first"));
        store.set("two", session("second"));

        store.clear("one");

        assert!(store.get("one").is_none());
        assert_eq!(store.get("two").unwrap().access_token, "second");
    }

    #[test]
    fn test_update_tokens() {
        let store = SessionStore::new();
        store.set("sid", session("old"));

        let updated = store.update_tokens(
            "sid",
            TokenGrant {
                access_token: "new".to_string(),
                refresh_token: "new_refresh".to_string(),
                expires_at: 200,
            },
        );
        assert!(updated);

        let stored = store.get("sid").unwrap();
        assert_eq!(stored.access_token, "new");
        assert_eq!(stored.refresh_token, "new_refresh");
        assert_eq!(stored.expires_at, 200);
        assert_eq!(stored.athlete, json!({ "id": 7 }));
    }

    #[test]
    fn test_update_tokens_missing_session() {
        let store = SessionStore::new();
        let grant = TokenGrant {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_at: 1,
        };
        assert!(!store.update_tokens("gone", grant));
        assert!(store.is_empty());
    }
}
