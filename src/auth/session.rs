//! Session management
//!
//! Server-side, in-process session state. The browser holds only an
//! opaque random token in a cookie; the token maps to the user id
//! here. All sessions are lost on restart.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rand::distributions::Alphanumeric;
use rand::Rng;

/// Length of the opaque session token
const TOKEN_LENGTH: usize = 32;

/// Cookie name holding the session token
pub const SESSION_COOKIE: &str = "session";

/// Server-side session data: the minimal identity
#[derive(Debug, Clone)]
pub struct Session {
    /// Id of the authenticated user
    pub user_id: String,
    /// When the session was created
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Check if the session has outlived the given max age
    pub fn is_expired(&self, max_age_seconds: i64) -> bool {
        self.created_at + Duration::seconds(max_age_seconds) < Utc::now()
    }
}

/// In-process session store
///
/// Token -> Session. Expired entries are dropped on access.
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    max_age_seconds: i64,
}

impl SessionStore {
    pub fn new(max_age_seconds: i64) -> Self {
        Self {
            sessions: DashMap::new(),
            max_age_seconds,
        }
    }

    /// Create a session for the given user and return its opaque token
    ///
    /// Also sweeps out expired sessions so abandoned logins do not
    /// accumulate for the lifetime of the process.
    pub fn create(&self, user_id: &str) -> String {
        self.sessions
            .retain(|_, session| !session.is_expired(self.max_age_seconds));

        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LENGTH)
            .map(char::from)
            .collect();

        self.sessions.insert(
            token.clone(),
            Session {
                user_id: user_id.to_string(),
                created_at: Utc::now(),
            },
        );

        token
    }

    /// Look up a session by token
    ///
    /// Returns `None` for unknown or expired tokens; expired entries
    /// are removed.
    pub fn get(&self, token: &str) -> Option<Session> {
        let session = self.sessions.get(token)?.clone();
        if session.is_expired(self.max_age_seconds) {
            self.sessions.remove(token);
            return None;
        }
        Some(session)
    }

    /// Remove a session (logout)
    pub fn remove(&self, token: &str) {
        self.sessions.remove(token);
    }

    /// Number of stored sessions, expired entries included
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

    #[test]
    fn create_and_get_session() {
        let store = SessionStore::new(3600);
        let token = store.create("user-1");
        assert_eq!(token.len(), TOKEN_LENGTH);

        let session = store.get(&token).unwrap();
        assert_eq!(session.user_id, "user-1");
    }

    #[test]
    fn unknown_token_yields_none() {
        let store = SessionStore::new(3600);
        assert!(store.get("nonexistent").is_none());
    }

    #[test]
    fn remove_clears_session() {
        let store = SessionStore::new(3600);
        let token = store.create("user-1");
        store.remove(&token);
        assert!(store.get(&token).is_none());
    }

    #[test]
    fn expired_session_is_dropped() {
        let store = SessionStore::new(0);
        let token = store.create("user-1");
        // max_age 0 means any elapsed time expires the session
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(store.get(&token).is_none());
    }

    #[test]
    fn create_sweeps_abandoned_expired_sessions() {
        let store = SessionStore::new(0);
        store.create("user-1");
        store.create("user-2");
        std::thread::sleep(std::time::Duration::from_millis(5));

        // The next login evicts the expired entries, whether or not
        // their tokens are ever presented again
        store.create("user-3");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn tokens_are_unique() {
        let store = SessionStore::new(3600);
        let a = store.create("user-1");
        let b = store.create("user-1");
        assert_ne!(a, b);
    }
}
