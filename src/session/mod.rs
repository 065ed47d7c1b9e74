// Cookie-backed session handling.
//
// A "session" here is just a server-side string bag keyed by a cookie-carried
// id. The store trusts whatever the client reported at /login; there is no
// password and no validation of stored values.

use std::collections::HashMap;
use std::sync::Arc;

use axum_extra::extract::cookie::{Cookie, CookieJar};
use dashmap::DashMap;

/// Session key under which the signed-in username is stored.
const USER_KEY: &str = "user";

/// Storage backend for session bags.
///
/// Absence of a session or key yields `None`, never an error.
pub trait SessionStore: Send + Sync {
    fn get(&self, id: &str, key: &str) -> Option<String>;
    fn set(&self, id: &str, key: &str, value: String);
}

/// Process-local store. Entries live until the process exits; expiry is an
/// external concern.
#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<String, HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, id: &str, key: &str) -> Option<String> {
        self.entries.get(id).and_then(|bag| bag.get(key).cloned())
    }

    fn set(&self, id: &str, key: &str, value: String) {
        self.entries
            .entry(id.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }
}

/// Hands out cookie-bound [`Session`] accessors for incoming requests.
pub struct Sessions {
    store: Arc<dyn SessionStore>,
    cookie_name: String,
}

impl Sessions {
    pub fn new(store: Arc<dyn SessionStore>, cookie_name: impl Into<String>) -> Self {
        Self {
            store,
            cookie_name: cookie_name.into(),
        }
    }

    /// Binds the request's session, minting an id and cookie on first
    /// contact. The returned jar must be included in the response so the
    /// Set-Cookie header reaches the client.
    pub fn acquire(&self, jar: CookieJar) -> (Session, CookieJar) {
        if let Some(cookie) = jar.get(&self.cookie_name) {
            let id = cookie.value().to_string();
            return (self.session(id), jar);
        }

        let id = uuid::Uuid::new_v4().to_string();
        let cookie = Cookie::build((self.cookie_name.clone(), id.clone()))
            .path("/")
            .http_only(true)
            .build();
        (self.session(id), jar.add(cookie))
    }

    fn session(&self, id: String) -> Session {
        Session {
            id,
            store: self.store.clone(),
        }
    }
}

/// Per-request accessor over one session's bag.
pub struct Session {
    id: String,
    store: Arc<dyn SessionStore>,
}

impl Session {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.store.get(&self.id, key)
    }

    pub fn set(&self, key: &str, value: impl Into<String>) {
        self.store.set(&self.id, key, value.into());
    }

    /// Username stored by /login, if any.
    pub fn user(&self) -> Option<String> {
        self.get(USER_KEY)
    }

    pub fn set_user(&self, username: impl Into<String>) {
        self.set(USER_KEY, username);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sessions() -> Sessions {
        Sessions::new(Arc::new(MemoryStore::new()), "test_session")
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("s1", "user"), None);

        store.set("s1", "user", "alice".to_string());
        assert_eq!(store.get("s1", "user"), Some("alice".to_string()));
        assert_eq!(store.get("s1", "theme"), None);
        assert_eq!(store.get("s2", "user"), None);
    }

    #[test]
    fn test_acquire_mints_cookie_on_first_contact() {
        let sessions = sessions();
        let (session, jar) = sessions.acquire(CookieJar::new());

        let cookie = jar.get("test_session").expect("cookie should be set");
        assert_eq!(cookie.value(), session.id());
        assert!(!session.id().is_empty());
    }

    #[test]
    fn test_acquire_reuses_existing_cookie() {
        let sessions = sessions();
        let jar = CookieJar::new().add(Cookie::new("test_session", "abc-123"));

        let (session, _jar) = sessions.acquire(jar);
        assert_eq!(session.id(), "abc-123");
    }

    #[test]
    fn test_user_survives_across_accessors() {
        let sessions = sessions();
        let jar = CookieJar::new().add(Cookie::new("test_session", "abc-123"));

        let (session, jar) = sessions.acquire(jar);
        assert_eq!(session.user(), None);
        session.set_user("alice");

        let (session, _jar) = sessions.acquire(jar);
        assert_eq!(session.user(), Some("alice".to_string()));
    }
}
