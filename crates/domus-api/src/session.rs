// Session credential handling
//
// The server identifies a logged-in client by its `session` cookie. The
// gateway attaches the stored token as a `Cookie` header on every request
// and scans `Set-Cookie` headers on every response. No cookie jar is
// involved; the credential store is the single source of truth.

use std::collections::HashMap;
use std::sync::RwLock;

use reqwest::header::{HeaderMap, HeaderValue, SET_COOKIE};
use secrecy::{ExposeSecret, SecretString};

/// Name of the cookie the server uses for its session.
pub const SESSION_COOKIE: &str = "session";

/// Keys of the two persisted entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    /// Server endpoint as the user entered it.
    ServerUrl,
    /// Session cookie value captured from the server.
    SessionToken,
}

impl StoreKey {
    /// Stable name used by persistent backends.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ServerUrl => "server_url",
            Self::SessionToken => "session_cookie",
        }
    }

    /// Value `get` returns when nothing is persisted.
    pub fn default_value(self) -> Option<&'static str> {
        match self {
            Self::ServerUrl => Some("http://192.168.1.100:5000/"),
            Self::SessionToken => None,
        }
    }
}

/// Key-value persistence the gateway reads its endpoint and session through.
///
/// Implementations must be infallible from the caller's view: a backend
/// failure degrades to the key's default and is logged, never raised.
/// A `set` must be visible to the next `get` on any thread.
pub trait CredentialStore: Send + Sync {
    /// Persisted value, or the key's documented default.
    fn get(&self, key: StoreKey) -> Option<String>;

    /// Persist a value.
    fn set(&self, key: StoreKey, value: &str);

    /// Remove a value; subsequent `get` returns the default.
    fn remove(&self, key: StoreKey);

    /// Remove the session token only. The endpoint is untouched.
    fn clear_session(&self) {
        self.remove(StoreKey::SessionToken);
    }

    /// The current session token, if any.
    fn session_token(&self) -> Option<SecretString> {
        self.get(StoreKey::SessionToken)
            .filter(|t| !t.is_empty())
            .map(SecretString::from)
    }
}

/// In-process credential store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<StoreKey, String>>,
}

impl MemoryStore {
    /// Empty store; every key reads back as its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an endpoint already saved.
    pub fn with_endpoint(endpoint: &str) -> Self {
        let store = Self::new();
        store.set(StoreKey::ServerUrl, endpoint);
        store
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: StoreKey) -> Option<String> {
        let values = self
            .values
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        values
            .get(&key)
            .cloned()
            .or_else(|| key.default_value().map(str::to_owned))
    }

    fn set(&self, key: StoreKey, value: &str) {
        self.values
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key, value.to_owned());
    }

    fn remove(&self, key: StoreKey) {
        self.values
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(&key);
    }
}

/// Build the `Cookie` header for a session token.
pub(crate) fn cookie_header(token: &SecretString) -> Option<HeaderValue> {
    let mut value =
        HeaderValue::from_str(&format!("{SESSION_COOKIE}={}", token.expose_secret())).ok()?;
    value.set_sensitive(true);
    Some(value)
}

/// What a response said about the session cookie.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum SessionUpdate {
    /// New token issued.
    Set(String),
    /// Server sent an empty value (cookie deleted / expired).
    Cleared,
}

/// Scan `Set-Cookie` headers for the session cookie. The last occurrence wins.
pub(crate) fn session_from_headers(headers: &HeaderMap) -> Option<SessionUpdate> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(parse_set_cookie)
        .last()
}

fn parse_set_cookie(raw: &str) -> Option<SessionUpdate> {
    let pair = raw.split(';').next()?;
    let (name, value) = pair.split_once('=')?;
    if name.trim() != SESSION_COOKIE {
        return None;
    }
    let value = value.trim().trim_matches('"');
    if value.is_empty() {
        Some(SessionUpdate::Cleared)
    } else {
        Some(SessionUpdate::Set(value.to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn headers(values: &[&str]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for v in values {
            map.append(SET_COOKIE, HeaderValue::from_str(v).unwrap());
        }
        map
    }

    #[test]
    fn picks_session_cookie_among_others() {
        let h = headers(&[
            "theme=dark; Path=/",
            "session=eyJ1c2VyX2lkIjoxfQ.abc; HttpOnly; Path=/",
        ]);
        assert_eq!(
            session_from_headers(&h),
            Some(SessionUpdate::Set("eyJ1c2VyX2lkIjoxfQ.abc".into()))
        );
    }

    #[test]
    fn ignores_similarly_named_cookies() {
        let h = headers(&["session_id=123; Path=/", "remember_token=x"]);
        assert_eq!(session_from_headers(&h), None);
    }

    #[test]
    fn empty_value_clears() {
        let h = headers(&["session=; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Path=/"]);
        assert_eq!(session_from_headers(&h), Some(SessionUpdate::Cleared));
    }

    #[test]
    fn memory_store_defaults_and_clear_session() {
        let store = MemoryStore::new();
        assert_eq!(
            store.get(StoreKey::ServerUrl).as_deref(),
            StoreKey::ServerUrl.default_value()
        );
        assert!(store.session_token().is_none());

        store.set(StoreKey::ServerUrl, "10.0.0.2:5000");
        store.set(StoreKey::SessionToken, "tok");
        store.clear_session();

        assert!(store.session_token().is_none());
        assert_eq!(store.get(StoreKey::ServerUrl).as_deref(), Some("10.0.0.2:5000"));
    }

    #[test]
    fn cookie_header_is_sensitive() {
        let value = cookie_header(&SecretString::from("abc")).unwrap();
        assert!(value.is_sensitive());
        assert_eq!(value.to_str().unwrap(), "session=abc");
    }
}
