//! In-memory session store keyed by a server-issued cookie.
//!
//! Sessions hold the cached provider token and the current envelope id for
//! one browser. The store is process-local and not durable; idle sessions
//! are reset on access and dropped by a periodic sweep. Concurrent requests
//! within one session are not serialized, so a double form submission can
//! create two envelopes.

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::{header, HeaderMap};
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "esign_sid";

/// Per-browser-session state.
#[derive(Debug, Clone)]
pub struct SessionData {
    pub access_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub envelope_id: Option<String>,
    pub last_seen: DateTime<Utc>,
}

impl SessionData {
    fn new() -> Self {
        Self {
            access_token: None,
            expires_at: None,
            envelope_id: None,
            last_seen: Utc::now(),
        }
    }

    /// Both the token and an envelope id are present, i.e. a signing
    /// ceremony was started in this session.
    pub fn has_signing_context(&self) -> bool {
        self.access_token.is_some() && self.envelope_id.is_some()
    }
}

/// Resolved session for one request.
pub struct SessionHandle {
    pub id: String,
    /// A cookie must be issued with the response.
    pub is_new: bool,
}

/// Cookie-keyed in-memory session store shared across handlers.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, SessionData>>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout_secs: u64) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout: Duration::seconds(idle_timeout_secs as i64),
        }
    }

    /// Resolve the request's session, creating one on first touch.
    pub async fn resolve(&self, headers: &HeaderMap) -> SessionHandle {
        match cookie_session_id(headers) {
            Some(id) => {
                self.touch(&id).await;
                SessionHandle { id, is_new: false }
            }
            None => {
                let id = Uuid::new_v4().to_string();
                self.inner
                    .write()
                    .await
                    .insert(id.clone(), SessionData::new());
                SessionHandle { id, is_new: true }
            }
        }
    }

    /// Snapshot of the session state. Unknown ids read as an empty session.
    pub async fn get(&self, id: &str) -> SessionData {
        self.inner
            .read()
            .await
            .get(id)
            .cloned()
            .unwrap_or_else(SessionData::new)
    }

    pub async fn set_token(&self, id: &str, access_token: &str, expires_at: DateTime<Utc>) {
        let mut sessions = self.inner.write().await;
        let entry = sessions
            .entry(id.to_owned())
            .or_insert_with(SessionData::new);
        entry.access_token = Some(access_token.to_owned());
        entry.expires_at = Some(expires_at);
        entry.last_seen = Utc::now();
    }

    pub async fn set_envelope(&self, id: &str, envelope_id: &str) {
        let mut sessions = self.inner.write().await;
        let entry = sessions
            .entry(id.to_owned())
            .or_insert_with(SessionData::new);
        entry.envelope_id = Some(envelope_id.to_owned());
        entry.last_seen = Utc::now();
    }

    /// Drop sessions idle past the timeout.
    pub async fn sweep(&self) {
        let now = Utc::now();
        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| now - session.last_seen <= self.idle_timeout);
        let dropped = before - sessions.len();
        if dropped > 0 {
            tracing::debug!(dropped, "swept idle sessions");
        }
    }

    /// `Set-Cookie` value for a newly created session.
    pub fn cookie(id: &str) -> String {
        format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
    }

    /// Recreate an expired record on access; otherwise update `last_seen`.
    async fn touch(&self, id: &str) {
        let mut sessions = self.inner.write().await;
        let now = Utc::now();
        let entry = sessions
            .entry(id.to_owned())
            .or_insert_with(SessionData::new);
        if now - entry.last_seen > self.idle_timeout {
            *entry = SessionData::new();
        } else {
            entry.last_seen = now;
        }
    }
}

/// Session id from the request's `Cookie` header, if present.
fn cookie_session_id(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_owned())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, value.parse().unwrap());
        headers
    }

    #[test]
    fn cookie_parsing_finds_the_session_id() {
        let headers = headers_with_cookie("esign_sid=abc-123");
        assert_eq!(cookie_session_id(&headers), Some("abc-123".to_owned()));

        let headers = headers_with_cookie("theme=dark; esign_sid=abc-123; lang=en");
        assert_eq!(cookie_session_id(&headers), Some("abc-123".to_owned()));

        let headers = headers_with_cookie("theme=dark");
        assert_eq!(cookie_session_id(&headers), None);

        let headers = headers_with_cookie("esign_sid=");
        assert_eq!(cookie_session_id(&headers), None);

        assert_eq!(cookie_session_id(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn resolve_creates_a_session_on_first_touch() {
        let store = SessionStore::new(1800);

        let handle = store.resolve(&HeaderMap::new()).await;
        assert!(handle.is_new);

        let again = store
            .resolve(&headers_with_cookie(&format!("esign_sid={}", handle.id)))
            .await;
        assert!(!again.is_new);
        assert_eq!(again.id, handle.id);
    }

    #[tokio::test]
    async fn token_and_envelope_updates_are_visible() {
        let store = SessionStore::new(1800);
        let expires = Utc::now() + Duration::seconds(600);

        store.set_token("sid", "tok", expires).await;
        store.set_envelope("sid", "env-1").await;

        let session = store.get("sid").await;
        assert_eq!(session.access_token.as_deref(), Some("tok"));
        assert_eq!(session.expires_at, Some(expires));
        assert_eq!(session.envelope_id.as_deref(), Some("env-1"));
        assert!(session.has_signing_context());
    }

    #[tokio::test]
    async fn idle_session_is_reset_on_access() {
        let store = SessionStore::new(0);
        store
            .set_token("sid", "tok", Utc::now() + Duration::seconds(600))
            .await;

        // Any idle time exceeds a zero timeout.
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        store
            .resolve(&headers_with_cookie("esign_sid=sid"))
            .await;

        let session = store.get("sid").await;
        assert!(session.access_token.is_none());
        assert!(session.envelope_id.is_none());
    }

    #[tokio::test]
    async fn sweep_drops_idle_sessions() {
        let store = SessionStore::new(0);
        store
            .set_token("sid", "tok", Utc::now() + Duration::seconds(600))
            .await;

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        store.sweep().await;

        assert!(store.inner.read().await.is_empty());
    }

    #[test]
    fn cookie_value_is_scoped_and_http_only() {
        let cookie = SessionStore::cookie("abc-123");
        assert!(cookie.starts_with("esign_sid=abc-123"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
    }
}
