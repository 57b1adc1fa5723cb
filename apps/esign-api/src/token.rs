//! Session-scoped access-token management.
//!
//! The provider token is cached per session and reused until shortly before
//! the provider-reported expiry. Refresh is a single grant exchange; there
//! are no retries.

use chrono::{Duration, Utc};

use crate::error::ApiError;
use crate::state::AppState;

/// Seconds subtracted from the provider-reported lifetime to cover clock
/// skew and in-flight request latency.
pub const EXPIRY_MARGIN_SECS: i64 = 60;

/// Return the session's access token, refreshing it if absent or expired.
///
/// A valid cached token is returned unchanged without touching the network.
pub async fn ensure_valid_token(state: &AppState, session_id: &str) -> Result<String, ApiError> {
    let session = state.sessions.get(session_id).await;
    if let (Some(token), Some(expires_at)) = (session.access_token, session.expires_at) {
        if Utc::now() < expires_at {
            tracing::debug!("re-using cached access token");
            return Ok(token);
        }
    }

    tracing::info!("requesting a new access token");
    let issued = state.provider.request_token().await.map_err(ApiError::Auth)?;
    let expires_at = Utc::now() + Duration::seconds(issued.expires_in as i64 - EXPIRY_MARGIN_SECS);
    state
        .sessions
        .set_token(session_id, &issued.access_token, expires_at)
        .await;

    Ok(issued.access_token)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use esign_core::{
        EnvelopeDefinition, IssuedToken, ProviderConfig, ProviderError, RecipientViewRequest,
        SigningProvider,
    };

    struct CountingProvider {
        exchanges: AtomicUsize,
        expires_in: u64,
        reject: bool,
    }

    impl CountingProvider {
        fn new(expires_in: u64) -> Arc<Self> {
            Arc::new(Self {
                exchanges: AtomicUsize::new(0),
                expires_in,
                reject: false,
            })
        }

        fn rejecting() -> Arc<Self> {
            Arc::new(Self {
                exchanges: AtomicUsize::new(0),
                expires_in: 0,
                reject: true,
            })
        }
    }

    #[async_trait]
    impl SigningProvider for CountingProvider {
        async fn request_token(&self) -> Result<IssuedToken, ProviderError> {
            let n = self.exchanges.fetch_add(1, Ordering::SeqCst) + 1;
            if self.reject {
                return Err(ProviderError::Auth("consent_required".into()));
            }
            Ok(IssuedToken {
                access_token: format!("token-{n}"),
                token_type: Some("Bearer".into()),
                expires_in: self.expires_in,
            })
        }

        async fn create_envelope(
            &self,
            _access_token: &str,
            _envelope: &EnvelopeDefinition,
        ) -> Result<String, ProviderError> {
            unreachable!("not exercised by token tests")
        }

        async fn create_recipient_view(
            &self,
            _access_token: &str,
            _envelope_id: &str,
            _view: &RecipientViewRequest,
        ) -> Result<String, ProviderError> {
            unreachable!("not exercised by token tests")
        }

        async fn fetch_document(
            &self,
            _access_token: &str,
            _envelope_id: &str,
        ) -> Result<Vec<u8>, ProviderError> {
            unreachable!("not exercised by token tests")
        }
    }

    fn test_state(provider: Arc<CountingProvider>) -> AppState {
        let config = ProviderConfig {
            auth_base_url: "https://account-d.docusign.com".into(),
            base_path: "https://demo.docusign.net/restapi".into(),
            account_id: "acct-1".into(),
            template_id: "tmpl-1".into(),
            integration_key: "ik-1".into(),
            user_id: "user-1".into(),
            client_user_id: "cu-1".into(),
            private_key_path: "private.key".into(),
            return_url: "http://localhost:8000/success".into(),
        };
        AppState::with_provider(config, provider, 1800)
    }

    #[tokio::test]
    async fn valid_cached_token_is_returned_unchanged() {
        let provider = CountingProvider::new(3600);
        let state = test_state(provider.clone());
        state
            .sessions
            .set_token("sid", "cached", Utc::now() + Duration::seconds(120))
            .await;

        let token = ensure_valid_token(&state, "sid").await.unwrap();

        assert_eq!(token, "cached");
        assert_eq!(provider.exchanges.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_token_triggers_exactly_one_exchange() {
        let provider = CountingProvider::new(3600);
        let state = test_state(provider.clone());

        let token = ensure_valid_token(&state, "sid").await.unwrap();

        assert_eq!(token, "token-1");
        assert_eq!(provider.exchanges.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_token_is_replaced_with_margin_applied() {
        let provider = CountingProvider::new(3600);
        let state = test_state(provider.clone());
        state
            .sessions
            .set_token("sid", "stale", Utc::now() - Duration::seconds(5))
            .await;

        let before = Utc::now();
        let token = ensure_valid_token(&state, "sid").await.unwrap();
        let after = Utc::now();

        assert_eq!(token, "token-1");
        assert_eq!(provider.exchanges.load(Ordering::SeqCst), 1);

        let session = state.sessions.get("sid").await;
        assert_eq!(session.access_token.as_deref(), Some("token-1"));

        // now + (expires_in - 60), and strictly inside the reported lifetime
        let expires_at = session.expires_at.unwrap();
        assert!(expires_at >= before + Duration::seconds(3600 - EXPIRY_MARGIN_SECS));
        assert!(expires_at <= after + Duration::seconds(3600 - EXPIRY_MARGIN_SECS));
        assert!(expires_at < before + Duration::seconds(3600));
    }

    #[tokio::test]
    async fn rejected_grant_propagates_and_leaves_session_empty() {
        let provider = CountingProvider::rejecting();
        let state = test_state(provider.clone());

        let err = ensure_valid_token(&state, "sid").await.unwrap_err();
        assert!(matches!(err, ApiError::Auth(_)));
        assert_eq!(provider.exchanges.load(Ordering::SeqCst), 1);

        let session = state.sessions.get("sid").await;
        assert!(session.access_token.is_none());
    }
}
