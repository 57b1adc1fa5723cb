//! Application state for the ESign API

use std::sync::Arc;

use esign_core::{ProviderConfig, RestClient, SigningProvider};

use crate::session::SessionStore;

/// Shared state injected into every handler.
pub struct AppState {
    pub config: ProviderConfig,
    pub provider: Arc<dyn SigningProvider>,
    pub sessions: SessionStore,
}

impl AppState {
    /// State backed by the real provider REST client.
    pub fn new(config: ProviderConfig, session_idle_secs: u64) -> Self {
        let provider = Arc::new(RestClient::new(config.clone()));
        Self::with_provider(config, provider, session_idle_secs)
    }

    /// State with an explicit provider implementation (tests use stubs).
    pub fn with_provider(
        config: ProviderConfig,
        provider: Arc<dyn SigningProvider>,
        session_idle_secs: u64,
    ) -> Self {
        Self {
            config,
            provider,
            sessions: SessionStore::new(session_idle_secs),
        }
    }
}
