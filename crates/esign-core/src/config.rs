//! Provider configuration.
//!
//! All provider settings are read from environment variables once at startup
//! and carried in a [`ProviderConfig`]. Handlers never read the environment
//! directly; a missing required variable aborts startup with the variable
//! named in the error.

use std::path::PathBuf;

use crate::error::ProviderError;

/// Requested lifetime of the service-account grant assertion, in seconds.
pub const GRANT_LIFETIME_SECS: u64 = 3600;

/// Settings for the e-signature provider account and template.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// OAuth base URL, e.g. `https://account-d.docusign.com`.
    pub auth_base_url: String,
    /// REST API base path, e.g. `https://demo.docusign.net/restapi`.
    pub base_path: String,
    /// Provider account identifier.
    pub account_id: String,
    /// Reusable document template identifier.
    pub template_id: String,
    /// Integration (client) key, used as the grant issuer.
    pub integration_key: String,
    /// Impersonated service user, used as the grant subject.
    pub user_id: String,
    /// Identifier marking the signer as pre-authenticated for embedded signing.
    pub client_user_id: String,
    /// Path to the RSA private key that signs the grant assertion.
    pub private_key_path: PathBuf,
    /// Where the signing ceremony sends the browser when it completes.
    pub return_url: String,
}

impl ProviderConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `ESIGN_AUTH_BASE_URL` — OAuth base URL (required)
    /// - `ESIGN_BASE_PATH` — REST API base path (required)
    /// - `ESIGN_ACCOUNT_ID` — account identifier (required)
    /// - `ESIGN_TEMPLATE_ID` — template identifier (required)
    /// - `ESIGN_INTEGRATION_KEY` — integration key (required)
    /// - `ESIGN_USER_ID` — impersonated user id (required)
    /// - `ESIGN_CLIENT_USER_ID` — embedded-signing client user id (required)
    /// - `ESIGN_PRIVATE_KEY_PATH` — grant signing key (default: `private.key`)
    /// - `ESIGN_RETURN_URL` — post-signing return URL (required)
    pub fn from_env() -> Result<Self, ProviderError> {
        Ok(Self {
            auth_base_url: required("ESIGN_AUTH_BASE_URL")?,
            base_path: required("ESIGN_BASE_PATH")?,
            account_id: required("ESIGN_ACCOUNT_ID")?,
            template_id: required("ESIGN_TEMPLATE_ID")?,
            integration_key: required("ESIGN_INTEGRATION_KEY")?,
            user_id: required("ESIGN_USER_ID")?,
            client_user_id: required("ESIGN_CLIENT_USER_ID")?,
            private_key_path: std::env::var("ESIGN_PRIVATE_KEY_PATH")
                .unwrap_or_else(|_| "private.key".to_owned())
                .into(),
            return_url: required("ESIGN_RETURN_URL")?,
        })
    }

    /// Host name the grant assertion is addressed to (`aud` claim).
    ///
    /// The provider expects the bare OAuth host, without scheme or trailing
    /// slash.
    pub fn oauth_host(&self) -> &str {
        self.auth_base_url
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/')
    }
}

fn required(name: &str) -> Result<String, ProviderError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ProviderError::Config(name.to_owned())),
    }
}
