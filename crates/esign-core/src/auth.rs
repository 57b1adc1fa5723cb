//! Service-account JWT grant assembly.
//!
//! The backend proves its identity to the provider with an RS256-signed
//! assertion instead of a user login. The private key is read from disk at
//! request time; an unreadable key fails the grant, which callers surface
//! as an authentication error.

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::{ProviderConfig, GRANT_LIFETIME_SECS};
use crate::error::ProviderError;

/// OAuth grant type for the service-account assertion exchange.
pub const GRANT_TYPE_JWT_BEARER: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Scope requested with every grant.
pub const TOKEN_SCOPE: &str = "signature";

/// Claims carried by the grant assertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantClaims {
    /// Integration key.
    pub iss: String,
    /// Impersonated user id.
    pub sub: String,
    /// OAuth host, without scheme.
    pub aud: String,
    pub scope: String,
    pub iat: u64,
    pub exp: u64,
}

/// Token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct IssuedToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Provider-reported lifetime in seconds.
    pub expires_in: u64,
}

/// Sign a grant assertion for the configured account.
///
/// Requests a [`GRANT_LIFETIME_SECS`] lifetime; the provider may grant less.
pub fn signed_assertion(config: &ProviderConfig) -> Result<String, ProviderError> {
    let pem = std::fs::read(&config.private_key_path).map_err(|source| ProviderError::Key {
        path: config.private_key_path.display().to_string(),
        source,
    })?;

    let key = EncodingKey::from_rsa_pem(&pem)
        .map_err(|e| ProviderError::Auth(format!("invalid private key: {e}")))?;

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| ProviderError::Auth(format!("system clock error: {e}")))?
        .as_secs();

    let claims = GrantClaims {
        iss: config.integration_key.clone(),
        sub: config.user_id.clone(),
        aud: config.oauth_host().to_owned(),
        scope: TOKEN_SCOPE.to_owned(),
        iat: now,
        exp: now + GRANT_LIFETIME_SECS,
    };

    encode(&Header::new(Algorithm::RS256), &claims, &key)
        .map_err(|e| ProviderError::Auth(format!("failed to sign assertion: {e}")))
}
