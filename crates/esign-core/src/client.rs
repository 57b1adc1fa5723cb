//! REST client for the e-signature provider.
//!
//! Every call is attempted once, with no retry and no timeout beyond the
//! HTTP client default. Non-success responses carry the upstream status and
//! body so callers can log the detail without exposing it.

use async_trait::async_trait;
use serde::Deserialize;

use crate::auth::{signed_assertion, IssuedToken, GRANT_TYPE_JWT_BEARER};
use crate::config::ProviderConfig;
use crate::envelope::{EnvelopeDefinition, RecipientViewRequest};
use crate::error::ProviderError;

/// Index of the completed document within an envelope.
pub const SIGNED_DOCUMENT_INDEX: &str = "1";

/// Operations the backend delegates to the provider.
///
/// The production implementation is [`RestClient`]; tests substitute stubs
/// to observe call counts and payloads without network access.
#[async_trait]
pub trait SigningProvider: Send + Sync {
    /// Exchange a service-account assertion for a bearer token.
    async fn request_token(&self) -> Result<IssuedToken, ProviderError>;

    /// Create an envelope; returns the provider-assigned envelope id.
    async fn create_envelope(
        &self,
        access_token: &str,
        envelope: &EnvelopeDefinition,
    ) -> Result<String, ProviderError>;

    /// Create an embedded signing view; returns the single-use ceremony URL.
    async fn create_recipient_view(
        &self,
        access_token: &str,
        envelope_id: &str,
        view: &RecipientViewRequest,
    ) -> Result<String, ProviderError>;

    /// Fetch the completed document as PDF bytes.
    async fn fetch_document(
        &self,
        access_token: &str,
        envelope_id: &str,
    ) -> Result<Vec<u8>, ProviderError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeCreated {
    envelope_id: String,
}

#[derive(Debug, Deserialize)]
struct ViewCreated {
    url: String,
}

/// [`SigningProvider`] backed by the provider's REST API.
pub struct RestClient {
    config: ProviderConfig,
    http: reqwest::Client,
}

impl RestClient {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn account_url(&self, suffix: &str) -> String {
        format!(
            "{}/v2.1/accounts/{}{}",
            self.config.base_path.trim_end_matches('/'),
            self.config.account_id,
            suffix
        )
    }

    async fn read_failure(response: reqwest::Response) -> (u16, String) {
        let status = response.status().as_u16();
        let detail = response.text().await.unwrap_or_default();
        (status, detail)
    }
}

#[async_trait]
impl SigningProvider for RestClient {
    async fn request_token(&self) -> Result<IssuedToken, ProviderError> {
        let assertion = signed_assertion(&self.config)?;
        tracing::debug!("exchanging service-account grant for an access token");

        let response = self
            .http
            .post(format!(
                "{}/oauth/token",
                self.config.auth_base_url.trim_end_matches('/')
            ))
            .form(&[
                ("grant_type", GRANT_TYPE_JWT_BEARER),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, detail) = Self::read_failure(response).await;
            return Err(ProviderError::Auth(format!("{status}: {detail}")));
        }

        response
            .json::<IssuedToken>()
            .await
            .map_err(|e| ProviderError::Decode(format!("token response: {e}")))
    }

    async fn create_envelope(
        &self,
        access_token: &str,
        envelope: &EnvelopeDefinition,
    ) -> Result<String, ProviderError> {
        let response = self
            .http
            .post(self.account_url("/envelopes"))
            .bearer_auth(access_token)
            .json(envelope)
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, detail) = Self::read_failure(response).await;
            return Err(ProviderError::Upstream { status, detail });
        }

        let created = response
            .json::<EnvelopeCreated>()
            .await
            .map_err(|e| ProviderError::Decode(format!("envelope response: {e}")))?;
        Ok(created.envelope_id)
    }

    async fn create_recipient_view(
        &self,
        access_token: &str,
        envelope_id: &str,
        view: &RecipientViewRequest,
    ) -> Result<String, ProviderError> {
        let response = self
            .http
            .post(self.account_url(&format!("/envelopes/{envelope_id}/views/recipient")))
            .bearer_auth(access_token)
            .json(view)
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, detail) = Self::read_failure(response).await;
            return Err(ProviderError::Upstream { status, detail });
        }

        let created = response
            .json::<ViewCreated>()
            .await
            .map_err(|e| ProviderError::Decode(format!("view response: {e}")))?;
        Ok(created.url)
    }

    async fn fetch_document(
        &self,
        access_token: &str,
        envelope_id: &str,
    ) -> Result<Vec<u8>, ProviderError> {
        let response = self
            .http
            .get(self.account_url(&format!(
                "/envelopes/{envelope_id}/documents/{SIGNED_DOCUMENT_INDEX}"
            )))
            .bearer_auth(access_token)
            .header(reqwest::header::ACCEPT, "application/pdf")
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, detail) = Self::read_failure(response).await;
            return Err(ProviderError::Upstream { status, detail });
        }

        let bytes = response.bytes().await?;
        tracing::debug!(len = bytes.len(), %envelope_id, "fetched completed document");
        Ok(bytes.to_vec())
    }
}
