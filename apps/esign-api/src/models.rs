//! Request and response types for the ESign API

use serde::{Deserialize, Serialize};

/// Signer identity submitted by the signing form.
///
/// `company` may be empty; the envelope builder passes it through as an
/// empty tab value rather than rejecting the request.
#[derive(Debug, Clone, Deserialize)]
pub struct SignerForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company: String,
}

/// Response exposing the session's current access token.
#[derive(Debug, Clone, Serialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
}
