//! Error types for the ESign API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use esign_core::ProviderError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("session expired or missing required information")]
    SessionIncomplete,

    #[error("access token not available")]
    TokenUnavailable,

    #[error("authentication failed: {0}")]
    Auth(#[source] ProviderError),

    #[error("provider call failed: {0}")]
    Upstream(#[source] ProviderError),

    #[error("document download failed: {0}")]
    DocumentFetch(#[source] ProviderError),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Upstream detail is logged here and never echoed to the client.
        let (status, message) = match &self {
            ApiError::SessionIncomplete => (
                StatusCode::BAD_REQUEST,
                "Session expired or missing required information.".to_string(),
            ),
            ApiError::TokenUnavailable => (
                StatusCode::UNAUTHORIZED,
                "Access token not available".to_string(),
            ),
            ApiError::Auth(e) => {
                tracing::error!("Token exchange failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Authentication with the signing provider failed".to_string(),
                )
            }
            ApiError::Upstream(e) => {
                tracing::error!("Provider call failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Signing provider request failed".to_string(),
                )
            }
            ApiError::DocumentFetch(e) => {
                tracing::error!("Error downloading document: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to download document.".to_string(),
                )
            }
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
