//! Error types for provider integration

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("missing required environment variable {0}")]
    Config(String),

    #[error("failed to read private key {path}: {source}")]
    Key {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("token grant rejected: {0}")]
    Auth(String),

    #[error("provider returned {status}: {detail}")]
    Upstream { status: u16, detail: String },

    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected provider response: {0}")]
    Decode(String),
}
