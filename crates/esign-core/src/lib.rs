//! Signing-provider integration for the ESign backend.
//!
//! This crate owns everything that talks to the e-signature provider:
//! typed configuration, the service-account JWT grant, envelope and
//! recipient-view payload builders, and the REST client behind the
//! [`SigningProvider`] trait.

pub mod auth;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;

pub use auth::IssuedToken;
pub use client::{RestClient, SigningProvider, SIGNED_DOCUMENT_INDEX};
pub use config::{ProviderConfig, GRANT_LIFETIME_SECS};
pub use envelope::{EnvelopeDefinition, RecipientViewRequest};
pub use error::ProviderError;
