//! ESign API server - backend for embedded e-signature flows
//!
//! Provides the HTTP surface around a third-party e-signature provider:
//! - Signing-ceremony orchestration (token → envelope → recipient view)
//! - Session-scoped access-token caching
//! - Server-side document download proxy

use std::sync::Arc;

use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod error;
pub mod handlers;
pub mod models;
pub mod session;
pub mod state;
pub mod token;

use state::AppState;

/// Build the application router with CORS and request tracing applied.
pub fn router(state: Arc<AppState>) -> Router {
    // The signing frontend may be served from another origin; GET/POST only.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Pages
        .route("/", get(handlers::home))
        .route("/success", get(handlers::success))
        // Signing flow
        .route("/form", post(handlers::start_signing))
        .route("/get-access-token", get(handlers::access_token))
        // Document delivery
        .route("/download-document", get(handlers::download_document))
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
