//! HTTP handlers for the ESign API

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use std::sync::Arc;

use esign_core::{EnvelopeDefinition, RecipientViewRequest};

use crate::error::ApiError;
use crate::models::*;
use crate::session::{SessionHandle, SessionStore};
use crate::state::AppState;
use crate::token::ensure_valid_token;

const INDEX_HTML: &str = include_str!("../assets/index.html");
const SUCCESS_HTML: &str = include_str!("../assets/success.html");

/// Filename forced on the downloaded document.
const SIGNED_DOCUMENT_FILENAME: &str = "signed_document.pdf";

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// Home page; refreshes the session token as a side effect.
///
/// A failed refresh is logged but does not block the page; the signing
/// form itself will surface the error on submission.
pub async fn home(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let handle = state.sessions.resolve(&headers).await;
    if let Err(err) = ensure_valid_token(&state, &handle.id).await {
        tracing::warn!("token refresh on home page failed: {}", err);
    }
    with_session_cookie(&handle, Html(INDEX_HTML))
}

/// Start a signing ceremony: token → envelope → recipient view → redirect.
///
/// The envelope id is stored in the session only after the create call
/// succeeded; no provider-side cleanup is attempted on later failures.
pub async fn start_signing(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<SignerForm>,
) -> Result<Response, ApiError> {
    let handle = state.sessions.resolve(&headers).await;
    let token = ensure_valid_token(&state, &handle.id).await?;

    let envelope = EnvelopeDefinition::from_template(
        &state.config,
        &form.name,
        &form.email,
        &form.company,
    );
    let envelope_id = state
        .provider
        .create_envelope(&token, &envelope)
        .await
        .map_err(ApiError::Upstream)?;
    tracing::info!(%envelope_id, signer = %form.email, "created signing envelope");

    state.sessions.set_envelope(&handle.id, &envelope_id).await;

    let view = RecipientViewRequest::embedded(&state.config, &form.name, &form.email);
    let url = state
        .provider
        .create_recipient_view(&token, &envelope_id, &view)
        .await
        .map_err(ApiError::Upstream)?;

    Ok(with_session_cookie(&handle, Redirect::to(&url)))
}

/// Expose the session's current access token, refreshing it if needed.
pub async fn access_token(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let handle = state.sessions.resolve(&headers).await;
    match ensure_valid_token(&state, &handle.id).await {
        Ok(token) => Ok(with_session_cookie(
            &handle,
            Json(AccessTokenResponse {
                access_token: token,
            }),
        )),
        Err(err) => {
            tracing::warn!("unable to provide access token: {}", err);
            Err(ApiError::TokenUnavailable)
        }
    }
}

/// Post-signing landing page with the download control.
pub async fn success(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let handle = state.sessions.resolve(&headers).await;
    let session = state.sessions.get(&handle.id).await;
    if !session.has_signing_context() {
        return Err(ApiError::SessionIncomplete);
    }
    Ok(with_session_cookie(&handle, Html(SUCCESS_HTML)))
}

/// Fetch the completed document from the provider and relay the bytes.
///
/// Browsers cannot call the provider's document endpoint directly with a
/// bearer token, so the authenticated fetch happens server-side.
pub async fn download_document(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let handle = state.sessions.resolve(&headers).await;
    let session = state.sessions.get(&handle.id).await;

    let (Some(token), Some(envelope_id)) = (session.access_token, session.envelope_id) else {
        return Err(ApiError::SessionIncomplete);
    };

    let bytes = state
        .provider
        .fetch_document(&token, &envelope_id)
        .await
        .map_err(ApiError::DocumentFetch)?;

    Ok((
        StatusCode::OK,
        [
            ("Content-Type".to_string(), "application/pdf".to_string()),
            (
                "Content-Disposition".to_string(),
                format!("attachment; filename=\"{SIGNED_DOCUMENT_FILENAME}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// Attach the session cookie when the session was created by this request.
fn with_session_cookie(handle: &SessionHandle, response: impl IntoResponse) -> Response {
    let mut response = response.into_response();
    if handle.is_new {
        if let Ok(value) = HeaderValue::from_str(&SessionStore::cookie(&handle.id)) {
            response.headers_mut().insert(header::SET_COOKIE, value);
        }
    }
    response
}
