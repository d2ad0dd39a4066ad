//! Credential establishment endpoints
//!
//! `POST /api/auth/verify` exchanges a token for the session cookie,
//! `GET /api/auth/verify` reports whether the caller holds a valid one and
//! `POST /api/auth/logout` clears it.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::core::auth::{clear_cookie, presented_credential, session_cookie};
use crate::core::{JsonBody, VaultResult};
use crate::links::handlers::AppState;

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub token: Option<String>,
}

/// POST /api/auth/verify
pub async fn establish_session(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<VerifyRequest>,
) -> VaultResult<Response> {
    state.verifier.check(request.token.as_deref())?;

    // check() succeeded, so the token is present
    let token = request.token.unwrap_or_default();
    let cookie = session_cookie(&token, state.session.max_age_secs, state.session.secure);
    tracing::info!("session established");

    Ok(([(SET_COOKIE, cookie)], Json(json!({ "success": true }))).into_response())
}

/// GET /api/auth/verify
pub async fn session_status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> VaultResult<Response> {
    let presented = presented_credential(&headers);
    match state.verifier.check(presented.as_deref()) {
        Ok(()) => Ok(Json(json!({ "authenticated": true })).into_response()),
        Err(e) if e.is_server_error() => Err(e),
        Err(_) => Ok((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "authenticated": false })),
        )
            .into_response()),
    }
}

/// POST /api/auth/logout
pub async fn end_session(State(state): State<AppState>) -> Response {
    (
        [(SET_COOKIE, clear_cookie(state.session.secure))],
        Json(json!({ "success": true })),
    )
        .into_response()
}
