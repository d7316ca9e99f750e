//! Access-gate middleware.
//!
//! Reads `JWT <token>` from the `token` cookie, falling back to the
//! `Authorization` header, and authorizes it for a route permission.
//! The verified claims are stored in the request extensions for
//! the `AuthUser` extractor.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use gatehouse_auth::acl::VALID_TOKEN;
use gatehouse_core::error::AppError;

use crate::cookies::ACCESS_COOKIE;
use crate::state::AppState;

/// Permission required by the reader import endpoint.
pub const READER_IMPORT: &str = "reader-import";

/// Any verified access token passes.
pub async fn require_valid_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorize(&state, VALID_TOKEN, request, next).await
}

/// Requires the `reader-import` permission.
pub async fn require_reader_import(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorize(&state, READER_IMPORT, request, next).await
}

async fn authorize(
    state: &AppState,
    permission: &str,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let credential = credential_from(&request);
    let claims = state
        .access_gate
        .authorize(credential.as_deref(), permission)
        .inspect_err(|e| debug!(permission, error = %e, "Request rejected by access gate"))?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// The `token` cookie, else the `Authorization` header.
fn credential_from(request: &Request) -> Option<String> {
    let jar = CookieJar::from_headers(request.headers());
    if let Some(cookie) = jar.get(ACCESS_COOKIE) {
        return Some(cookie.value().to_string());
    }
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
