//! User handlers: bootstrap, login, refresh, verify, permissions.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::header::USER_AGENT;
use axum::http::{HeaderMap, StatusCode};
use axum_extra::extract::cookie::CookieJar;

use gatehouse_auth::jwt::AccessClaims;
use gatehouse_core::error::AppError;
use gatehouse_entity::session::TokenPair;
use gatehouse_entity::user::UserSummary;

use crate::cookies::{REFRESH_COOKIE, with_token_cookies};
use crate::dto::request::{CredentialsRequest, RefreshRequest};
use crate::dto::response::{ApiResponse, PermissionsResponse};
use crate::extractors::json::rejection_to_error;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/user/init
pub async fn init(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CredentialsRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserSummary>>), AppError> {
    let (username, password) = req.into_parts();
    let user = state.account_service.init(&username, &password).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user.summary()))))
}

/// POST /api/user/token
pub async fn token(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<CredentialsRequest>,
) -> Result<(CookieJar, Json<ApiResponse<TokenPair>>), AppError> {
    let (username, password) = req.into_parts();
    let tokens = state
        .session_manager
        .login(&username, &password, user_agent(&headers))
        .await?;

    let jar = with_token_cookies(jar, &tokens, state.config.auth.secure_cookies);
    Ok((jar, Json(ApiResponse::ok(tokens))))
}

/// POST /api/user/refreshtoken
pub async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    body: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<ApiResponse<TokenPair>>), AppError> {
    // No JSON content type means the token must come from the cookie.
    let from_body = match body {
        Ok(Json(req)) => req.refresh_token,
        Err(JsonRejection::MissingJsonContentType(_)) => None,
        Err(rejection) => return Err(rejection_to_error(rejection)),
    };

    let presented = jar
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .or(from_body)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::bad_parameters("Missing refresh token"))?;

    let tokens = state
        .session_manager
        .rotate(&presented, user_agent(&headers))
        .await?;

    let jar = with_token_cookies(jar, &tokens, state.config.auth.secure_cookies);
    Ok((jar, Json(ApiResponse::ok(tokens))))
}

/// GET /api/user/verify
pub async fn verify(AuthUser(claims): AuthUser) -> Json<ApiResponse<AccessClaims>> {
    Json(ApiResponse::ok(claims))
}

/// GET /api/user/permissions
pub async fn permissions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Json<ApiResponse<PermissionsResponse>> {
    let permissions = state.access_gate.acl().get_roles(&auth.role);
    Json(ApiResponse::ok(PermissionsResponse {
        role: auth.role.clone(),
        permissions,
    }))
}

fn user_agent(headers: &HeaderMap) -> Option<&str> {
    headers.get(USER_AGENT).and_then(|v| v.to_str().ok())
}
