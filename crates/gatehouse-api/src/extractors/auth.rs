//! `AuthUser` extractor: the claims attached by the access-gate middleware.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use gatehouse_auth::jwt::AccessClaims;
use gatehouse_core::error::{AppError, ErrorReason};

/// Verified access-token claims of the current caller.
///
/// Only available on routes behind `middleware::auth`.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AccessClaims);

impl std::ops::Deref for AuthUser {
    type Target = AccessClaims;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AccessClaims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AppError::unauthorized(ErrorReason::NoToken))
    }
}
