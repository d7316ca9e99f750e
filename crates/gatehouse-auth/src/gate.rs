//! Per-request token extraction, verification and authorization.

use std::sync::Arc;

use gatehouse_core::error::{AppError, ErrorReason};

use crate::acl::AclEvaluator;
use crate::jwt::{AccessClaims, JwtDecoder};

/// Credential scheme expected before the token.
pub const SCHEME: &str = "JWT";

/// Verifies access tokens and checks the caller's role against the ACL.
#[derive(Debug, Clone)]
pub struct AccessGate {
    decoder: Arc<JwtDecoder>,
    acl: AclEvaluator,
}

impl AccessGate {
    /// Creates a gate.
    pub fn new(decoder: Arc<JwtDecoder>, acl: AclEvaluator) -> Self {
        Self { decoder, acl }
    }

    /// The ACL evaluator used by this gate.
    pub fn acl(&self) -> &AclEvaluator {
        &self.acl
    }

    /// Authorizes a `JWT <token>` credential for `permission`.
    pub fn authorize(
        &self,
        credential: Option<&str>,
        permission: &str,
    ) -> Result<AccessClaims, AppError> {
        let credential = credential.ok_or_else(|| AppError::unauthorized(ErrorReason::NoToken))?;
        let token = parse_credential(credential)?;
        let claims = self.decoder.verify_access(token)?;
        self.acl.require(&claims.role, permission)?;
        Ok(claims)
    }
}

/// Splits `JWT <token>` and returns the token.
///
/// Exactly two space-separated parts are required, the first being `JWT`.
pub fn parse_credential(credential: &str) -> Result<&str, AppError> {
    let mut parts = credential.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(SCHEME), Some(token), None) => Ok(token),
        _ => Err(AppError::unauthorized(ErrorReason::BadTokenFormat)),
    }
}
