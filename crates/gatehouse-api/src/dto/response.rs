//! Response DTOs.

use serde::{Deserialize, Serialize};

use gatehouse_auth::acl::RolePermissions;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Effective permissions of the caller.
#[derive(Debug, Clone, Serialize)]
pub struct PermissionsResponse {
    /// Role from the access token.
    pub role: String,
    /// `"*"` or a list of permission names.
    pub permissions: RolePermissions,
}

/// Readiness probe body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyResponse {
    /// `ready` or `not ready`.
    pub status: String,
}
