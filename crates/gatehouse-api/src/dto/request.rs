//! Request DTOs with validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Username and password, as sent to `init` and `token`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CredentialsRequest {
    /// Username.
    #[serde(default)]
    #[validate(
        required(message = "Missing some required parameters"),
        length(min = 1, message = "Missing some required parameters")
    )]
    pub username: Option<String>,
    /// Password.
    #[serde(default)]
    #[validate(
        required(message = "Missing some required parameters"),
        length(min = 1, message = "Missing some required parameters")
    )]
    pub password: Option<String>,
}

impl CredentialsRequest {
    /// Returns `(username, password)`. Call after validation.
    pub fn into_parts(self) -> (String, String) {
        (
            self.username.unwrap_or_default(),
            self.password.unwrap_or_default(),
        )
    }
}

/// Optional body of the refresh endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token, when not sent as a cookie.
    #[serde(default, rename = "refreshToken")]
    pub refresh_token: Option<String>,
}

/// Query string of the reader endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReadQuery {
    /// Day to import; today when absent.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}
