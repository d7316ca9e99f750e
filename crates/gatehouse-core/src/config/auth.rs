//! Authentication configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Authentication and credential configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for access tokens.
    pub access_token_secret: String,
    /// HMAC secret for refresh tokens. Must differ from the access secret.
    pub refresh_token_secret: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_minutes: u64,
    /// Refresh token TTL in days.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl_days: u64,
    /// Lifetime of the session-less grant minted by login, in seconds.
    #[serde(default = "default_login_grant_ttl")]
    pub login_grant_ttl_seconds: u64,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Minimum zxcvbn score (0-4). 0 disables the entropy check.
    #[serde(default)]
    pub password_min_score: u8,
    /// Optional JSON file with custom role definitions.
    #[serde(default)]
    pub roles_file: Option<String>,
    /// Whether auth cookies carry the `Secure` attribute.
    #[serde(default = "default_true")]
    pub secure_cookies: bool,
}

impl AuthConfig {
    /// Rejects empty or shared signing secrets.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.access_token_secret.is_empty() || self.refresh_token_secret.is_empty() {
            return Err(AppError::configuration(
                "Both auth.access_token_secret and auth.refresh_token_secret must be set",
            ));
        }
        if self.access_token_secret == self.refresh_token_secret {
            return Err(AppError::configuration(
                "auth.access_token_secret and auth.refresh_token_secret must differ",
            ));
        }
        if self.password_min_score > 4 {
            return Err(AppError::configuration(
                "auth.password_min_score must be between 0 and 4",
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_token_ttl_minutes", &self.access_token_ttl_minutes)
            .field("refresh_token_ttl_days", &self.refresh_token_ttl_days)
            .field("login_grant_ttl_seconds", &self.login_grant_ttl_seconds)
            .field("password_min_length", &self.password_min_length)
            .field("password_min_score", &self.password_min_score)
            .field("roles_file", &self.roles_file)
            .field("secure_cookies", &self.secure_cookies)
            .finish_non_exhaustive()
    }
}

fn default_access_ttl() -> u64 {
    15
}

fn default_refresh_ttl() -> u64 {
    7
}

fn default_login_grant_ttl() -> u64 {
    60
}

fn default_password_min() -> usize {
    8
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(access: &str, refresh: &str) -> AuthConfig {
        AuthConfig {
            access_token_secret: access.to_string(),
            refresh_token_secret: refresh.to_string(),
            access_token_ttl_minutes: default_access_ttl(),
            refresh_token_ttl_days: default_refresh_ttl(),
            login_grant_ttl_seconds: default_login_grant_ttl(),
            password_min_length: default_password_min(),
            password_min_score: 0,
            roles_file: None,
            secure_cookies: true,
        }
    }

    #[test]
    fn test_shared_secret_rejected() {
        assert!(config("same", "same").validate().is_err());
        assert!(config("", "refresh").validate().is_err());
        assert!(config("access", "refresh").validate().is_ok());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let rendered = format!("{:?}", config("top-secret-a", "top-secret-r"));
        assert!(!rendered.contains("top-secret"));
    }
}
