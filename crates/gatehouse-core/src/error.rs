//! Unified application error types for Gatehouse.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. The HTTP mapping lives here as well
//! so that handlers and middleware can return `AppResult` directly.

use std::fmt;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Missing, malformed or mistyped input.
    BadParameters,
    /// The caller could not be authenticated.
    Unauthorized,
    /// The caller is authenticated but not allowed to perform the action.
    Forbidden,
    /// The requested resource was not found.
    NotFound,
    /// A conflict occurred (duplicate entry, concurrent modification, etc.).
    Conflict,
    /// The service is temporarily unavailable.
    ServiceUnavailable,
    /// An internal server error occurred.
    Internal,
    /// A database error occurred.
    Database,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// A filesystem I/O error occurred.
    Storage,
}

impl ErrorKind {
    /// HTTP status code for this kind.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadParameters => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal
            | Self::Database
            | Self::Configuration
            | Self::Serialization
            | Self::Storage => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether this kind hides its message from API clients.
    pub fn is_server_side(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadParameters => write!(f, "BAD_PARAMETERS"),
            Self::Unauthorized => write!(f, "UNAUTHORIZED"),
            Self::Forbidden => write!(f, "FORBIDDEN"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::ServiceUnavailable => write!(f, "SERVICE_UNAVAILABLE"),
            Self::Internal => write!(f, "INTERNAL"),
            Self::Database => write!(f, "DATABASE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Storage => write!(f, "STORAGE"),
        }
    }
}

/// Fine-grained cause attached to `Unauthorized` and `Forbidden` errors.
///
/// Clients use it to pick a specific message; e.g. an expired access token
/// triggers a refresh while an invalid one forces a new login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorReason {
    /// No credential was presented.
    NoToken,
    /// The credential was not of the form `JWT <token>`.
    BadTokenFormat,
    /// The token signature is valid but it has expired.
    Expired,
    /// The token is malformed or its signature does not match.
    Invalid,
    /// The refresh token does not match the current token of any session.
    SessionNotFound,
    /// The token refers to a user that no longer exists.
    UserNotFound,
    /// Username or password mismatch.
    AuthenticationFailed,
    /// Bootstrap was attempted after the first user exists.
    AlreadyInitialized,
    /// The caller's role does not grant the required permission.
    InsufficientPrivileges,
}

impl ErrorReason {
    /// Default human-readable message for this reason.
    pub fn message(&self) -> &'static str {
        match self {
            Self::NoToken => "No token provided",
            Self::BadTokenFormat => "Bad token type",
            Self::Expired => "Expired token",
            Self::Invalid => "Invalid token",
            Self::SessionNotFound => "Session not found",
            Self::UserNotFound => "User not found",
            Self::AuthenticationFailed => "Authentication Failed.",
            Self::AlreadyInitialized => "Already Initialized",
            Self::InsufficientPrivileges => "Insufficient privileges",
        }
    }
}

/// The unified application error used throughout Gatehouse.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// Optional fine-grained cause.
    pub reason: Option<ErrorReason>,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            reason: None,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            reason: None,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    fn with_reason(kind: ErrorKind, reason: ErrorReason) -> Self {
        Self {
            kind,
            reason: Some(reason),
            message: reason.message().to_string(),
            source: None,
        }
    }

    /// Create a bad-parameters error.
    pub fn bad_parameters(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadParameters, message)
    }

    /// Create an unauthorized error for the given reason.
    pub fn unauthorized(reason: ErrorReason) -> Self {
        Self::with_reason(ErrorKind::Unauthorized, reason)
    }

    /// Create a forbidden error for the given reason.
    pub fn forbidden(reason: ErrorReason) -> Self {
        Self::with_reason(ErrorKind::Forbidden, reason)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create a service-unavailable error.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }

    /// Returns true when this error carries the given reason.
    pub fn is(&self, reason: ErrorReason) -> bool {
        self.reason == Some(reason)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            reason: self.reason,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Storage, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Machine-readable cause, when one applies.
    pub reason: Option<ErrorReason>,
    /// Human-readable message.
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();

        let message = if self.kind.is_server_side() {
            tracing::error!(kind = %self.kind, error = %self.message, "Internal server error");
            "Internal server error".to_string()
        } else {
            self.message
        };

        let body = ApiErrorResponse {
            error: self.kind.to_string(),
            reason: self.reason,
            message,
        };

        (status, Json(body)).into_response()
    }
}
