//! Repository implementations for Gatehouse tables.

pub mod data_line;
pub mod refresh_token;
pub mod user;

pub use data_line::DataLineRepository;
pub use refresh_token::RefreshTokenRepository;
pub use user::UserRepository;

/// Whether a sqlx error is a unique-constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|e| e.is_unique_violation())
        .unwrap_or(false)
}
