//! Refresh session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One login context (typically one device) of a user.
///
/// The session id stays fixed across rotations; only `token` changes, and
/// it always holds the most recently issued refresh token.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RefreshSession {
    /// Row identifier.
    pub id: Uuid,
    /// The user this session belongs to.
    pub user_id: Uuid,
    /// Session identifier embedded in the refresh token.
    pub session_id: Uuid,
    /// User-Agent header seen when the session was created.
    pub user_agent: Option<String>,
    /// Current refresh token.
    #[serde(skip_serializing)]
    pub token: String,
    /// When the session was created (first login).
    pub created_at: DateTime<Utc>,
    /// When the token was last rotated.
    pub updated_at: DateTime<Utc>,
}

impl RefreshSession {
    /// Whether this row is the live one for `session_id` holding `token`.
    pub fn matches(&self, session_id: Uuid, token: &str) -> bool {
        self.session_id == session_id && self.token == token
    }
}
