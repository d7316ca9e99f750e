//! Refresh-token session repository.

use sqlx::PgPool;
use uuid::Uuid;

use gatehouse_core::error::{AppError, ErrorKind};
use gatehouse_core::result::AppResult;
use gatehouse_entity::session::RefreshSession;

use super::is_unique_violation;

/// Repository for the `refresh_tokens` table.
#[derive(Debug, Clone)]
pub struct RefreshTokenRepository {
    pool: PgPool,
}

impl RefreshTokenRepository {
    /// Create a new refresh token repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All sessions of a user, oldest first.
    pub async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<RefreshSession>> {
        sqlx::query_as::<_, RefreshSession>(
            "SELECT * FROM refresh_tokens WHERE user_id = $1 ORDER BY created_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list refresh sessions", e)
        })
    }

    /// Insert a new session row.
    pub async fn insert(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        user_agent: Option<&str>,
        token: &str,
    ) -> AppResult<RefreshSession> {
        sqlx::query_as::<_, RefreshSession>(
            "INSERT INTO refresh_tokens (id, user_id, session_id, user_agent, token) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(session_id)
        .bind(user_agent)
        .bind(token)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict("Session already exists")
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to insert refresh session", e)
            }
        })
    }

    /// Replace the token of a session only if it still holds `expected`.
    ///
    /// Returns `false` when another rotation got there first.
    pub async fn update_token_if_current(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        expected: &str,
        token: &str,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET token = $4, updated_at = NOW() \
             WHERE user_id = $1 AND session_id = $2 AND token = $3",
        )
        .bind(user_id)
        .bind(session_id)
        .bind(expected)
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to rotate refresh session", e)
        })?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete the given sessions of a user.
    pub async fn delete_sessions(&self, user_id: Uuid, session_ids: &[Uuid]) -> AppResult<u64> {
        if session_ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(
            "DELETE FROM refresh_tokens WHERE user_id = $1 AND session_id = ANY($2)",
        )
        .bind(user_id)
        .bind(session_ids)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete refresh sessions", e)
        })?;

        Ok(result.rows_affected())
    }
}
