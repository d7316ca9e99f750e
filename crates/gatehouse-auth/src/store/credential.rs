//! Credential store trait.

use async_trait::async_trait;
use uuid::Uuid;

use gatehouse_core::error::AppError;
use gatehouse_entity::session::RefreshSession;
use gatehouse_entity::user::{NewUser, User};

/// Storage for users and their refresh-token sessions.
///
/// Each method is a single statement against the backing store.
#[async_trait]
pub trait CredentialStore: Send + Sync + std::fmt::Debug {
    /// Creates a user. Fails with `Conflict` when the username is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, AppError>;

    /// Finds a user by exact username.
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Finds a user by id.
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Number of registered users.
    async fn count_users(&self) -> Result<i64, AppError>;

    /// Sessions of a user, oldest first.
    async fn list_sessions_for_user(&self, user_id: Uuid) -> Result<Vec<RefreshSession>, AppError>;

    /// Inserts a new session row.
    async fn insert_session(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        user_agent: Option<&str>,
        token: &str,
    ) -> Result<RefreshSession, AppError>;

    /// Replaces a session token only if it still equals `expected_token`.
    ///
    /// Returns whether a row was changed.
    async fn update_session_token(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        expected_token: &str,
        new_token: &str,
    ) -> Result<bool, AppError>;

    /// Deletes the listed sessions of a user, returning how many were removed.
    async fn remove_sessions(&self, user_id: Uuid, session_ids: &[Uuid]) -> Result<u64, AppError>;

    /// Whether the backing store is reachable.
    async fn health_check(&self) -> Result<bool, AppError>;
}
