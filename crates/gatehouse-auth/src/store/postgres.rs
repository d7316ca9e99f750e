//! PostgreSQL-backed credential store.

use async_trait::async_trait;
use uuid::Uuid;

use gatehouse_core::error::AppError;
use gatehouse_database::DatabasePool;
use gatehouse_database::repositories::{RefreshTokenRepository, UserRepository};
use gatehouse_entity::session::RefreshSession;
use gatehouse_entity::user::{NewUser, User};

use super::credential::CredentialStore;

/// Credential store over the `users` and `refresh_tokens` tables.
#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    db: DatabasePool,
    users: UserRepository,
    sessions: RefreshTokenRepository,
}

impl PgCredentialStore {
    /// Creates a store sharing the given pool.
    pub fn new(db: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(db.pool().clone()),
            sessions: RefreshTokenRepository::new(db.pool().clone()),
            db,
        }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        self.users.create(&user).await
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        self.users.find_by_username(username).await
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        self.users.find_by_id(id).await
    }

    async fn count_users(&self) -> Result<i64, AppError> {
        self.users.count().await
    }

    async fn list_sessions_for_user(&self, user_id: Uuid) -> Result<Vec<RefreshSession>, AppError> {
        self.sessions.find_by_user(user_id).await
    }

    async fn insert_session(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        user_agent: Option<&str>,
        token: &str,
    ) -> Result<RefreshSession, AppError> {
        self.sessions
            .insert(user_id, session_id, user_agent, token)
            .await
    }

    async fn update_session_token(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        expected_token: &str,
        new_token: &str,
    ) -> Result<bool, AppError> {
        self.sessions
            .update_token_if_current(user_id, session_id, expected_token, new_token)
            .await
    }

    async fn remove_sessions(&self, user_id: Uuid, session_ids: &[Uuid]) -> Result<u64, AppError> {
        self.sessions.delete_sessions(user_id, session_ids).await
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        self.db.is_reachable().await
    }
}
