//! In-memory credential store using a Tokio mutex.
//!
//! Suitable for single-node deployments and tests. State is lost on restart.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use gatehouse_core::error::AppError;
use gatehouse_entity::session::RefreshSession;
use gatehouse_entity::user::{NewUser, User};

use super::credential::CredentialStore;

#[derive(Debug, Default)]
struct InnerState {
    users: Vec<User>,
    sessions: Vec<RefreshSession>,
}

/// In-memory credential store.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    state: Arc<Mutex<InnerState>>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut state = self.state.lock().await;

        if state.users.iter().any(|u| u.username == user.username) {
            return Err(AppError::conflict(format!(
                "Username '{}' already exists",
                user.username
            )));
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            username: user.username,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        state.users.push(created.clone());
        Ok(created)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn count_users(&self) -> Result<i64, AppError> {
        Ok(self.state.lock().await.users.len() as i64)
    }

    async fn list_sessions_for_user(&self, user_id: Uuid) -> Result<Vec<RefreshSession>, AppError> {
        let state = self.state.lock().await;
        // Insertion order is creation order.
        Ok(state
            .sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert_session(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        user_agent: Option<&str>,
        token: &str,
    ) -> Result<RefreshSession, AppError> {
        let mut state = self.state.lock().await;

        if state
            .sessions
            .iter()
            .any(|s| s.user_id == user_id && s.session_id == session_id)
        {
            return Err(AppError::conflict("Session already exists"));
        }

        let now = Utc::now();
        let session = RefreshSession {
            id: Uuid::new_v4(),
            user_id,
            session_id,
            user_agent: user_agent.map(str::to_string),
            token: token.to_string(),
            created_at: now,
            updated_at: now,
        };
        state.sessions.push(session.clone());
        Ok(session)
    }

    async fn update_session_token(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        expected_token: &str,
        new_token: &str,
    ) -> Result<bool, AppError> {
        let mut state = self.state.lock().await;

        match state.sessions.iter_mut().find(|s| {
            s.user_id == user_id && s.session_id == session_id && s.token == expected_token
        }) {
            Some(session) => {
                session.token = new_token.to_string();
                session.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_sessions(&self, user_id: Uuid, session_ids: &[Uuid]) -> Result<u64, AppError> {
        let mut state = self.state.lock().await;
        let before = state.sessions.len();
        state
            .sessions
            .retain(|s| !(s.user_id == user_id && session_ids.contains(&s.session_id)));
        Ok((before - state.sessions.len()) as u64)
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        Ok(true)
    }
}
