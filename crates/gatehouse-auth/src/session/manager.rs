//! Session lifecycle manager: login and refresh-token rotation.
//!
//! A session id is minted on the first rotation of a login grant and stays
//! fixed afterwards; every rotation replaces the stored token, so a
//! rotated-out token can never be presented again.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use gatehouse_core::config::AuthConfig;
use gatehouse_core::error::{AppError, ErrorReason};
use gatehouse_entity::session::TokenPair;

use crate::jwt::{JwtDecoder, JwtEncoder};
use crate::password::PasswordHasher;
use crate::store::CredentialStore;

const DUMMY_PASSWORD: &str = "gatehouse-unknown-user";

/// Issues and rotates token pairs backed by a [`CredentialStore`].
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn CredentialStore>,
    encoder: Arc<JwtEncoder>,
    decoder: Arc<JwtDecoder>,
    hasher: PasswordHasher,
    /// Verified against on unknown usernames so both failures cost one Argon2 run.
    dummy_hash: Option<String>,
    /// Lifetime of session refresh tokens.
    refresh_ttl: Duration,
    /// Lifetime of the session-less grant minted by login.
    login_grant_ttl: Duration,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("store", &self.store)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("login_grant_ttl", &self.login_grant_ttl)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Creates a session manager.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        encoder: Arc<JwtEncoder>,
        decoder: Arc<JwtDecoder>,
        config: &AuthConfig,
    ) -> Self {
        let hasher = PasswordHasher::new();
        let dummy_hash = hasher
            .hash_password(DUMMY_PASSWORD)
            .inspect_err(|e| warn!(error = %e, "Failed to prepare dummy password hash"))
            .ok();

        Self {
            store,
            encoder,
            decoder,
            hasher,
            dummy_hash,
            refresh_ttl: Duration::days(config.refresh_token_ttl_days as i64),
            login_grant_ttl: Duration::seconds(config.login_grant_ttl_seconds as i64),
        }
    }

    /// Verifies credentials and opens a new session.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        user_agent: Option<&str>,
    ) -> Result<TokenPair, AppError> {
        let Some(user) = self.store.find_user_by_username(username).await? else {
            if let Some(dummy) = &self.dummy_hash {
                let _ = self.hasher.verify_password(password, dummy);
            }
            info!(username = %username, "Login failed: unknown user");
            return Err(AppError::unauthorized(ErrorReason::AuthenticationFailed));
        };

        if !self
            .hasher
            .verify_password(password, &user.password_hash)?
        {
            info!(user_id = %user.id, "Login failed: wrong password");
            return Err(AppError::unauthorized(ErrorReason::AuthenticationFailed));
        }

        let (grant, _) = self
            .encoder
            .issue_refresh_token(user.id, None, self.login_grant_ttl)?;

        let pair = self.rotate(&grant, user_agent).await?;
        info!(user_id = %user.id, session_id = %pair.session_id, "User logged in");
        Ok(pair)
    }

    /// Exchanges a refresh token for a new token pair.
    ///
    /// The presented token must be the current token of its session; a
    /// rotated-out token fails with `SessionNotFound`.
    pub async fn rotate(
        &self,
        refresh_token: &str,
        user_agent: Option<&str>,
    ) -> Result<TokenPair, AppError> {
        let claims = self.decoder.verify_refresh(refresh_token)?;

        let user = self
            .store
            .find_user_by_id(claims.user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized(ErrorReason::UserNotFound))?;

        let sessions = self.store.list_sessions_for_user(user.id).await?;

        if let Some(session_id) = claims.session_id {
            if !sessions.iter().any(|s| s.matches(session_id, refresh_token)) {
                warn!(
                    user_id = %user.id,
                    session_id = %session_id,
                    "Refresh token is not the current token of its session"
                );
                return Err(AppError::unauthorized(ErrorReason::SessionNotFound));
            }
        }

        let (access_token, access_expires_at) =
            self.encoder
                .issue_access_token(user.id, &user.username, &user.role)?;

        let (live, expired): (Vec<_>, Vec<_>) = sessions
            .into_iter()
            .partition(|s| self.decoder.verify_refresh(&s.token).is_ok());
        let expired: Vec<Uuid> = expired.into_iter().map(|s| s.session_id).collect();

        let current = claims
            .session_id
            .filter(|id| live.iter().any(|s| s.session_id == *id));

        let (session_id, refresh_token_out, refresh_expires_at) = match current {
            Some(session_id) => {
                let (token, exp) =
                    self.encoder
                        .issue_refresh_token(user.id, Some(session_id), self.refresh_ttl)?;

                let updated = self
                    .store
                    .update_session_token(user.id, session_id, refresh_token, &token)
                    .await?;
                if !updated {
                    warn!(
                        user_id = %user.id,
                        session_id = %session_id,
                        "Concurrent rotation detected"
                    );
                    return Err(AppError::unauthorized(ErrorReason::SessionNotFound));
                }

                debug!(user_id = %user.id, session_id = %session_id, "Refresh token rotated");
                (session_id, token, exp)
            }
            None => {
                let session_id = Uuid::new_v4();
                let (token, exp) =
                    self.encoder
                        .issue_refresh_token(user.id, Some(session_id), self.refresh_ttl)?;

                self.store
                    .insert_session(user.id, session_id, user_agent, &token)
                    .await?;

                info!(user_id = %user.id, session_id = %session_id, "Session created");
                (session_id, token, exp)
            }
        };

        if !expired.is_empty() {
            match self.store.remove_sessions(user.id, &expired).await {
                Ok(removed) => debug!(user_id = %user.id, removed, "Pruned expired sessions"),
                Err(e) => warn!(user_id = %user.id, error = %e, "Failed to prune expired sessions"),
            }
        }

        Ok(TokenPair {
            access_token,
            refresh_token: refresh_token_out,
            access_expires_at,
            refresh_expires_at,
            session_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use gatehouse_entity::session::RefreshSession;
    use gatehouse_entity::user::{NewUser, User};

    use super::*;
    use crate::store::MemoryCredentialStore;

    fn config() -> AuthConfig {
        serde_json::from_value(serde_json::json!({
            "access_token_secret": "access-secret",
            "refresh_token_secret": "refresh-secret",
        }))
        .unwrap()
    }

    async fn setup(store: Arc<dyn CredentialStore>) -> (SessionManager, User) {
        let cfg = config();
        let hash = PasswordHasher::new().hash_password("Str0ng!Pass").unwrap();
        let user = store
            .create_user(NewUser {
                username: "alice".into(),
                password_hash: hash,
                role: "admin".into(),
            })
            .await
            .unwrap();
        let manager = SessionManager::new(
            store,
            Arc::new(JwtEncoder::new(&cfg)),
            Arc::new(JwtDecoder::new(&cfg)),
            &cfg,
        );
        (manager, user)
    }

    #[tokio::test]
    async fn test_login_creates_session() {
        let store = Arc::new(MemoryCredentialStore::new());
        let (manager, user) = setup(store.clone()).await;

        let pair = manager.login("alice", "Str0ng!Pass", Some("test")).await.unwrap();
        let sessions = store.list_sessions_for_user(user.id).await.unwrap();

        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].session_id, pair.session_id);
        assert_eq!(sessions[0].token, pair.refresh_token);
        assert_eq!(sessions[0].user_agent.as_deref(), Some("test"));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let store = Arc::new(MemoryCredentialStore::new());
        let (manager, _) = setup(store).await;

        let wrong = manager.login("alice", "nope", None).await.unwrap_err();
        let unknown = manager.login("bob", "Str0ng!Pass", None).await.unwrap_err();
        assert!(wrong.is(ErrorReason::AuthenticationFailed));
        assert!(unknown.is(ErrorReason::AuthenticationFailed));
        assert_eq!(wrong.message, unknown.message);
    }

    #[tokio::test]
    async fn test_unknown_user_verifies_against_dummy_hash() {
        let store = Arc::new(MemoryCredentialStore::new());
        let (manager, _) = setup(store).await;

        let dummy = manager.dummy_hash.as_deref().unwrap();
        assert!(!manager.hasher.verify_password("Str0ng!Pass", dummy).unwrap());
        assert!(manager.hasher.verify_password(DUMMY_PASSWORD, dummy).unwrap());
    }

    #[tokio::test]
    async fn test_rotation_keeps_session_and_rejects_replay() {
        let store = Arc::new(MemoryCredentialStore::new());
        let (manager, user) = setup(store.clone()).await;

        let first = manager.login("alice", "Str0ng!Pass", None).await.unwrap();
        let second = manager.rotate(&first.refresh_token, None).await.unwrap();

        assert_eq!(first.session_id, second.session_id);
        assert_ne!(first.refresh_token, second.refresh_token);

        let replay = manager.rotate(&first.refresh_token, None).await.unwrap_err();
        assert!(replay.is(ErrorReason::SessionNotFound));

        let sessions = store.list_sessions_for_user(user.id).await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].token, second.refresh_token);
    }

    #[tokio::test]
    async fn test_two_logins_two_sessions() {
        let store = Arc::new(MemoryCredentialStore::new());
        let (manager, user) = setup(store.clone()).await;

        let a = manager.login("alice", "Str0ng!Pass", None).await.unwrap();
        let b = manager.login("alice", "Str0ng!Pass", None).await.unwrap();
        assert_ne!(a.session_id, b.session_id);
        assert_eq!(store.list_sessions_for_user(user.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_expired_sessions_are_pruned() {
        let store = Arc::new(MemoryCredentialStore::new());
        let (manager, user) = setup(store.clone()).await;

        let cfg = config();
        let stale_id = Uuid::new_v4();
        let (stale, _) = JwtEncoder::new(&cfg)
            .issue_refresh_token(user.id, Some(stale_id), Duration::seconds(-60))
            .unwrap();
        store.insert_session(user.id, stale_id, None, &stale).await.unwrap();

        let pair = manager.login("alice", "Str0ng!Pass", None).await.unwrap();
        let sessions = store.list_sessions_for_user(user.id).await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].session_id, pair.session_id);
    }

    #[tokio::test]
    async fn test_deleted_user() {
        let cfg = config();
        let store = Arc::new(MemoryCredentialStore::new());
        let (manager, _) = setup(store).await;
        let (orphan, _) = JwtEncoder::new(&cfg)
            .issue_refresh_token(Uuid::new_v4(), None, Duration::seconds(60))
            .unwrap();

        let err = manager.rotate(&orphan, None).await.unwrap_err();
        assert!(err.is(ErrorReason::UserNotFound));
    }

    #[tokio::test]
    async fn test_expired_refresh_token() {
        let store = Arc::new(MemoryCredentialStore::new());
        let (manager, user) = setup(store.clone()).await;

        let session_id = Uuid::new_v4();
        let (expired, _) = JwtEncoder::new(&config())
            .issue_refresh_token(user.id, Some(session_id), Duration::seconds(-60))
            .unwrap();
        store
            .insert_session(user.id, session_id, None, &expired)
            .await
            .unwrap();

        let err = manager.rotate(&expired, None).await.unwrap_err();
        assert!(err.is(ErrorReason::Expired));
        assert!(!err.is(ErrorReason::Invalid));
    }

    #[tokio::test]
    async fn test_invalid_token() {
        let store = Arc::new(MemoryCredentialStore::new());
        let (manager, _) = setup(store).await;
        let err = manager.rotate("garbage", None).await.unwrap_err();
        assert!(err.is(ErrorReason::Invalid));
    }

    /// Delegates to a memory store but loses every conditional update.
    #[derive(Debug, Default)]
    struct LosingStore(MemoryCredentialStore);

    #[async_trait]
    impl CredentialStore for LosingStore {
        async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
            self.0.create_user(user).await
        }
        async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
            self.0.find_user_by_username(username).await
        }
        async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
            self.0.find_user_by_id(id).await
        }
        async fn count_users(&self) -> Result<i64, AppError> {
            self.0.count_users().await
        }
        async fn list_sessions_for_user(
            &self,
            user_id: Uuid,
        ) -> Result<Vec<RefreshSession>, AppError> {
            self.0.list_sessions_for_user(user_id).await
        }
        async fn insert_session(
            &self,
            user_id: Uuid,
            session_id: Uuid,
            user_agent: Option<&str>,
            token: &str,
        ) -> Result<RefreshSession, AppError> {
            self.0.insert_session(user_id, session_id, user_agent, token).await
        }
        async fn update_session_token(
            &self,
            _user_id: Uuid,
            _session_id: Uuid,
            _expected_token: &str,
            _new_token: &str,
        ) -> Result<bool, AppError> {
            Ok(false)
        }
        async fn remove_sessions(&self, user_id: Uuid, ids: &[Uuid]) -> Result<u64, AppError> {
            self.0.remove_sessions(user_id, ids).await
        }
        async fn health_check(&self) -> Result<bool, AppError> {
            Ok(true)
        }
    }

    #[tokio::test]
    async fn test_lost_race_is_session_not_found() {
        let store = Arc::new(LosingStore::default());
        let (manager, _) = setup(store).await;

        let pair = manager.login("alice", "Str0ng!Pass", None).await.unwrap();
        let err = manager.rotate(&pair.refresh_token, None).await.unwrap_err();
        assert!(err.is(ErrorReason::SessionNotFound));
    }
}
