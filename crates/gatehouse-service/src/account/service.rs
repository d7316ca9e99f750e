//! One-time bootstrap of the first (admin) account.

use std::sync::Arc;

use tracing::{info, warn};

use gatehouse_auth::password::{PasswordHasher, PasswordPolicy};
use gatehouse_auth::store::CredentialStore;
use gatehouse_core::error::{AppError, ErrorReason};
use gatehouse_entity::user::{BuiltinRole, NewUser, User};

/// Creates accounts in the credential store.
#[derive(Debug, Clone)]
pub struct AccountService {
    store: Arc<dyn CredentialStore>,
    policy: PasswordPolicy,
    hasher: PasswordHasher,
}

impl AccountService {
    /// Creates a new account service.
    pub fn new(store: Arc<dyn CredentialStore>, policy: PasswordPolicy) -> Self {
        Self {
            store,
            policy,
            hasher: PasswordHasher::new(),
        }
    }

    /// Registers the first user as `admin`.
    ///
    /// Only allowed while no user exists. Input is validated before the store
    /// is consulted.
    pub async fn init(&self, username: &str, password: &str) -> Result<User, AppError> {
        if username.is_empty() || password.is_empty() {
            return Err(AppError::bad_parameters("Missing some required parameters"));
        }
        self.policy.check(password)?;

        if self.store.count_users().await? > 0 {
            warn!(username = %username, "Rejected init: users already exist");
            return Err(AppError::forbidden(ErrorReason::AlreadyInitialized));
        }

        let password_hash = self.hasher.hash_password(password)?;
        let user = self
            .store
            .create_user(NewUser {
                username: username.to_string(),
                password_hash,
                role: BuiltinRole::Admin.as_str().to_string(),
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, "Initial admin account created");
        Ok(user)
    }
}
