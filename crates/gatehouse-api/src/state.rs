//! Application state shared across all handlers and middleware.

use std::path::Path;
use std::sync::Arc;

use gatehouse_auth::acl::{AclEvaluator, RoleSet};
use gatehouse_auth::gate::AccessGate;
use gatehouse_auth::jwt::{JwtDecoder, JwtEncoder};
use gatehouse_auth::password::PasswordPolicy;
use gatehouse_auth::session::SessionManager;
use gatehouse_auth::store::CredentialStore;
use gatehouse_core::config::AppConfig;
use gatehouse_core::error::AppError;
use gatehouse_service::{AccountService, HealthMonitor, IngestService, IngestStats, LineSink};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Login and refresh-token rotation
    pub session_manager: Arc<SessionManager>,
    /// Access token verification and ACL checks
    pub access_gate: Arc<AccessGate>,
    /// First-user bootstrap
    pub account_service: Arc<AccountService>,
    /// Daily file importer
    pub ingest_service: Arc<IngestService>,
    /// Liveness, readiness and metrics
    pub health_monitor: Arc<HealthMonitor>,
}

impl AppState {
    /// Wires every service over the given store and line sink.
    ///
    /// Fails when the custom roles file is malformed.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn CredentialStore>,
        sink: Arc<dyn LineSink>,
    ) -> Result<Self, AppError> {
        let roles = Arc::new(RoleSet::load(
            config.auth.roles_file.as_deref().map(Path::new),
        )?);

        let encoder = Arc::new(JwtEncoder::new(&config.auth));
        let decoder = Arc::new(JwtDecoder::new(&config.auth));

        let session_manager = Arc::new(SessionManager::new(
            Arc::clone(&store),
            Arc::clone(&encoder),
            Arc::clone(&decoder),
            &config.auth,
        ));
        let access_gate = Arc::new(AccessGate::new(
            Arc::clone(&decoder),
            AclEvaluator::new(roles),
        ));
        let account_service = Arc::new(AccountService::new(
            Arc::clone(&store),
            PasswordPolicy::new(&config.auth),
        ));

        let stats = Arc::new(IngestStats::new());
        let ingest_service = Arc::new(IngestService::new(
            &config.reader.data_path,
            sink,
            Arc::clone(&stats),
        ));
        let health_monitor = Arc::new(HealthMonitor::new(
            store,
            config.database.backend.to_string(),
            &config.reader.data_path,
            config.environment.clone(),
            stats,
        ));

        Ok(Self {
            config: Arc::new(config),
            session_manager,
            access_gate,
            account_service,
            ingest_service,
            health_monitor,
        })
    }
}
