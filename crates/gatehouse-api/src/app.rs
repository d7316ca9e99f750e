//! Application builder and server lifecycle.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::sync::watch;
use tracing::{error, info, warn};

use gatehouse_auth::store::{CredentialStore, MemoryCredentialStore, PgCredentialStore};
use gatehouse_core::config::{AppConfig, StoreBackend};
use gatehouse_core::error::AppError;
use gatehouse_database::DatabasePool;
use gatehouse_database::migration::run_migrations;
use gatehouse_service::{LineSink, MemoryLineSink, PgLineSink};

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the Gatehouse server until Ctrl+C or SIGTERM.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    info!(
        environment = %config.environment,
        backend = %config.database.backend,
        "Starting Gatehouse v{}",
        env!("CARGO_PKG_VERSION")
    );

    // ── Step 1: Data directory ───────────────────────────────────
    tokio::fs::create_dir_all(&config.reader.data_path)
        .await
        .map_err(|e| {
            AppError::internal(format!(
                "Failed to create data dir '{}': {e}",
                config.reader.data_path
            ))
        })?;

    // ── Step 2: Credential store + line sink ─────────────────────
    let (db, store, sink): (Option<DatabasePool>, Arc<dyn CredentialStore>, Arc<dyn LineSink>) =
        match config.database.backend {
            StoreBackend::Postgres => {
                let db = DatabasePool::connect(&config.database).await?;
                run_migrations(db.pool()).await?;
                let store = Arc::new(PgCredentialStore::new(db.clone()));
                let sink = Arc::new(PgLineSink::new(&db));
                (Some(db), store, sink)
            }
            StoreBackend::Memory => {
                warn!("Using in-memory credential store; all data is lost on restart");
                (
                    None,
                    Arc::new(MemoryCredentialStore::new()),
                    Arc::new(MemoryLineSink::new()),
                )
            }
        };

    // ── Step 3: Services + router ────────────────────────────────
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = build_app(AppState::new(config, store, sink)?);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    info!("Gatehouse listening on {}", addr);

    // ── Step 4: Serve until signalled ────────────────────────────
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.changed().await;
            })
            .await
    });

    shutdown_signal().await;
    info!("Shutdown signal received, draining in-flight requests...");
    let _ = shutdown_tx.send(true);

    match tokio::time::timeout(grace, server).await {
        Ok(Ok(Ok(()))) => {}
        Ok(Ok(Err(e))) => error!("Server error: {}", e),
        Ok(Err(e)) => error!("Server task failed: {}", e),
        Err(_) => warn!(
            grace_seconds = grace.as_secs(),
            "Grace period elapsed with requests still in flight"
        ),
    }

    if let Some(db) = db {
        db.close().await;
    }

    info!("Gatehouse shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
