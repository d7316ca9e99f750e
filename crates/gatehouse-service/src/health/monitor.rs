//! Health monitor tracking dependency reachability and importer counters.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use gatehouse_auth::store::CredentialStore;

use super::report::{
    ApplicationInfo, FilesystemStatus, HealthReport, HealthStatus, LiveReport, MetricsReport,
    ServicesStatus, StatsSnapshot, StoreStatus, SystemInfo,
};

/// Prefix of the scratch files written into the data directory.
const SCRATCH_PREFIX: &str = ".health_check";

/// Importer success and failure counters.
#[derive(Debug, Default)]
pub struct IngestStats {
    files_processed: AtomicU64,
    errors: AtomicU64,
}

impl IngestStats {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successfully imported file.
    pub fn record_file(&self) {
        self.files_processed.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a failed import.
    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Current counter values.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            files_processed: self.files_processed.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

/// Builds liveness, health, readiness and metrics reports.
#[derive(Debug, Clone)]
pub struct HealthMonitor {
    started: Instant,
    store: Arc<dyn CredentialStore>,
    backend: String,
    data_path: PathBuf,
    environment: String,
    stats: Arc<IngestStats>,
}

impl HealthMonitor {
    /// Creates a monitor. `backend` is the configured store name.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        backend: impl Into<String>,
        data_path: impl Into<PathBuf>,
        environment: impl Into<String>,
        stats: Arc<IngestStats>,
    ) -> Self {
        Self {
            started: Instant::now(),
            store,
            backend: backend.into(),
            data_path: data_path.into(),
            environment: environment.into(),
            stats,
        }
    }

    /// Importer counters shared with the ingest service.
    pub fn stats(&self) -> Arc<IngestStats> {
        Arc::clone(&self.stats)
    }

    /// Seconds since the monitor was created.
    pub fn uptime_seconds(&self) -> u64 {
        self.started.elapsed().as_secs()
    }

    /// Liveness never checks dependencies.
    pub fn live(&self) -> LiveReport {
        LiveReport {
            status: "alive",
            timestamp: Utc::now(),
        }
    }

    /// Checks the store and the data directory.
    pub async fn health(&self) -> HealthReport {
        let store = self.store_status().await;
        let filesystem = check_data_dir(&self.data_path).await;

        let healthy =
            store.connected && filesystem.data_dir_exists && filesystem.data_dir_writable;

        HealthReport {
            status: if healthy {
                HealthStatus::Healthy
            } else {
                HealthStatus::Unhealthy
            },
            timestamp: Utc::now(),
            uptime_seconds: self.uptime_seconds(),
            services: ServicesStatus { store, filesystem },
            stats: self.stats.snapshot(),
        }
    }

    /// Readiness requires every health check to pass.
    pub async fn ready(&self) -> bool {
        self.health().await.is_healthy()
    }

    /// Host and application metrics.
    pub async fn metrics(&self) -> MetricsReport {
        MetricsReport {
            timestamp: Utc::now(),
            system: SystemInfo {
                platform: std::env::consts::OS,
                arch: std::env::consts::ARCH,
                cpus: std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1),
            },
            application: ApplicationInfo {
                uptime: self.uptime_seconds(),
                version: env!("CARGO_PKG_VERSION"),
                environment: self.environment.clone(),
            },
            store: self.store_status().await,
            stats: self.stats.snapshot(),
        }
    }

    async fn store_status(&self) -> StoreStatus {
        let connected = match self.store.health_check().await {
            Ok(ok) => ok,
            Err(e) => {
                warn!(error = %e, "Credential store health check failed");
                false
            }
        };
        StoreStatus {
            backend: self.backend.clone(),
            connected,
            last_check: Utc::now(),
        }
    }
}

async fn check_data_dir(dir: &Path) -> FilesystemStatus {
    let exists = tokio::fs::metadata(dir)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);
    if !exists {
        return FilesystemStatus {
            data_dir_exists: false,
            data_dir_writable: false,
        };
    }

    // One file per call so concurrent checks never remove each other's file.
    let scratch = dir.join(format!("{SCRATCH_PREFIX}-{}", Uuid::new_v4()));
    let writable = match tokio::fs::write(&scratch, b"ok").await {
        Ok(()) => tokio::fs::remove_file(&scratch).await.is_ok(),
        Err(e) => {
            warn!(path = %dir.display(), error = %e, "Data directory is not writable");
            false
        }
    };

    FilesystemStatus {
        data_dir_exists: true,
        data_dir_writable: writable,
    }
}
