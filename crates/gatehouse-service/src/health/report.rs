//! Serializable health and metrics reports.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Overall health verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Every dependency check passed.
    Healthy,
    /// At least one dependency check failed.
    Unhealthy,
}

/// Liveness probe body.
#[derive(Debug, Clone, Serialize)]
pub struct LiveReport {
    /// Always `alive`.
    pub status: &'static str,
    /// Report time.
    pub timestamp: DateTime<Utc>,
}

/// Credential store reachability.
#[derive(Debug, Clone, Serialize)]
pub struct StoreStatus {
    /// Configured backend name.
    pub backend: String,
    /// Whether the last probe succeeded.
    pub connected: bool,
    /// When the probe ran.
    pub last_check: DateTime<Utc>,
}

/// Data directory checks.
#[derive(Debug, Clone, Serialize)]
pub struct FilesystemStatus {
    /// Whether the data directory exists.
    pub data_dir_exists: bool,
    /// Whether a probe file could be written and removed.
    pub data_dir_writable: bool,
}

/// Dependency checks.
#[derive(Debug, Clone, Serialize)]
pub struct ServicesStatus {
    /// Credential store.
    pub store: StoreStatus,
    /// Data directory.
    pub filesystem: FilesystemStatus,
}

/// Importer counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Files imported successfully.
    pub files_processed: u64,
    /// Failed imports.
    pub errors: u64,
}

/// Health endpoint body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    /// Overall verdict.
    pub status: HealthStatus,
    /// Report time.
    pub timestamp: DateTime<Utc>,
    /// Seconds since the process started.
    pub uptime_seconds: u64,
    /// Dependency checks.
    pub services: ServicesStatus,
    /// Importer counters.
    pub stats: StatsSnapshot,
}

impl HealthReport {
    /// Whether every check passed.
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

/// Host information.
#[derive(Debug, Clone, Serialize)]
pub struct SystemInfo {
    /// Operating system.
    pub platform: &'static str,
    /// CPU architecture.
    pub arch: &'static str,
    /// Available parallelism.
    pub cpus: usize,
}

/// Application information.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationInfo {
    /// Seconds since the process started.
    pub uptime: u64,
    /// Crate version.
    pub version: &'static str,
    /// Deployment environment name.
    pub environment: String,
}

/// Metrics endpoint body.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    /// Report time.
    pub timestamp: DateTime<Utc>,
    /// Host information.
    pub system: SystemInfo,
    /// Application information.
    pub application: ApplicationInfo,
    /// Credential store reachability.
    pub store: StoreStatus,
    /// Importer counters.
    pub stats: StatsSnapshot,
}
