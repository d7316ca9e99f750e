//! Liveness, readiness and metrics reporting.

pub mod monitor;
pub mod report;

pub use monitor::{HealthMonitor, IngestStats};
pub use report::{HealthReport, HealthStatus, LiveReport, MetricsReport};
