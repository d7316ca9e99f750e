//! # gatehouse-service
//!
//! Application services built on top of the auth layer. Each service takes
//! its dependencies as `Arc` references at construction time.

pub mod account;
pub mod health;
pub mod ingest;

pub use account::AccountService;
pub use health::{HealthMonitor, IngestStats};
pub use ingest::{IngestService, LineSink, MemoryLineSink, PgLineSink};
