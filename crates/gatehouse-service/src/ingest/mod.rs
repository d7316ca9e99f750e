//! Daily text file importer.

pub mod service;
pub mod sink;

pub use service::IngestService;
pub use sink::{LineSink, MemoryLineSink, PgLineSink};
