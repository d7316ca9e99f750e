//! Destinations for imported lines.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use gatehouse_core::error::AppError;
use gatehouse_database::DatabasePool;
use gatehouse_database::repositories::DataLineRepository;

/// Receives imported lines one at a time.
#[async_trait]
pub trait LineSink: Send + Sync + std::fmt::Debug {
    /// Stores one raw line.
    async fn insert(&self, line: &str) -> Result<(), AppError>;
}

/// Writes lines to the `data_v1` table.
#[derive(Debug, Clone)]
pub struct PgLineSink {
    repo: DataLineRepository,
}

impl PgLineSink {
    /// Creates a sink sharing the given pool.
    pub fn new(db: &DatabasePool) -> Self {
        Self {
            repo: DataLineRepository::new(db.pool().clone()),
        }
    }
}

#[async_trait]
impl LineSink for PgLineSink {
    async fn insert(&self, line: &str) -> Result<(), AppError> {
        self.repo.insert(line).await
    }
}

/// Keeps lines in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryLineSink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryLineSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines received so far.
    pub async fn lines(&self) -> Vec<String> {
        self.lines.lock().await.clone()
    }
}

#[async_trait]
impl LineSink for MemoryLineSink {
    async fn insert(&self, line: &str) -> Result<(), AppError> {
        self.lines.lock().await.push(line.to_string());
        Ok(())
    }
}
