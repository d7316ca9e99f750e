//! Repository for imported data lines.

use sqlx::PgPool;

use gatehouse_core::error::{AppError, ErrorKind};
use gatehouse_core::result::AppResult;

/// Repository for the `data_v1` table.
#[derive(Debug, Clone)]
pub struct DataLineRepository {
    pool: PgPool,
}

impl DataLineRepository {
    /// Create a new data line repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert one raw line.
    pub async fn insert(&self, data: &str) -> AppResult<()> {
        sqlx::query("INSERT INTO data_v1 (data) VALUES ($1)")
            .bind(data)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert data line", e))?;
        Ok(())
    }

    /// Count stored lines.
    pub async fn count(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM data_v1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count data lines", e))
    }
}
