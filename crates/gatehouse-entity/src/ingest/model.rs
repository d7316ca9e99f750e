//! Data line and import report models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One line of an imported data file (`data_v1` table).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DataLine {
    /// Row identifier.
    pub id: i64,
    /// Raw line contents.
    pub data: String,
    /// Insertion time.
    pub created_at: DateTime<Utc>,
}

/// Outcome of importing one daily file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    /// Path of the imported file.
    pub file: String,
    /// Date the file belongs to.
    pub date: NaiveDate,
    /// Number of lines inserted.
    pub lines_imported: u64,
}
