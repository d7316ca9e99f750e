//! Imports `{data_path}/{YYYY-MM-DD}.txt` line by line.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use gatehouse_core::error::AppError;
use gatehouse_entity::ingest::ImportReport;

use crate::health::IngestStats;

use super::sink::LineSink;

/// Imports daily data files into a [`LineSink`].
#[derive(Debug, Clone)]
pub struct IngestService {
    data_path: PathBuf,
    sink: Arc<dyn LineSink>,
    stats: Arc<IngestStats>,
}

impl IngestService {
    /// Creates an importer reading from `data_path`.
    pub fn new(
        data_path: impl Into<PathBuf>,
        sink: Arc<dyn LineSink>,
        stats: Arc<IngestStats>,
    ) -> Self {
        Self {
            data_path: data_path.into(),
            sink,
            stats,
        }
    }

    /// Path of the file for `date`.
    pub fn file_for(&self, date: NaiveDate) -> PathBuf {
        self.data_path
            .join(format!("{}.txt", date.format("%Y-%m-%d")))
    }

    /// Imports today's file (local time).
    pub async fn import_today(&self) -> Result<ImportReport, AppError> {
        self.import_for(Local::now().date_naive()).await
    }

    /// Imports the file for `date`, one row per line.
    ///
    /// A missing file is `BadParameters`. Lines already inserted stay in
    /// place when a later line fails.
    pub async fn import_for(&self, date: NaiveDate) -> Result<ImportReport, AppError> {
        let result = self.import_file(date).await;
        match &result {
            Ok(report) => {
                self.stats.record_file();
                info!(file = %report.file, lines = report.lines_imported, "Data file imported");
            }
            Err(e) => {
                self.stats.record_error();
                warn!(date = %date, error = %e, "Data file import failed");
            }
        }
        result
    }

    async fn import_file(&self, date: NaiveDate) -> Result<ImportReport, AppError> {
        let path = self.file_for(date);

        let file = match File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::bad_parameters("This file does not exist!"));
            }
            Err(e) => return Err(e.into()),
        };

        let mut lines = BufReader::new(file).lines();
        let mut imported = 0u64;
        while let Some(line) = lines.next_line().await? {
            self.sink.insert(&line).await?;
            imported += 1;
        }

        Ok(ImportReport {
            file: path.display().to_string(),
            date,
            lines_imported: imported,
        })
    }
}
