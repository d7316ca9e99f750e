//! Line importer configuration.

use serde::{Deserialize, Serialize};

/// Where the daily data files are picked up from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Directory containing `YYYY-MM-DD.txt` files.
    #[serde(default = "default_data_path")]
    pub data_path: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
        }
    }
}

fn default_data_path() -> String {
    "./data".to_string()
}
