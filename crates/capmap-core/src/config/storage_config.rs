use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file. In-memory when absent.
    pub db_path: Option<PathBuf>,
    /// Number of read connections (1..=8).
    pub read_pool_size: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            read_pool_size: 4,
        }
    }
}
