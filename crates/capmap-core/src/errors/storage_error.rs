//! Storage-layer errors for SQLite operations.

use super::error_code::{self, CapmapErrorCode};

/// Errors raised by the persistence layer. All are transient from the
/// projection runtime's point of view.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },
}

impl CapmapErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::SqliteError { .. } => error_code::STORAGE_ERROR,
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
        }
    }
}
