//! # capmap-storage
//!
//! SQLite persistence for the capability map: a serialized writer plus a
//! round-robin read pool, versioned migrations, and one query module per
//! table. Every query is scoped by tenant.

pub mod connection;
pub mod migrations;
pub mod queries;

pub use connection::writer::with_immediate_transaction;
pub use connection::DatabaseManager;

use capmap_core::errors::StorageError;

/// Convert any displayable SQLite failure into a `StorageError`.
pub(crate) fn to_storage_err(e: impl std::fmt::Display) -> StorageError {
    StorageError::SqliteError {
        message: e.to_string(),
    }
}

/// Current wall-clock time as unix seconds, the unit of every timestamp column.
pub(crate) fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}
