//! Versioned schema migrations tracked through `PRAGMA user_version`.

pub mod v001_capabilities;
pub mod v002_strategy;
pub mod v003_realizations;

use capmap_core::errors::StorageError;
use rusqlite::Connection;

use crate::to_storage_err;

/// Ordered (version, SQL) pairs.
const MIGRATIONS: &[(u32, &str)] = &[
    (1, v001_capabilities::MIGRATION_SQL),
    (2, v002_strategy::MIGRATION_SQL),
    (3, v003_realizations::MIGRATION_SQL),
];

/// Latest schema version.
pub const LATEST_VERSION: u32 = 3;

/// Read the schema version recorded in the database.
pub fn current_version(conn: &Connection) -> Result<u32, StorageError> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(to_storage_err)
}

/// Apply every migration newer than the recorded version, each in its own
/// transaction. Returns the resulting version.
pub fn run_migrations(conn: &Connection) -> Result<u32, StorageError> {
    let mut version = current_version(conn)?;
    for &(target, sql) in MIGRATIONS {
        if target <= version {
            continue;
        }
        let batch = format!("BEGIN;\n{sql}\nPRAGMA user_version = {target};\nCOMMIT;");
        if let Err(e) = conn.execute_batch(&batch) {
            let _ = conn.execute_batch("ROLLBACK;");
            return Err(StorageError::MigrationFailed {
                version: target,
                reason: e.to_string(),
            });
        }
        tracing::info!(version = target, "applied schema migration");
        version = target;
    }
    Ok(version)
}
