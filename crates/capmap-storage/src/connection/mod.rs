//! Connection management: write-serialized + read-pooled.

pub mod pool;
pub mod pragmas;
pub mod writer;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use capmap_core::config::StorageConfig;
use capmap_core::errors::StorageError;
use rusqlite::{Connection, Transaction};

use self::pool::ReadPool;
use self::pragmas::apply_pragmas;
use crate::{migrations, to_storage_err};

/// Manages the single write connection and the read connection pool.
///
/// In-memory databases have no read pool: a second in-memory connection would
/// be a different database, so reads are routed through the writer.
pub struct DatabaseManager {
    writer: Mutex<Connection>,
    readers: Option<ReadPool>,
    path: Option<PathBuf>,
}

impl DatabaseManager {
    /// Open a database at the given path, apply pragmas, run migrations.
    pub fn open(path: &Path, read_pool_size: usize) -> Result<Self, StorageError> {
        let writer = Connection::open(path).map_err(to_storage_err)?;
        apply_pragmas(&writer)?;
        migrations::run_migrations(&writer)?;

        let readers = ReadPool::open(path, read_pool_size)?;

        Ok(Self {
            writer: Mutex::new(writer),
            readers: Some(readers),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let writer = Connection::open_in_memory().map_err(to_storage_err)?;
        apply_pragmas(&writer)?;
        migrations::run_migrations(&writer)?;

        Ok(Self {
            writer: Mutex::new(writer),
            readers: None,
            path: None,
        })
    }

    /// Open according to configuration: file-backed when a path is set.
    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        match &config.db_path {
            Some(path) => Self::open(path, config.read_pool_size),
            None => Self::open_in_memory(),
        }
    }

    /// Execute a write operation with the serialized writer connection.
    pub fn with_writer<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let guard = self.writer.lock().map_err(|_| StorageError::SqliteError {
            message: "write lock poisoned".to_string(),
        })?;
        f(&guard)
    }

    /// Execute `f` inside a BEGIN IMMEDIATE transaction on the writer.
    /// All writes made by `f` commit together or not at all.
    pub fn with_write_transaction<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, E>,
        E: From<StorageError>,
    {
        let guard = self.writer.lock().map_err(|_| StorageError::SqliteError {
            message: "write lock poisoned".to_string(),
        })?;
        writer::with_immediate_transaction(&guard, f)
    }

    /// Execute a read operation on a pooled read connection
    /// (the writer for in-memory databases).
    pub fn with_reader<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        match &self.readers {
            Some(readers) => readers.with_conn(f),
            None => self.with_writer(f),
        }
    }

    /// Run a WAL checkpoint (TRUNCATE mode).
    pub fn checkpoint(&self) -> Result<(), StorageError> {
        self.with_writer(|conn| {
            conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")
                .map_err(to_storage_err)
        })
    }

    /// Get the database file path (None for in-memory).
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of pooled read connections (0 for in-memory).
    pub fn read_pool_size(&self) -> usize {
        self.readers.as_ref().map_or(0, ReadPool::size)
    }
}
