//! Meal log database
//!
//! A pooled SQLite file that is created and migrated on open, so every
//! handle the service holds points at a ready schema.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OpenFlags};
use thiserror::Error;

use super::migrations;

/// Database error types
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] r2d2::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Cannot create database directory {path}: {source}")]
    Directory {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for database operations
pub type DbResult<T> = Result<T, DbError>;

/// Concurrent tool calls are rare; writers wait instead of failing with SQLITE_BUSY
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const POOL_SIZE: u32 = 4;

/// Pooled handle on a migrated meal log
#[derive(Clone)]
pub struct Database {
    pool: Arc<Pool<SqliteConnectionManager>>,
    path: Arc<PathBuf>,
    schema_version: i32,
}

impl Database {
    /// Open the meal log at `path`, creating its directory and the file if
    /// needed, and bring the schema up to date.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| DbError::Directory {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let manager = SqliteConnectionManager::file(&path)
            .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE)
            .with_init(|conn| {
                conn.busy_timeout(BUSY_TIMEOUT)?;
                conn.execute_batch(
                    "PRAGMA foreign_keys = ON;
                     PRAGMA journal_mode = WAL;",
                )
            });
        let pool = Pool::builder().max_size(POOL_SIZE).build(manager)?;

        let schema_version = {
            let conn = pool.get()?;
            migrations::run_migrations(&conn)?;
            migrations::get_schema_version(&conn)?
        };
        tracing::info!(path = %path.display(), schema_version, "Meal log opened");

        Ok(Self {
            pool: Arc::new(pool),
            path: Arc::new(path),
            schema_version,
        })
    }

    /// File backing the meal log
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Schema version after migrations ran on open
    pub fn schema_version(&self) -> i32 {
        self.schema_version
    }

    fn conn(&self) -> DbResult<PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get()?)
    }

    /// Run a read against a pooled connection
    pub fn with_conn<F, T>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&Connection) -> DbResult<T>,
    {
        let conn = self.conn()?;
        f(&conn)
    }

    /// Run a write that needs `&mut` (transactions)
    pub fn with_conn_mut<F, T>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&mut Connection) -> DbResult<T>,
    {
        let mut conn = self.conn()?;
        f(&mut conn)
    }
}
