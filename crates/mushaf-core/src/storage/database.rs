//! SQLite connection handling
//!
//! Owns the single connection behind a mutex. Every store operation takes
//! the lock exactly once, which is what makes a validate-then-write sequence
//! atomic with respect to other callers.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rusqlite::{Connection, Transaction};
use tracing::debug;

use crate::config::Config;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::schema::{init_schema, needs_init};

/// SQLite database shared by the corpus and bookmark stores
pub struct Database {
    conn: Mutex<Connection>,
    /// `None` for in-memory databases
    path: Option<PathBuf>,
}

impl Database {
    /// Open or create the database file named by the configuration
    pub fn open(config: &Config) -> StorageResult<Self> {
        let path = config.sqlite_path();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(&path)?;
        Self::prepare(&conn)?;
        debug!("Opened database at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::prepare(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    fn prepare(conn: &Connection) -> StorageResult<()> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        if needs_init(conn) {
            init_schema(conn)?;
        }
        Ok(())
    }

    /// Path of the database file, if it lives on disk
    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    /// Run `f` against the connection while holding the lock
    pub fn with_conn<T, E>(&self, f: impl FnOnce(&Connection) -> Result<T, E>) -> Result<T, E> {
        let conn = self.lock();
        f(&conn)
    }

    /// Run `f` inside a transaction while holding the lock
    ///
    /// The transaction commits only if `f` succeeds; any error rolls back
    /// everything `f` wrote.
    pub fn transaction<T, E>(&self, f: impl FnOnce(&Transaction<'_>) -> Result<T, E>) -> Result<T, E>
    where
        E: From<rusqlite::Error>,
    {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// On-disk size information
    pub fn stats(&self) -> StorageStats {
        let database_size = self
            .path
            .as_ref()
            .and_then(|p| std::fs::metadata(p).ok())
            .map(|m| m.len());

        StorageStats {
            database_path: self.path.clone(),
            database_exists: database_size.is_some(),
            database_size: database_size.unwrap_or(0),
        }
    }

    // A panic while holding the lock cannot leave a half-applied write behind:
    // writes run in transactions that roll back on drop.
    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Size information about the database file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    pub database_path: Option<PathBuf>,
    pub database_exists: bool,
    pub database_size: u64,
}

impl StorageStats {
    /// Database size formatted for humans
    pub fn database_size_human(&self) -> String {
        format_bytes(self.database_size)
    }
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
