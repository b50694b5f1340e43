//! Storage connection management.
//!
//! [`LocalStorage`] owns a [`rusqlite::Connection`] behind a mutex so a single
//! handle can be shared by every store of a session, and guarantees that
//! migrations are run before any other operation.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use directories::ProjectDirs;
use rusqlite::Connection;

use crate::error::{Result, StoreError};
use crate::migrations;

/// File name of the storage database inside the data directory.
pub const STORAGE_FILE: &str = "local_storage.db";

/// Persistent key/value storage for client state.
pub struct LocalStorage {
    conn: Mutex<Connection>,
}

impl LocalStorage {
    /// Open (or create) storage in the platform data directory:
    /// - Linux:   `~/.local/share/flowinity/local_storage.db`
    /// - macOS:   `~/Library/Application Support/com.flowinity.flowinity/local_storage.db`
    /// - Windows: `{FOLDERID_RoamingAppData}\flowinity\flowinity\data\local_storage.db`
    pub fn open_default() -> Result<Self> {
        let project_dirs =
            ProjectDirs::from("com", "flowinity", "flowinity").ok_or(StoreError::NoDataDir)?;
        Self::open_in_dir(project_dirs.data_dir())
    }

    /// Open (or create) storage inside `dir`, creating the directory if needed.
    pub fn open_in_dir(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(STORAGE_FILE);

        tracing::info!(path = %path.display(), "opening local storage");

        Self::open_at(&path)
    }

    /// Open (or create) storage at an explicit file path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::from_connection(conn)
    }

    /// Volatile storage that disappears with the handle. Used by tests and
    /// by sessions that must not leave anything on disk.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Lock the underlying connection.
    pub(crate) fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Filesystem path of the open database, `None` when in memory.
    pub fn path(&self) -> Option<PathBuf> {
        let conn = self.conn().ok()?;
        conn.path()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }
}
