//! Read-only handle to the SQLite order store

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};
use tracing::{debug, error};

use crate::error::Result;

/// Where the store lives
#[derive(Clone, Debug, PartialEq)]
pub enum StoreConfig {
    /// Existing database file, opened read-only
    File(PathBuf),
    /// In-memory database (for testing)
    Memory,
}

/// An open connection to the order store.
///
/// Owned by the caller and passed by reference into every query; nothing in
/// the crate holds a process-wide connection.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let conn = match config {
            StoreConfig::File(path) => Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_ONLY
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?,
            StoreConfig::Memory => Connection::open_in_memory()?,
        };
        debug!(?config, "opened order store");
        Ok(Self { conn })
    }

    pub fn file(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open(&StoreConfig::File(path.into()))
    }

    pub fn memory() -> Result<Self> {
        Self::open(&StoreConfig::Memory)
    }

    /// Open a file store, logging and swallowing any failure.
    ///
    /// Returns `None` when the database cannot be opened.
    pub fn try_open(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        match Self::file(path) {
            Ok(store) => Some(store),
            Err(e) => {
                error!(path = %path.display(), "failed to open order store: {e}");
                None
            }
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
