//! SQLite connection management for the long-lived workspace store.
//!
//! [`Database`] wraps a `rusqlite::Connection` and brings the schema up to
//! date on open.

use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

use super::migrations;

/// Owned SQLite connection with migrations applied.
pub struct Database {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Database {
    /// Opens (or creates) the database file at `path`, creating missing parent
    /// directories, and runs migrations.
    ///
    /// # Errors
    /// Returns `rusqlite::Error` if the connection cannot be established or migrations fail.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            // Connection::open reports the real error if this fails.
            let _ = fs::create_dir_all(parent);
        }
        let db = Self {
            conn: Connection::open(path)?,
            path: Some(path.to_path_buf()),
        };
        migrations::run_all(&db.conn)?;
        Ok(db)
    }

    /// Opens an in-memory database, discarded on drop. Used by tests and by
    /// hosts that want SQL semantics without touching disk.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let db = Self {
            conn: Connection::open_in_memory()?,
            path: None,
        };
        migrations::run_all(&db.conn)?;
        Ok(db)
    }

    /// File backing this database, `None` when in memory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn schema_version(&self) -> i32 {
        migrations::get_schema_version(&self.conn)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
