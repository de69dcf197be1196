//! SQLite store handle shared by the schema registry and the row store.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use lexicon_registry::RegistryError;
use rusqlite::Connection;

use crate::migrations::run_migrations;

/// One project's SQLite database.
///
/// The connection sits behind a mutex, so the store is a single logical
/// writer. Structural mutations that race surface the store's own error.
pub struct SqliteLexiconStore {
    conn: Mutex<Connection>,
}

impl SqliteLexiconStore {
    /// Opens or creates a SQLite database at the given path and brings the
    /// bookkeeping tables up to date.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .map_err(|e| RegistryError::storage(format!("open {}", path.display()), e))?;
        Self::from_connection(conn)
    }

    /// Opens a private in-memory database. Mostly useful for tests.
    pub fn open_in_memory() -> Result<Self, RegistryError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| RegistryError::storage("open in-memory database", e))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, RegistryError> {
        run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Locks the connection for the duration of one operation.
    pub(crate) fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, RegistryError> {
        self.conn
            .lock()
            .map_err(|e| RegistryError::storage("lock connection", e))
    }
}
