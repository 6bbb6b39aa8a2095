//! SQLite datastore holding `playlist_configuration` and the
//! `playlist_process` audit log.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rusqlite::Connection;

pub mod config_repo;
pub mod error;
pub mod gateway;
pub mod migrations;
pub mod process_repo;

pub use error::DatabaseError;
pub use gateway::PersistenceGateway;
pub use process_repo::{NewProcessRecord, ProcessRow, ProcessStatus};

/// How long a statement waits on a lock held by another process.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared handle to the one connection opened at startup.
///
/// Clones share the connection; the poller and tests may hold several.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("handles", &Arc::strong_count(&self.conn))
            .finish()
    }
}

impl Database {
    /// Opens the database file, creating it and its directory if needed,
    /// and migrates the schema.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| DatabaseError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        let db = Self::from_connection(conn)?;
        log::info!("Database opened at {}", path.display());
        Ok(db)
    }

    /// Private, migrated database used by tests.
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, DatabaseError> {
        migrations::run_all(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T, DatabaseError>
    where
        F: FnOnce(&Connection) -> Result<T, DatabaseError>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|_| DatabaseError::ConnectionPoisoned)?;
        f(&conn)
    }

    /// Closes the connection if this is the last handle. Otherwise the
    /// connection stays open until the remaining clones are dropped.
    pub fn close(self) -> Result<(), DatabaseError> {
        let mutex = match Arc::try_unwrap(self.conn) {
            Ok(mutex) => mutex,
            Err(shared) => {
                log::debug!(
                    "Database still has {} other handle(s), leaving connection open",
                    Arc::strong_count(&shared) - 1
                );
                return Ok(());
            }
        };

        let conn = mutex
            .into_inner()
            .map_err(|_| DatabaseError::ConnectionPoisoned)?;
        conn.close().map_err(|(_, e)| DatabaseError::Query(e))?;
        log::info!("Database connection closed");
        Ok(())
    }
}
