pub mod error;
pub mod password;
pub mod queries;
pub mod schema;

pub use error::{Result, StoreError};
pub use password::Credential;
pub use schema::Table;

use rusqlite::{Connection, Transaction};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::info;

/// `ctime()`-style layout, e.g. `Mon Apr 30 00:21:19 2018`.
const TIME_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database file and make sure the schema exists.
    /// Existing rows are left alone; see [`Database::init_db`] for a reset.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        schema::ensure(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        schema::ensure(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Drop and recreate every table. Destroys all data.
    pub fn init_db(&self) -> Result<()> {
        self.with_tx(|tx| schema::reset(tx))?;
        info!("Blog database initialized");
        Ok(())
    }

    pub(crate) fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.lock()?;
        f(&conn)
    }

    /// Run `f` inside a single transaction. Nothing is committed unless `f`
    /// returns `Ok`.
    pub(crate) fn with_tx<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

/// Timestamp stamped on every blog and comment write. Local time, second
/// granularity.
pub fn current_time() -> String {
    chrono::Local::now().format(TIME_FORMAT).to_string()
}
