//! SQLite record store backing the offline cache.

pub mod schema;

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, Transaction};

use crate::error::{Result, StoreError};

/// Transactional storage engine for the two cache tables.
///
/// The connection sits behind a mutex: rusqlite connections are not `Sync`,
/// and serializing access gives writes exclusivity over every other
/// operation. One store instance is meant to be constructed by the owning
/// `CacheManager` and shared by reference.
pub struct RecordStore {
  conn: Mutex<Connection>,
}

impl RecordStore {
  /// Open or create the database at the given path.
  ///
  /// The parent directory is created if missing. Schema creation uses
  /// `IF NOT EXISTS`, so opening an existing database is a no-op.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path).map_err(|e| StoreError::Init {
      path: path.to_path_buf(),
      source: e,
    })?;

    Self::from_connection(conn)
  }

  /// Open or create the database at the platform default location.
  pub fn open_default() -> Result<Self> {
    Self::open(Self::default_path()?)
  }

  /// Open a private in-memory database. Nothing survives the handle.
  pub fn open_in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory().map_err(|e| StoreError::Init {
      path: PathBuf::from(":memory:"),
      source: e,
    })?;

    Self::from_connection(conn)
  }

  /// Default database path under the platform data directory.
  pub fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| {
        std::io::Error::new(
          std::io::ErrorKind::NotFound,
          "could not determine data directory",
        )
      })?;

    Ok(data_dir.join("swipecache").join("cache.db"))
  }

  fn from_connection(conn: Connection) -> Result<Self> {
    let store = Self {
      conn: Mutex::new(conn),
    };
    store.create_tables()?;

    Ok(store)
  }

  /// Create the cache tables if they do not exist.
  fn create_tables(&self) -> Result<()> {
    let conn = self.lock()?;
    conn.execute_batch(schema::SCHEMA)?;
    Ok(())
  }

  fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
    self.conn.lock().map_err(|_| StoreError::LockPoisoned)
  }

  /// Run a read against the store.
  ///
  /// Single-statement reads are consistent on their own; the mutex keeps
  /// writes from interleaving with them.
  pub fn run_read<T>(&self, f: impl FnOnce(&Connection) -> rusqlite::Result<T>) -> Result<T> {
    let conn = self.lock()?;
    Ok(f(&conn)?)
  }

  /// Run a write inside a transaction.
  ///
  /// Every statement issued by the closure commits or rolls back together.
  /// An error from the closure rolls the transaction back and is returned
  /// to the caller.
  pub fn run_write<T>(&self, f: impl FnOnce(&Transaction) -> rusqlite::Result<T>) -> Result<T> {
    let mut conn = self.lock()?;
    let tx = conn.transaction()?;
    let value = f(&tx)?;
    tx.commit()?;

    Ok(value)
  }

  /// Close the store, flushing the underlying connection.
  pub fn close(self) -> Result<()> {
    let conn = self.conn.into_inner().map_err(|_| StoreError::LockPoisoned)?;
    conn.close().map_err(|(_, e)| StoreError::Transaction(e))
  }
}
