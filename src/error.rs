//! Error types for the cache store.

use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the cache store.
#[derive(Debug, Error)]
pub enum StoreError {
  /// The database file could not be opened or created
  #[error("failed to open cache database at {path}: {source}")]
  Init {
    path: PathBuf,
    #[source]
    source: rusqlite::Error,
  },

  /// A read or write failed; any enclosing transaction was rolled back
  #[error("cache transaction failed: {0}")]
  Transaction(#[from] rusqlite::Error),

  /// The cache directory could not be created
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// A previous caller panicked while holding the store lock
  #[error("cache store lock poisoned")]
  LockPoisoned,
}

/// Result type alias for cache store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
