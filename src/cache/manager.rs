//! Single-access-point facade over the job cache and pending queue.

use std::path::Path;

use chrono::Duration;
use tracing::{debug, error};

use super::jobs::{JobCache, DEFAULT_JOB_TTL_SECS};
use super::pending::PendingQueue;
use crate::config::CacheConfig;
use crate::db::RecordStore;
use crate::error::Result;
use crate::types::{JobListing, PendingSwipe};

/// Owner of the record store and the one handle callers hold.
///
/// Construct once, pass by reference, `close` when done. A manager whose
/// store failed to open (see `open_or_disabled`) answers every operation
/// with the empty/absent result instead of erroring, so degraded operation
/// looks exactly like an empty cache.
pub struct CacheManager {
  store: Option<RecordStore>,
  job_ttl: Duration,
}

impl CacheManager {
  /// Open or create the cache database at `path`.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    Ok(Self::with_store(RecordStore::open(path)?))
  }

  /// Open or create the cache database at the platform default location.
  pub fn open_default() -> Result<Self> {
    Ok(Self::with_store(RecordStore::open_default()?))
  }

  /// Open an in-memory cache. Nothing survives the manager.
  pub fn in_memory() -> Result<Self> {
    Ok(Self::with_store(RecordStore::open_in_memory()?))
  }

  /// Open the cache, degrading to a disabled manager on failure.
  ///
  /// The open error is logged once; afterwards every operation succeeds
  /// with the empty/absent result. Callers built for best-effort caching
  /// never see a storage error from this constructor.
  pub fn open_or_disabled(path: impl AsRef<Path>) -> Self {
    match Self::open(path) {
      Ok(manager) => manager,
      Err(e) => {
        error!("Cache store unavailable, caching disabled: {}", e);
        Self::disabled()
      }
    }
  }

  /// A manager with caching switched off.
  pub fn disabled() -> Self {
    Self {
      store: None,
      job_ttl: Duration::seconds(DEFAULT_JOB_TTL_SECS),
    }
  }

  /// Build a manager from configuration.
  pub fn from_config(config: &CacheConfig) -> Result<Self> {
    let manager = match &config.database_path {
      Some(path) => Self::open(path)?,
      None => Self::open_default()?,
    };

    Ok(manager.with_job_ttl(Duration::seconds(config.job_ttl_secs)))
  }

  /// Set the time-to-live for cached job snapshots.
  pub fn with_job_ttl(mut self, ttl: Duration) -> Self {
    self.job_ttl = ttl;
    self
  }

  fn with_store(store: RecordStore) -> Self {
    Self {
      store: Some(store),
      job_ttl: Duration::seconds(DEFAULT_JOB_TTL_SECS),
    }
  }

  /// Whether a live store backs this manager.
  pub fn is_enabled(&self) -> bool {
    self.store.is_some()
  }

  fn jobs(&self) -> Option<JobCache<'_>> {
    self
      .store
      .as_ref()
      .map(|store| JobCache::new(store).with_ttl(self.job_ttl))
  }

  fn pending(&self) -> Option<PendingQueue<'_>> {
    self.store.as_ref().map(PendingQueue::new)
  }

  /// Swap the cached job snapshot for `jobs`.
  pub fn replace_jobs(&self, jobs: &[JobListing]) -> Result<()> {
    match self.jobs() {
      Some(cache) => cache.replace(jobs),
      None => {
        debug!("Cache disabled, dropping job snapshot");
        Ok(())
      }
    }
  }

  /// Read the cached job snapshot, if present and still fresh.
  pub fn cached_jobs(&self) -> Result<Option<Vec<JobListing>>> {
    match self.jobs() {
      Some(cache) => cache.get(),
      None => Ok(None),
    }
  }

  /// Drop the cached job snapshot.
  pub fn clear_jobs(&self) -> Result<()> {
    match self.jobs() {
      Some(cache) => cache.clear(),
      None => Ok(()),
    }
  }

  /// Overwrite the pending swipe queue.
  ///
  /// Pass the complete desired queue: this is a wholesale swap, and any
  /// action omitted from a call is permanently gone.
  pub fn replace_pending(&self, actions: &[PendingSwipe]) -> Result<()> {
    match self.pending() {
      Some(queue) => queue.replace(actions),
      None => {
        debug!("Cache disabled, dropping pending swipes");
        Ok(())
      }
    }
  }

  /// Read the pending swipe queue in insertion order.
  pub fn pending_swipes(&self) -> Result<Vec<PendingSwipe>> {
    match self.pending() {
      Some(queue) => queue.get(),
      None => Ok(Vec::new()),
    }
  }

  /// Drop every queued swipe.
  pub fn clear_pending(&self) -> Result<()> {
    match self.pending() {
      Some(queue) => queue.clear(),
      None => Ok(()),
    }
  }

  /// Close the manager, flushing the store.
  pub fn close(self) -> Result<()> {
    match self.store {
      Some(store) => store.close(),
      None => Ok(()),
    }
  }
}
