//! Device-local persistence for the JobSwipe client.
//!
//! Lets the app keep working while disconnected: the last fetched job feed
//! is cached wholesale with a time-to-live, and swipes performed offline
//! queue up until a sync coordinator delivers them. Storage is a single
//! SQLite file with two tables; every write is an atomic full-table swap,
//! so a reader never observes a half-replaced snapshot.
//!
//! Typical use:
//!
//! ```no_run
//! use swipecache::CacheManager;
//!
//! let cache = CacheManager::open_default()?;
//!
//! // After a successful feed fetch
//! # let fetched = Vec::new();
//! cache.replace_jobs(&fetched)?;
//!
//! // When the network is down, fall back to the snapshot
//! if let Some(jobs) = cache.cached_jobs()? {
//!   // render `jobs`
//! }
//! # Ok::<(), swipecache::StoreError>(())
//! ```

pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod types;

pub use cache::{CacheManager, JobCache, PendingQueue, DEFAULT_JOB_TTL_SECS};
pub use config::CacheConfig;
pub use db::RecordStore;
pub use error::{Result, StoreError};
pub use types::{JobListing, PendingSwipe, SwipeDirection};
