//! Cache configuration.

use std::path::PathBuf;

use serde::Deserialize;

use crate::cache::DEFAULT_JOB_TTL_SECS;

/// Settings for the offline cache.
///
/// Deserializable so the host application can embed it in its own config
/// file; every field has a sensible default.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
  /// Database file location (defaults to the platform data directory)
  #[serde(default)]
  pub database_path: Option<PathBuf>,

  /// Seconds a cached job snapshot stays servable
  #[serde(default = "default_job_ttl_secs")]
  pub job_ttl_secs: i64,
}

fn default_job_ttl_secs() -> i64 {
  DEFAULT_JOB_TTL_SECS
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      database_path: None,
      job_ttl_secs: DEFAULT_JOB_TTL_SECS,
    }
  }
}
