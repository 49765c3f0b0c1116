//! Full-replace cache of the most recent job feed snapshot.

use chrono::{Duration, Utc};
use rusqlite::params;
use tracing::{debug, warn};

use crate::db::RecordStore;
use crate::error::Result;
use crate::types::JobListing;

/// Seconds a cached feed snapshot stays servable.
pub const DEFAULT_JOB_TTL_SECS: i64 = 3600;

/// Replace-on-refresh cache of the job feed, with a time-to-live.
///
/// The table holds either nothing or exactly one batch, every row stamped
/// with the same timestamp. There is no per-job update; the only write is a
/// wholesale swap of the snapshot.
pub struct JobCache<'a> {
  store: &'a RecordStore,
  ttl: Duration,
}

impl<'a> JobCache<'a> {
  pub fn new(store: &'a RecordStore) -> Self {
    Self {
      store,
      ttl: Duration::seconds(DEFAULT_JOB_TTL_SECS),
    }
  }

  /// Set the time-to-live for cached snapshots.
  pub fn with_ttl(mut self, ttl: Duration) -> Self {
    self.ttl = ttl;
    self
  }

  /// Swap the cached snapshot for `jobs` atomically.
  ///
  /// Deletes every existing row and inserts the full new list in one
  /// transaction, stamping each row with the same current timestamp. A
  /// crash mid-batch leaves the previous snapshot intact.
  pub fn replace(&self, jobs: &[JobListing]) -> Result<()> {
    self.replace_at(jobs, now_secs())
  }

  fn replace_at(&self, jobs: &[JobListing], now: f64) -> Result<()> {
    self.store.run_write(|tx| {
      tx.execute("DELETE FROM job_cache", [])?;

      let mut stmt = tx.prepare(
        "INSERT OR REPLACE INTO job_cache
         (id, title, company, location, snippet, score, apply_url, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
      )?;
      for job in jobs {
        stmt.execute(params![
          job.id,
          job.title,
          job.company,
          job.location,
          job.snippet,
          job.score,
          job.apply_url,
          now,
        ])?;
      }

      Ok(())
    })
  }

  /// Read the cached snapshot, expiring it lazily.
  ///
  /// Returns `None` when nothing is cached or the batch has outlived the
  /// TTL; an expired batch is deleted as a side effect of the read. The
  /// read, the staleness check, and the delete share one transaction, so no
  /// caller can observe a half-expired snapshot.
  pub fn get(&self) -> Result<Option<Vec<JobListing>>> {
    self.get_at(now_secs())
  }

  fn get_at(&self, now: f64) -> Result<Option<Vec<JobListing>>> {
    let ttl_secs = self.ttl.num_seconds() as f64;

    self.store.run_write(|tx| {
      let mut stmt = tx.prepare(
        "SELECT id, title, company, location, snippet, score, apply_url, timestamp
         FROM job_cache",
      )?;

      let rows = stmt.query_map([], |row| {
        Ok((
          JobListing {
            id: row.get(0)?,
            title: row.get(1)?,
            company: row.get(2)?,
            location: row.get(3)?,
            snippet: row.get(4)?,
            score: row.get(5)?,
            apply_url: row.get(6)?,
          },
          row.get::<_, f64>(7)?,
        ))
      })?;

      let mut jobs = Vec::new();
      let mut cached_at: Option<f64> = None;
      for row in rows {
        match row {
          Ok((job, stamp)) => {
            cached_at.get_or_insert(stamp);
            jobs.push(job);
          }
          Err(e) => warn!("Dropping undecodable cached job row: {}", e),
        }
      }

      let cached_at = match cached_at {
        Some(stamp) => stamp,
        None => return Ok(None),
      };

      if now - cached_at > ttl_secs {
        debug!("Cached job snapshot expired, clearing");
        tx.execute("DELETE FROM job_cache", [])?;
        return Ok(None);
      }

      Ok(Some(jobs))
    })
  }

  /// Drop the cached snapshot unconditionally.
  pub fn clear(&self) -> Result<()> {
    self
      .store
      .run_write(|tx| tx.execute("DELETE FROM job_cache", []).map(|_| ()))
  }
}

fn now_secs() -> f64 {
  Utc::now().timestamp() as f64
}

#[cfg(test)]
mod tests {
  use super::*;

  const T0: f64 = 1_700_000_000.0;

  fn test_store() -> RecordStore {
    RecordStore::open_in_memory().unwrap()
  }

  fn job(id: &str) -> JobListing {
    JobListing {
      id: id.to_string(),
      title: format!("Rust Engineer {}", id),
      company: "Acme".to_string(),
      location: Some("Berlin".to_string()),
      snippet: None,
      score: 0.87,
      apply_url: Some(format!("https://jobs.example.com/{}", id)),
    }
  }

  fn sorted_by_id(mut jobs: Vec<JobListing>) -> Vec<JobListing> {
    jobs.sort_by(|a, b| a.id.cmp(&b.id));
    jobs
  }

  #[test]
  fn test_round_trip_preserves_all_fields() {
    let store = test_store();
    let cache = JobCache::new(&store);
    let batch = vec![job("a"), job("b"), job("c")];

    cache.replace(&batch).unwrap();
    let read = cache.get().unwrap().unwrap();

    assert_eq!(sorted_by_id(read), sorted_by_id(batch));
  }

  #[test]
  fn test_optional_fields_pass_through_as_none() {
    let store = test_store();
    let cache = JobCache::new(&store);
    let bare = JobListing {
      id: "bare".to_string(),
      title: "Engineer".to_string(),
      company: "Acme".to_string(),
      location: None,
      snippet: None,
      score: 0.5,
      apply_url: None,
    };

    cache.replace(&[bare.clone()]).unwrap();
    let read = cache.get().unwrap().unwrap();

    assert_eq!(read, vec![bare]);
  }

  #[test]
  fn test_replace_is_idempotent() {
    let store = test_store();
    let cache = JobCache::new(&store);
    let batch = vec![job("a"), job("b")];

    cache.replace(&batch).unwrap();
    cache.replace(&batch).unwrap();
    let read = cache.get().unwrap().unwrap();

    assert_eq!(read.len(), 2);
  }

  #[test]
  fn test_replace_discards_previous_batch() {
    let store = test_store();
    let cache = JobCache::new(&store);

    cache.replace(&[job("old")]).unwrap();
    cache.replace(&[job("new")]).unwrap();
    let read = cache.get().unwrap().unwrap();

    assert_eq!(read.len(), 1);
    assert_eq!(read[0].id, "new");
  }

  #[test]
  fn test_empty_replace_yields_absent() {
    let store = test_store();
    let cache = JobCache::new(&store);

    cache.replace(&[job("a")]).unwrap();
    cache.replace(&[]).unwrap();

    assert_eq!(cache.get().unwrap(), None);
  }

  #[test]
  fn test_get_on_empty_table_is_absent() {
    let store = test_store();
    let cache = JobCache::new(&store);

    assert_eq!(cache.get().unwrap(), None);
  }

  #[test]
  fn test_batch_shares_one_timestamp() {
    let store = test_store();
    let cache = JobCache::new(&store);

    cache.replace(&[job("a"), job("b"), job("c")]).unwrap();

    let distinct: i64 = store
      .run_read(|conn| {
        conn.query_row("SELECT COUNT(DISTINCT timestamp) FROM job_cache", [], |row| {
          row.get(0)
        })
      })
      .unwrap();
    assert_eq!(distinct, 1);
  }

  #[test]
  fn test_fresh_until_ttl_boundary() {
    let store = test_store();
    let cache = JobCache::new(&store);

    cache.replace_at(&[job("a")], T0).unwrap();

    assert!(cache.get_at(T0 + 3599.0).unwrap().is_some());
    assert!(cache.get_at(T0 + 3600.0).unwrap().is_some());
  }

  #[test]
  fn test_expired_read_is_absent_and_stays_absent() {
    let store = test_store();
    let cache = JobCache::new(&store);

    cache.replace_at(&[job("a")], T0).unwrap();

    assert_eq!(cache.get_at(T0 + 3601.0).unwrap(), None);
    // Table was cleared by the first expired read
    assert_eq!(cache.get_at(T0 + 3601.0).unwrap(), None);
  }

  #[test]
  fn test_expired_read_physically_deletes_rows() {
    let store = test_store();
    let cache = JobCache::new(&store);

    cache.replace_at(&[job("a"), job("b")], T0).unwrap();
    assert_eq!(cache.get_at(T0 + 4000.0).unwrap(), None);

    let count: i64 = store
      .run_read(|conn| conn.query_row("SELECT COUNT(*) FROM job_cache", [], |row| row.get(0)))
      .unwrap();
    assert_eq!(count, 0);
  }

  #[test]
  fn test_custom_ttl() {
    let store = test_store();
    let cache = JobCache::new(&store).with_ttl(Duration::seconds(60));

    cache.replace_at(&[job("a")], T0).unwrap();

    assert!(cache.get_at(T0 + 60.0).unwrap().is_some());
    assert_eq!(cache.get_at(T0 + 61.0).unwrap(), None);
  }

  #[test]
  fn test_clear_then_get_is_absent() {
    let store = test_store();
    let cache = JobCache::new(&store);

    cache.replace(&[job("a")]).unwrap();
    cache.clear().unwrap();

    assert_eq!(cache.get().unwrap(), None);
  }

  #[test]
  fn test_undecodable_row_is_dropped() {
    let store = test_store();
    let cache = JobCache::new(&store);

    cache.replace_at(&[job("a")], T0).unwrap();
    // Plant a row whose score cannot be read back as a float
    store
      .run_write(|tx| {
        tx.execute(
          "INSERT INTO job_cache
           (id, title, company, location, snippet, score, apply_url, timestamp)
           VALUES ('bad', 'x', 'y', NULL, NULL, 'not-a-number', NULL, ?1)",
          params![T0],
        )
        .map(|_| ())
      })
      .unwrap();

    let read = cache.get_at(T0 + 1.0).unwrap().unwrap();
    assert_eq!(read.len(), 1);
    assert_eq!(read[0].id, "a");
  }
}
