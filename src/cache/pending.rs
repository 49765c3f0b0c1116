//! Queue of swipe actions awaiting delivery to the server.

use rusqlite::params;
use tracing::warn;

use crate::db::RecordStore;
use crate::error::Result;
use crate::types::{PendingSwipe, SwipeDirection};

/// Ordered, replaceable list of swipes not yet acknowledged by the server.
///
/// `replace` overwrites the whole queue: callers pass the complete desired
/// list every time, and any action omitted from a call is gone. The expected
/// protocol is that the swipe handler accumulates actions while offline and
/// replaces the queue after each change; on reconnect a sync coordinator
/// reads the queue, delivers each action in order, and clears it once all
/// were accepted.
pub struct PendingQueue<'a> {
  store: &'a RecordStore,
}

impl<'a> PendingQueue<'a> {
  pub fn new(store: &'a RecordStore) -> Self {
    Self { store }
  }

  /// Overwrite the queue with `actions`, preserving their order.
  pub fn replace(&self, actions: &[PendingSwipe]) -> Result<()> {
    self.store.run_write(|tx| {
      tx.execute("DELETE FROM pending_swipe", [])?;

      let mut stmt =
        tx.prepare("INSERT INTO pending_swipe (job_id, direction) VALUES (?1, ?2)")?;
      for action in actions {
        stmt.execute(params![action.job_id, action.direction.as_str()])?;
      }

      Ok(())
    })
  }

  /// Read the queue in insertion order.
  ///
  /// A row whose stored direction does not decode to a known value is
  /// dropped from the result; the remaining rows are unaffected.
  pub fn get(&self) -> Result<Vec<PendingSwipe>> {
    self.store.run_read(|conn| {
      let mut stmt = conn.prepare("SELECT job_id, direction FROM pending_swipe ORDER BY id")?;

      let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
      })?;

      let mut actions = Vec::new();
      for row in rows {
        let (job_id, direction) = match row {
          Ok(pair) => pair,
          Err(e) => {
            warn!("Dropping undecodable pending swipe row: {}", e);
            continue;
          }
        };

        match SwipeDirection::parse(&direction) {
          Some(direction) => actions.push(PendingSwipe { job_id, direction }),
          None => warn!("Dropping pending swipe with unknown direction '{}'", direction),
        }
      }

      Ok(actions)
    })
  }

  /// Drop every queued swipe.
  pub fn clear(&self) -> Result<()> {
    self
      .store
      .run_write(|tx| tx.execute("DELETE FROM pending_swipe", []).map(|_| ()))
  }
}
