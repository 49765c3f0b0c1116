//! Domain types held by the cache.

use serde::{Deserialize, Serialize};

/// A job listing as shown in the swipe feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
  pub id: String,
  pub title: String,
  pub company: String,
  pub location: Option<String>,
  pub snippet: Option<String>,
  /// Relevance score assigned by the feed ranker
  pub score: f64,
  pub apply_url: Option<String>,
}

/// Direction of a swipe on a job card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
  /// Swipe right - interested
  Like,
  /// Swipe left - not interested
  Dislike,
}

impl SwipeDirection {
  /// Stable string form used in storage and on the wire.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Like => "like",
      Self::Dislike => "dislike",
    }
  }

  /// Parse a stored direction string. Unknown values yield `None`.
  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "like" => Some(Self::Like),
      "dislike" => Some(Self::Dislike),
      _ => None,
    }
  }
}

/// A swipe performed offline, waiting to be delivered to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSwipe {
  pub job_id: String,
  pub direction: SwipeDirection,
}

impl PendingSwipe {
  pub fn new(job_id: impl Into<String>, direction: SwipeDirection) -> Self {
    Self {
      job_id: job_id.into(),
      direction,
    }
  }
}
