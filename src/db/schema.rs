//! SQLite schema for the cache database.

/// Schema for the cache tables.
pub const SCHEMA: &str = r#"
-- Last fetched feed snapshot; every row of a batch shares one timestamp
CREATE TABLE IF NOT EXISTS job_cache (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    company TEXT NOT NULL,
    location TEXT,
    snippet TEXT,
    score REAL NOT NULL,
    apply_url TEXT,
    timestamp REAL NOT NULL
);

-- Swipes awaiting delivery; the row id preserves insertion order
CREATE TABLE IF NOT EXISTS pending_swipe (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    job_id TEXT NOT NULL,
    direction TEXT NOT NULL
);
"#;
