//! Database layer for hansard-dl
//!
//! Handles SQLite persistence for the artifact store, the checkpoint store,
//! and the durable work queue. The artifact table and the checkpoint table
//! are deliberately independent: no write touches both, no query joins them,
//! and reconciliation repairs drift between them after the fact.
//!
//! ## Submodules
//!
//! Methods on [`Database`] are organized by domain:
//! - [`migrations`] — Database lifecycle, schema migrations
//! - [`artifacts`] — Transcript artifact storage and key listing
//! - [`checkpoints`] — Per-date scrape checkpoint records
//! - [`queue`] — Durable work queue (enqueue, lease, ack, redeliver)

use sqlx::{FromRow, sqlite::SqlitePool};

mod artifacts;
mod checkpoints;
mod migrations;
mod queue;

pub use artifacts::LIST_PAGE_MAX;
pub use queue::ENQUEUE_CHUNK_SIZE;

/// Artifact record from database
#[derive(Debug, Clone, FromRow)]
pub struct ArtifactRecord {
    /// Sitting date key in DD-MM-YYYY form
    pub date: String,
    /// Raw transcript payload as fetched from the source (JSON text)
    pub payload: String,
    /// Unix timestamp when the payload was stored
    pub fetched_at: i64,
}

/// Checkpoint record from database
#[derive(Debug, Clone, FromRow)]
pub struct CheckpointRecord {
    /// Sitting date key in DD-MM-YYYY form
    pub date: String,
    /// Outcome of the last completed check (0=no_session, 1=has_session)
    pub status: i32,
    /// Unix timestamp of the last completed check
    pub last_checked_at: i64,
    /// Number of fetch attempts consumed when this checkpoint was written
    pub attempts: i32,
}

/// Work queue item from database
#[derive(Debug, Clone, FromRow)]
pub struct WorkItem {
    /// Sitting date key in DD-MM-YYYY form
    pub date: String,
    /// Delivery attempts consumed so far (0 on first lease)
    pub attempt: i32,
    /// Unix timestamp before which this item is invisible to consumers
    pub visible_at: i64,
    /// Unix timestamp when the item was first enqueued
    pub enqueued_at: i64,
}

/// Database handle for hansard-dl
pub struct Database {
    pool: SqlitePool,
}
