//! Durable work queue: enqueue, lease, ack, redeliver.
//!
//! The queue delivers at least once. A leased item becomes invisible for the
//! lease duration; if the holder crashes before acking, the item surfaces
//! again once the lease expires. Every downstream write is idempotent, so a
//! duplicate delivery re-runs work but never corrupts state.

use crate::error::DatabaseError;
use crate::types::SittingDate;
use crate::{Error, Result};

use super::{Database, WorkItem};

/// Maximum number of items inserted per enqueue statement
pub const ENQUEUE_CHUNK_SIZE: usize = 100;

impl Database {
    /// Enqueue work items for a set of sitting dates
    ///
    /// Inserts in chunks of [`ENQUEUE_CHUNK_SIZE`]. A date already present in
    /// the queue is skipped, so re-running a scan while items are in flight
    /// cannot produce duplicate queue entries. Returns the number of items
    /// actually inserted.
    pub async fn enqueue_work(&self, dates: &[SittingDate]) -> Result<u64> {
        let now = chrono::Utc::now().timestamp();
        let mut inserted = 0u64;

        for chunk in dates.chunks(ENQUEUE_CHUNK_SIZE) {
            let placeholders = vec!["(?, 0, ?, ?)"; chunk.len()].join(", ");
            let sql = format!(
                "INSERT OR IGNORE INTO work_queue (date, attempt, visible_at, enqueued_at) VALUES {}",
                placeholders
            );

            let mut query = sqlx::query(&sql);
            for date in chunk {
                query = query.bind(date).bind(now).bind(now);
            }

            let result = query.execute(&self.pool).await.map_err(|e| {
                Error::Database(DatabaseError::QueryFailed(format!(
                    "Failed to enqueue work: {}",
                    e
                )))
            })?;

            inserted += result.rows_affected();
        }

        Ok(inserted)
    }

    /// Lease a batch of visible work items
    ///
    /// Claims up to `batch_size` items whose visibility time has passed,
    /// oldest first, pushing each claimed item's visibility forward by
    /// `lease_secs`. Claiming is a compare-and-swap on the visibility
    /// timestamp, so two concurrent consumers never lease the same item.
    pub async fn lease_work(&self, batch_size: u32, lease_secs: u64) -> Result<Vec<WorkItem>> {
        let now = chrono::Utc::now().timestamp();

        let candidates: Vec<WorkItem> = sqlx::query_as(
            r#"
            SELECT date, attempt, visible_at, enqueued_at
            FROM work_queue
            WHERE visible_at <= ?
            ORDER BY enqueued_at ASC, date ASC
            LIMIT ?
            "#,
        )
        .bind(now)
        .bind(batch_size as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to query visible work: {}",
                e
            )))
        })?;

        let mut leased = Vec::with_capacity(candidates.len());
        for item in candidates {
            let claimed = sqlx::query(
                r#"
                UPDATE work_queue SET visible_at = ?
                WHERE date = ? AND visible_at = ?
                "#,
            )
            .bind(now + lease_secs as i64)
            .bind(&item.date)
            .bind(item.visible_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                Error::Database(DatabaseError::QueryFailed(format!(
                    "Failed to lease work item: {}",
                    e
                )))
            })?;

            // Lost the race to another consumer; skip
            if claimed.rows_affected() == 1 {
                leased.push(item);
            }
        }

        Ok(leased)
    }

    /// Acknowledge a work item, removing it from the queue
    ///
    /// Acking an already-acked item is a no-op.
    pub async fn ack_work(&self, date: &SittingDate) -> Result<()> {
        self.ack_work_raw(&date.to_string()).await
    }

    /// Acknowledge a work item by raw key
    ///
    /// Exists so a row whose key no longer parses as a date can still be
    /// removed from the queue.
    pub async fn ack_work_raw(&self, date_key: &str) -> Result<()> {
        sqlx::query("DELETE FROM work_queue WHERE date = ?")
            .bind(date_key)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                Error::Database(DatabaseError::QueryFailed(format!(
                    "Failed to ack work item: {}",
                    e
                )))
            })?;

        Ok(())
    }

    /// Schedule a failed item for redelivery
    ///
    /// Increments the delivery attempt counter and makes the item visible
    /// again after `delay_secs`.
    pub async fn redeliver_work(&self, date: &SittingDate, delay_secs: u64) -> Result<()> {
        let now = chrono::Utc::now().timestamp();

        sqlx::query(
            r#"
            UPDATE work_queue SET attempt = attempt + 1, visible_at = ?
            WHERE date = ?
            "#,
        )
        .bind(now + delay_secs as i64)
        .bind(date)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to schedule redelivery: {}",
                e
            )))
        })?;

        Ok(())
    }

    /// Count items currently in the queue (leased or visible)
    pub async fn pending_work_count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM work_queue")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                Error::Database(DatabaseError::QueryFailed(format!(
                    "Failed to count pending work: {}",
                    e
                )))
            })?;

        Ok(count as u64)
    }
}
