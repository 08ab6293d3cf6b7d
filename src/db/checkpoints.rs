//! Per-date scrape checkpoints: the advisory record of the last completed
//! check for each sitting date.

use crate::error::DatabaseError;
use crate::types::{SessionStatus, SittingDate};
use crate::{Error, Result};

use super::{CheckpointRecord, Database};

impl Database {
    /// Fetch the checkpoint for a sitting date, if one exists
    pub async fn get_checkpoint(&self, date: &SittingDate) -> Result<Option<CheckpointRecord>> {
        sqlx::query_as::<_, CheckpointRecord>(
            r#"
            SELECT date, status, last_checked_at, attempts
            FROM checkpoints WHERE date = ?
            "#,
        )
        .bind(date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to fetch checkpoint: {}",
                e
            )))
        })
    }

    /// Record the outcome of a completed check
    ///
    /// Idempotent upsert keyed by date. A later write for the same date
    /// simply refreshes the status and timestamp, so duplicate deliveries
    /// converge.
    pub async fn put_checkpoint(
        &self,
        date: &SittingDate,
        status: SessionStatus,
        attempts: i32,
    ) -> Result<()> {
        let now = chrono::Utc::now().timestamp();

        sqlx::query(
            r#"
            INSERT INTO checkpoints (date, status, last_checked_at, attempts)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(date) DO UPDATE SET
                status = excluded.status,
                last_checked_at = excluded.last_checked_at,
                attempts = excluded.attempts
            "#,
        )
        .bind(date)
        .bind(status.to_i32())
        .bind(now)
        .bind(attempts)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to store checkpoint: {}",
                e
            )))
        })?;

        Ok(())
    }

    /// Count checkpoints recorded as having a session
    pub async fn count_has_session_checkpoints(&self) -> Result<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM checkpoints WHERE status = ?")
                .bind(SessionStatus::HasSession.to_i32())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    Error::Database(DatabaseError::QueryFailed(format!(
                        "Failed to count checkpoints: {}",
                        e
                    )))
                })?;

        Ok(count as u64)
    }
}
