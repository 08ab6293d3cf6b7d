//! Transcript artifact storage: the durable source of truth for what has
//! actually been scraped.

use crate::error::DatabaseError;
use crate::types::SittingDate;
use crate::{Error, Result};

use super::{ArtifactRecord, Database};

/// Hard cap on a single key-listing page
pub const LIST_PAGE_MAX: u32 = 1000;

impl Database {
    /// Check whether an artifact exists for a sitting date
    ///
    /// An existing artifact means the date's transcript has been durably
    /// stored and the date never needs fetching again.
    pub async fn artifact_exists(&self, date: &SittingDate) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM artifacts WHERE date = ?
            "#,
        )
        .bind(date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to check artifact existence: {}",
                e
            )))
        })?;

        Ok(count > 0)
    }

    /// Store a transcript artifact
    ///
    /// Idempotent upsert keyed by date. Writing the same date twice replaces
    /// the payload, so a duplicate queue delivery converges on the same final
    /// state.
    pub async fn put_artifact(&self, date: &SittingDate, payload: &str) -> Result<()> {
        let now = chrono::Utc::now().timestamp();

        sqlx::query(
            r#"
            INSERT INTO artifacts (date, payload, fetched_at)
            VALUES (?, ?, ?)
            ON CONFLICT(date) DO UPDATE SET payload = excluded.payload, fetched_at = excluded.fetched_at
            "#,
        )
        .bind(date)
        .bind(payload)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to store artifact: {}",
                e
            )))
        })?;

        Ok(())
    }

    /// Fetch a stored artifact by date
    pub async fn get_artifact(&self, date: &SittingDate) -> Result<Option<ArtifactRecord>> {
        sqlx::query_as::<_, ArtifactRecord>(
            r#"
            SELECT date, payload, fetched_at FROM artifacts WHERE date = ?
            "#,
        )
        .bind(date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to fetch artifact: {}",
                e
            )))
        })
    }

    /// List one page of artifact date keys
    ///
    /// Pages by offset in the store's native (lexical) key order. The page
    /// size is clamped to [`LIST_PAGE_MAX`]; callers that need the full key
    /// set must page until a short page comes back.
    pub async fn list_artifact_dates_page(
        &self,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<SittingDate>> {
        let limit = limit.min(LIST_PAGE_MAX);

        let rows: Vec<SittingDate> = sqlx::query_scalar(
            r#"
            SELECT date FROM artifacts ORDER BY date LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to list artifact dates: {}",
                e
            )))
        })?;

        Ok(rows)
    }

    /// Count stored artifacts
    pub async fn count_artifacts(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM artifacts")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                Error::Database(DatabaseError::QueryFailed(format!(
                    "Failed to count artifacts: {}",
                    e
                )))
            })?;

        Ok(count as u64)
    }
}
