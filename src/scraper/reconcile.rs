//! Paged reconciliation between the artifact store and the checkpoint store.
//!
//! The two stores are never written transactionally, so they drift: crashes
//! between writes, exhausted retries, and historical imports all leave dates
//! recorded in one store but not the other. These two operations repair that
//! drift. Both are stateless pages over `(offset, limit)`; an external
//! caller drives them to completion and owns the cursor. The artifact store
//! is ground truth in both directions.

use crate::date_range;
use crate::types::{BackfillPage, SessionStatus, SittingDate, SyncPage};
use crate::Result;

use super::HansardScraper;

impl HansardScraper {
    /// One page of absence backfill over the synthetic date range
    ///
    /// Walks `[epoch, today]` and writes a `no_session` checkpoint for every
    /// date with no stored artifact. Driven to completion this writes
    /// exactly `total_dates - artifact_count` checkpoints, and a rerun
    /// reproduces the same end state.
    pub async fn backfill_absence(&self, offset: usize, limit: usize) -> Result<BackfillPage> {
        self.backfill_absence_as_of(SittingDate::today(), offset, limit)
            .await
    }

    /// Absence backfill with an explicit "today" (deterministic variant)
    pub async fn backfill_absence_as_of(
        &self,
        today: SittingDate,
        offset: usize,
        limit: usize,
    ) -> Result<BackfillPage> {
        // Every page must make progress, or the external driver looping
        // until `complete` never terminates
        let limit = limit.max(1);

        let range = date_range::generate(self.config.scrape.epoch, today);
        let total_dates = range.len();

        let page_end = offset.saturating_add(limit).min(total_dates);
        let page = if offset < total_dates {
            &range[offset..page_end]
        } else {
            &[]
        };

        let mut backfilled = 0usize;
        for date in page {
            if self.db.artifact_exists(date).await? {
                continue;
            }
            // Preserve any recorded attempt count; backfill consumed none
            let attempts = match self.db.get_checkpoint(date).await? {
                Some(cp) => cp.attempts,
                None => 0,
            };
            self.db
                .put_checkpoint(date, SessionStatus::NoSession, attempts)
                .await?;
            backfilled += 1;
        }

        let processed = page.len();
        let next_offset = offset + processed;
        let complete = next_offset >= total_dates;

        tracing::info!(
            offset,
            processed,
            backfilled,
            complete,
            "Absence backfill page complete"
        );

        Ok(BackfillPage {
            total_dates,
            processed,
            backfilled_this_batch: backfilled,
            complete,
            next_offset,
        })
    }

    /// One page of presence sync over existing artifact keys
    ///
    /// Every stored artifact gets a `has_session` checkpoint, whatever the
    /// checkpoint store currently claims about that date.
    pub async fn sync_presence(&self, offset: usize, limit: usize) -> Result<SyncPage> {
        // Clamped below by the page-progress requirement, above by the
        // listing page cap
        let limit = limit.clamp(1, self.config.scrape.list_page_size);
        let total_sessions = self.db.count_artifacts().await? as usize;

        let keys = self
            .db
            .list_artifact_dates_page(offset as u32, limit as u32)
            .await?;

        for date in &keys {
            // Attempts are unknowable from the artifact alone; keep whatever
            // the checkpoint already recorded
            let attempts = match self.db.get_checkpoint(date).await? {
                Some(cp) => cp.attempts,
                None => 0,
            };
            self.db
                .put_checkpoint(date, SessionStatus::HasSession, attempts)
                .await?;
        }

        let processed = keys.len();
        let next_offset = offset + processed;
        let complete = next_offset >= total_sessions || processed < limit;

        tracing::info!(
            offset,
            processed,
            total_sessions,
            complete,
            "Presence sync page complete"
        );

        Ok(SyncPage {
            processed,
            total_processed: next_offset,
            total_sessions,
            complete,
            next_offset,
        })
    }
}
