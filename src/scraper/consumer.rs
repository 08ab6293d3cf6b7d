//! Consumer: lease queued dates, fetch them, settle both stores.
//!
//! Delivery is at least once, so every store write here is an idempotent
//! upsert and every item starts with a defensive existence re-check. The
//! invariant is that no item is acked with both stores untouched: each exit
//! path writes a checkpoint (and possibly an artifact) first.

use crate::db::WorkItem;
use crate::retry::redelivery_delay;
use crate::source::FetchOutcome;
use crate::types::{SessionStatus, SittingDate};
use crate::{Error, Result};

use super::HansardScraper;

impl HansardScraper {
    /// Lease and process one batch of work items
    ///
    /// Items are processed sequentially; the shared fetch limiter paces the
    /// upstream calls. Per-item failures are settled against the item's
    /// retry budget and never fail the batch. Returns the number of items
    /// leased.
    pub async fn process_batch(&self) -> Result<usize> {
        let items = self
            .db
            .lease_work(
                self.config.consumer.batch_size as u32,
                self.config.consumer.lease_secs.max(0) as u64,
            )
            .await?;
        let leased = items.len();

        for item in items {
            if self.shutdown.is_cancelled() {
                // Remaining items stay leased; their leases expire and they
                // come back on the next start
                tracing::info!("Shutdown during batch; leaving remaining items leased");
                break;
            }
            self.process_item(&item).await?;
        }

        Ok(leased)
    }

    /// Process one leased work item through to ack or redelivery
    ///
    /// Only infrastructure errors around the lease bookkeeping itself
    /// propagate; fetch and store failures are consumed by the retry budget.
    async fn process_item(&self, item: &WorkItem) -> Result<()> {
        let Ok(date) = item.date.parse::<SittingDate>() else {
            // A queue row that can never parse can never succeed; drop it
            tracing::error!(date = %item.date, "Unparseable date key in work queue, discarding");
            self.db.ack_work_raw(&item.date).await?;
            return Ok(());
        };

        // Defensive re-check: a duplicate delivery may already be settled
        if self.db.artifact_exists(&date).await? {
            tracing::debug!(date = %date, "Artifact already stored, acking duplicate delivery");
            self.db.ack_work(&date).await?;
            return Ok(());
        }

        self.fetch_limiter.acquire().await;

        let attempts = item.attempt + 1;
        match self.fetch_and_settle(&date, attempts).await {
            Ok(status) => {
                tracing::debug!(date = %date, status = %status, "Work item settled");
                self.db.ack_work(&date).await?;
            }
            Err(e) if !e.counts_against_retry_budget() => {
                // Shutdown mid-fetch: leave the item leased for redelivery
                tracing::info!(date = %date, "Fetch abandoned, item will be redelivered");
            }
            Err(e) => {
                self.settle_failure(&date, item, &e).await?;
            }
        }

        Ok(())
    }

    /// Fetch one date and write the stores for its outcome
    async fn fetch_and_settle(&self, date: &SittingDate, attempts: i32) -> Result<SessionStatus> {
        let outcome = self.source.fetch_date(&date.to_string()).await?;

        let status = match outcome {
            FetchOutcome::Session(payload) => {
                // Artifact first: if the checkpoint write then fails, the
                // next delivery's re-check acks without re-fetching
                let body = serde_json::to_string(&payload)?;
                self.db.put_artifact(date, &body).await?;
                SessionStatus::HasSession
            }
            FetchOutcome::NoSitting => SessionStatus::NoSession,
        };

        self.db.put_checkpoint(date, status, attempts).await?;
        Ok(status)
    }

    /// Route a transient failure to redelivery or retire it as exhausted
    async fn settle_failure(&self, date: &SittingDate, item: &WorkItem, error: &Error) -> Result<()> {
        let max_retries = self.config.consumer.max_retries;

        if (item.attempt as u32) < max_retries {
            let delay = redelivery_delay(&self.config.consumer.retry, item.attempt as u32);
            tracing::warn!(
                date = %date,
                attempt = item.attempt + 1,
                delay_secs = delay.as_secs(),
                error = %error,
                "Fetch failed, scheduling redelivery"
            );
            self.db.redeliver_work(date, delay.as_secs()).await?;
        } else {
            // Out of budget. Force-resolve as no_session so the date stays
            // re-checkable inside the recheck window, and make the forced
            // resolution unmistakable in the logs
            let attempts = item.attempt + 1;
            tracing::error!(
                date = %date,
                attempts,
                exhausted = true,
                error = %error,
                "Retry budget exhausted, force-resolving as no_session"
            );
            self.db
                .put_checkpoint(date, SessionStatus::NoSession, attempts)
                .await?;
            self.db.ack_work(date).await?;
        }

        Ok(())
    }
}
