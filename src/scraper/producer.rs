//! Producer scans: decide which sitting dates need fetching and enqueue them.
//!
//! Scans only read the stores and push queue items; they never fetch. The
//! artifact store is the source of truth: an existing artifact always wins
//! over whatever the checkpoint for that date claims.

use std::collections::HashSet;

use crate::date_range;
use crate::types::{IncrementalSummary, ScanSummary, SessionStatus, SittingDate};
use crate::Result;

use super::HansardScraper;

/// Whether a checkpoint's last check happened on a calendar day before `today`
///
/// A `no_session` date inside the recheck window is retried at most once per
/// day; without this, a scan immediately after a consumer pass would re-queue
/// every recent no-sitting day it just settled.
fn checked_before(last_checked_at: i64, today: SittingDate) -> bool {
    chrono::DateTime::from_timestamp(last_checked_at, 0)
        .map(|ts| ts.date_naive() < today.date())
        .unwrap_or(true)
}

/// How a scan classified one sitting date
enum Eligibility {
    /// Artifact exists; nothing to do, ever
    InArtifactStore,
    /// Checkpoint says the date is settled (has_session, or no_session old
    /// enough that a sitting can no longer appear)
    CheckpointSkipped,
    /// no_session checkpoint still inside the recheck window; try again
    CheckpointRecheck,
    /// No record of this date anywhere
    NewlyEligible,
}

impl HansardScraper {
    /// Scan the full configured window and enqueue every eligible date
    ///
    /// Considers every calendar day from the epoch through today inclusive.
    /// Idempotent: a rerun while items are in flight re-classifies but the
    /// queue deduplicates, so no date is ever queued twice.
    pub async fn full_scan(&self) -> Result<ScanSummary> {
        self.full_scan_as_of(SittingDate::today()).await
    }

    /// Full scan with an explicit "today" (deterministic variant)
    pub async fn full_scan_as_of(&self, today: SittingDate) -> Result<ScanSummary> {
        self.ensure_accepting_work()?;

        let range = date_range::generate(self.config.scrape.epoch, today);
        let mut summary = ScanSummary {
            total_dates: range.len(),
            in_artifact_store: 0,
            checkpoint_skipped: 0,
            checkpoint_recheck: 0,
            enqueued: 0,
        };

        // One paged enumeration of the artifact store up front beats a point
        // query per date across a multi-decade range
        let stored = self.artifact_date_set().await?;

        let mut eligible = Vec::new();
        for date in &range {
            match self.classify_date(date, today, stored.contains(date)).await? {
                Eligibility::InArtifactStore => summary.in_artifact_store += 1,
                Eligibility::CheckpointSkipped => summary.checkpoint_skipped += 1,
                Eligibility::CheckpointRecheck => {
                    summary.checkpoint_recheck += 1;
                    eligible.push(*date);
                }
                Eligibility::NewlyEligible => {
                    eligible.push(*date);
                }
            }
        }

        summary.enqueued = eligible.len();
        // A part-way enqueue failure is not rolled back: rerunning the scan
        // is always safe, so report the classification rather than erroring
        if let Err(e) = self.db.enqueue_work(&eligible).await {
            tracing::error!(error = %e, "Enqueue failed part-way, rerun the scan to finish");
        }

        tracing::info!(
            total = summary.total_dates,
            in_store = summary.in_artifact_store,
            skipped = summary.checkpoint_skipped,
            recheck = summary.checkpoint_recheck,
            enqueued = summary.enqueued,
            "Full scan complete"
        );

        Ok(summary)
    }

    /// Catch-up scan from the latest stored sitting through today
    ///
    /// Starts at the chronologically latest artifact date (not the lexically
    /// greatest key). With an empty archive it falls back to a short lookback
    /// window rather than the whole epoch.
    pub async fn incremental_scan(&self) -> Result<IncrementalSummary> {
        self.incremental_scan_as_of(SittingDate::today()).await
    }

    /// Incremental scan with an explicit "today" (deterministic variant)
    pub async fn incremental_scan_as_of(&self, today: SittingDate) -> Result<IncrementalSummary> {
        self.ensure_accepting_work()?;

        let start = match self.latest_artifact_date().await? {
            // The latest artifact itself is settled; start the day after
            Some(latest) => latest.succ().unwrap_or(today),
            None => today
                .minus_days(self.config.scrape.incremental_lookback_days)
                .unwrap_or(self.config.scrape.epoch),
        };
        // Never scan before the configured epoch
        let start = start.max(self.config.scrape.epoch);

        let range = date_range::generate(start, today);
        let mut eligible = Vec::new();
        for date in &range {
            // The window here is days, not decades; point queries are fine
            let stored = self.db.artifact_exists(date).await?;
            match self.classify_date(date, today, stored).await? {
                Eligibility::CheckpointRecheck | Eligibility::NewlyEligible => {
                    eligible.push(*date);
                }
                Eligibility::InArtifactStore | Eligibility::CheckpointSkipped => {}
            }
        }

        let summary = IncrementalSummary {
            date_range: format!("{} to {}", start, today),
            enqueued: eligible.len(),
        };
        if let Err(e) = self.db.enqueue_work(&eligible).await {
            tracing::error!(error = %e, "Enqueue failed part-way, rerun the scan to finish");
        }

        tracing::info!(
            range = %summary.date_range,
            enqueued = summary.enqueued,
            "Incremental scan complete"
        );

        Ok(summary)
    }

    /// Every artifact key currently in the store, paged into a set
    async fn artifact_date_set(&self) -> Result<HashSet<SittingDate>> {
        let page_size = self.config.scrape.list_page_size;
        let mut dates = HashSet::new();
        let mut offset = 0usize;

        loop {
            let page = self
                .db
                .list_artifact_dates_page(offset as u32, page_size as u32)
                .await?;
            let fetched = page.len();
            dates.extend(page);

            if fetched < page_size {
                break;
            }
            offset += fetched;
        }

        Ok(dates)
    }

    /// Classify one date against both stores
    async fn classify_date(
        &self,
        date: &SittingDate,
        today: SittingDate,
        in_artifact_store: bool,
    ) -> Result<Eligibility> {
        if in_artifact_store {
            return Ok(Eligibility::InArtifactStore);
        }

        let Some(checkpoint) = self.db.get_checkpoint(date).await? else {
            return Ok(Eligibility::NewlyEligible);
        };

        match SessionStatus::from_i32(checkpoint.status) {
            // has_session is terminal even without an artifact; presence
            // drift is reconciliation's job, not the producer's
            SessionStatus::HasSession => Ok(Eligibility::CheckpointSkipped),
            SessionStatus::NoSession => {
                let age_days = date.days_until(today);
                if age_days <= self.config.scrape.recheck_window_days
                    && checked_before(checkpoint.last_checked_at, today)
                {
                    Ok(Eligibility::CheckpointRecheck)
                } else {
                    Ok(Eligibility::CheckpointSkipped)
                }
            }
        }
    }
}
