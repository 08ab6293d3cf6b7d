//! Read-only archive status.

use crate::types::{SittingDate, StatusReport};
use crate::Result;

use super::HansardScraper;

impl HansardScraper {
    /// Summarize the archive: artifact count, latest sitting, configured window
    pub async fn status_report(&self) -> Result<StatusReport> {
        self.status_report_as_of(SittingDate::today()).await
    }

    /// Status report with an explicit "today" (deterministic variant)
    pub async fn status_report_as_of(&self, today: SittingDate) -> Result<StatusReport> {
        let sessions_scraped = self.db.count_artifacts().await? as usize;
        let latest_session = self.latest_artifact_date().await?.map(|d| d.to_string());

        Ok(StatusReport {
            sessions_scraped,
            latest_session,
            scraping_period: format!("{} to {}", self.config.scrape.epoch, today),
        })
    }

    /// Chronologically latest stored sitting date
    ///
    /// Pages through every artifact key and takes the calendar maximum. The
    /// store's own key order is lexical over `DD-MM-YYYY` and therefore
    /// meaningless chronologically ("05-01-2024" sorts before "23-09-1990"),
    /// so no shortcut over the listing order is possible.
    pub async fn latest_artifact_date(&self) -> Result<Option<SittingDate>> {
        let page_size = self.config.scrape.list_page_size;
        let mut latest: Option<SittingDate> = None;
        let mut offset = 0usize;

        loop {
            let page = self
                .db
                .list_artifact_dates_page(offset as u32, page_size as u32)
                .await?;
            if page.is_empty() {
                break;
            }

            for date in &page {
                if latest.is_none_or(|l| *date > l) {
                    latest = Some(*date);
                }
            }

            if page.len() < page_size {
                break;
            }
            offset += page.len();
        }

        Ok(latest)
    }
}
