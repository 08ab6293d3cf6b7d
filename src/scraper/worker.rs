//! Background consumer worker loop.

use std::sync::Arc;
use std::time::Duration;

use super::HansardScraper;

impl HansardScraper {
    /// Spawn the background consumer worker
    ///
    /// The worker drains batches back to back while the queue has visible
    /// work and falls back to polling when it is empty. Several workers may
    /// be started (or several processes pointed at the same database); the
    /// lease compare-and-swap keeps them from colliding and the shared
    /// fetch limiter keeps them under the upstream budget together.
    pub fn start_worker(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let scraper = Arc::clone(self);
        let poll_interval = Duration::from_millis(scraper.config.consumer.poll_interval_ms);

        tokio::spawn(async move {
            tracing::info!("Consumer worker started");

            loop {
                if scraper.shutdown.is_cancelled() {
                    break;
                }

                let idle = match scraper.process_batch().await {
                    Ok(0) => true,
                    Ok(_) => false,
                    Err(e) => {
                        tracing::error!(error = %e, "Batch processing failed");
                        true
                    }
                };

                if idle {
                    tokio::select! {
                        _ = scraper.shutdown.cancelled() => break,
                        _ = tokio::time::sleep(poll_interval) => {}
                    }
                }
            }

            tracing::info!("Consumer worker stopped");
        })
    }
}
