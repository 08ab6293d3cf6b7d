//! Core scrape pipeline (decomposed into focused submodules)
//!
//! [`HansardScraper`] owns the database, the source client, and the shared
//! fetch limiter. Methods are organized by pipeline stage:
//! - [`producer`] — full and incremental scans that feed the work queue
//! - [`consumer`] — leases queued dates, fetches them, writes both stores
//! - [`worker`] — background consumer loop with graceful shutdown
//! - [`reconcile`] — paged repair of drift between the two stores
//! - [`status`] — read-only archive summary

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::db::Database;
use crate::rate_limiter::FetchLimiter;
use crate::source::{HttpSourceClient, SourceClient};
use crate::{Error, Result};

mod consumer;
mod producer;
mod reconcile;
mod status;
mod worker;

/// The scrape pipeline: producer, durable queue, consumer, reconciliation
///
/// Cheap to share; hold it in an `Arc` and hand clones of that to the API
/// layer and background tasks.
pub struct HansardScraper {
    /// Database instance for persistence (wrapped in Arc for sharing across tasks)
    /// Public for integration tests to query store state
    pub db: Arc<Database>,
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    /// Upstream source client (trait object so tests can script outcomes)
    pub(crate) source: Arc<dyn SourceClient>,
    /// Fetch pacer shared across all consumer workers
    pub(crate) fetch_limiter: FetchLimiter,
    /// Cancellation token for graceful worker shutdown
    pub(crate) shutdown: CancellationToken,
}

impl HansardScraper {
    /// Create a new scraper backed by the HTTP source client
    ///
    /// Validates the configuration, opens (and migrates) the database, and
    /// builds the shared fetch limiter. No background work starts until
    /// [`HansardScraper::start_worker`](worker) is called.
    pub async fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let source = Arc::new(HttpSourceClient::new(&config.source)?);
        Self::with_source(config, source).await
    }

    /// Create a new scraper with a custom source client
    ///
    /// This is the seam the test suite uses to drive the pipeline with
    /// scripted fetch outcomes.
    pub async fn with_source(config: Config, source: Arc<dyn SourceClient>) -> Result<Self> {
        config.validate()?;

        let db = Database::new(&config.persistence.database_path).await?;
        let fetch_limiter = FetchLimiter::new(config.source.requests_per_minute);

        tracing::info!(
            epoch = %config.scrape.epoch,
            max_retries = config.consumer.max_retries,
            "Scraper initialized"
        );

        Ok(Self {
            db: Arc::new(db),
            config: Arc::new(config),
            source,
            fetch_limiter,
            shutdown: CancellationToken::new(),
        })
    }

    /// Signal shutdown to all background workers
    ///
    /// In-flight work items finish their current fetch and are left leased;
    /// their leases expire and they are redelivered on the next start.
    pub fn shutdown(&self) {
        tracing::info!("Shutdown requested");
        self.shutdown.cancel();
    }

    /// Whether shutdown has been requested
    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    pub(crate) fn ensure_accepting_work(&self) -> Result<()> {
        if self.shutdown.is_cancelled() {
            return Err(Error::ShuttingDown);
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_helpers;
