//! # hansard-dl
//!
//! Backend library for building and maintaining an archive of parliamentary
//! sitting-date transcripts.
//!
//! ## Design Philosophy
//!
//! hansard-dl is designed to be:
//! - **Resumable** - every scan and fetch is idempotent; kill it anywhere and
//!   the next run converges to the same archive
//! - **Durable** - pending work lives in a SQLite-backed queue with leases,
//!   acks, and redelivery, so a crash never loses an accepted date
//! - **Polite** - all fetches share one rate limiter, so adding workers never
//!   multiplies upstream load
//! - **Library-first** - no CLI or UI, purely a Rust crate for embedding; a
//!   REST API is included for driving it from cron hooks or an operator
//!
//! ## Quick Start
//!
//! ```no_run
//! use hansard_dl::{Config, HansardScraper};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let scraper = Arc::new(HansardScraper::new(config.clone()).await?);
//!
//!     // Background consumer drains the work queue
//!     let worker = scraper.start_worker();
//!
//!     // Enqueue every eligible sitting date since the epoch
//!     let summary = scraper.full_scan().await?;
//!     println!("enqueued {} dates", summary.enqueued);
//!
//!     // Serve the REST API until the process stops
//!     hansard_dl::api::start_api_server(scraper.clone(), Arc::new(config)).await?;
//!
//!     scraper.shutdown();
//!     worker.await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Configuration types
pub mod config;
/// Inclusive date-range enumeration
pub mod date_range;
/// Database persistence layer (artifacts, checkpoints, work queue)
pub mod db;
/// Error types
pub mod error;
/// Shared fetch rate limiting
pub mod rate_limiter;
/// Redelivery backoff computation
pub mod retry;
/// Core scrape pipeline (decomposed into focused submodules)
pub mod scraper;
/// Upstream transcript source client
pub mod source;
/// Core types: sitting dates, session status, operation summaries
pub mod types;

// Re-export commonly used types
pub use config::{ApiConfig, Config, ConsumerConfig, RetryConfig, ScrapeConfig, SourceConfig};
pub use db::Database;
pub use error::{ApiError, DatabaseError, Error, ErrorDetail, Result, ToHttpStatus};
pub use rate_limiter::FetchLimiter;
pub use scraper::HansardScraper;
pub use source::{FetchOutcome, HttpSourceClient, SourceClient};
pub use types::{
    BackfillPage, IncrementalSummary, ScanSummary, SessionStatus, SittingDate, StatusReport,
    SyncPage,
};

/// Helper function to run the scraper with graceful signal handling.
///
/// Waits for a termination signal and then calls the scraper's `shutdown()`
/// method. In-flight fetches finish; their leases expire and the dates are
/// redelivered on the next start.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// # Example
///
/// ```no_run
/// use hansard_dl::{Config, HansardScraper, run_with_shutdown};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = Config::default();
///     let scraper = Arc::new(HansardScraper::new(config).await?);
///     let worker = scraper.start_worker();
///
///     // Run with automatic signal handling
///     run_with_shutdown(&scraper).await?;
///
///     worker.await?;
///     Ok(())
/// }
/// ```
pub async fn run_with_shutdown(scraper: &HansardScraper) -> Result<()> {
    wait_for_signal().await;
    scraper.shutdown();
    Ok(())
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Set up signal handlers - these may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
