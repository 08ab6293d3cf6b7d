//! Configuration types for hansard-dl

use crate::types::SittingDate;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use url::Url;
use utoipa::ToSchema;

/// Scan behavior configuration (date window, eligibility, enqueue sizing)
///
/// Groups settings the producer and reconciliation batches operate on.
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ScrapeConfig {
    /// Earliest sitting date ever considered (default: 01-03-1985, the
    /// oldest transcript the archive holds)
    #[serde(default = "default_epoch")]
    pub epoch: SittingDate,

    /// Trailing window (days) during which a no_session date stays eligible
    /// for re-attempt (default: 7)
    #[serde(default = "default_recheck_window_days")]
    pub recheck_window_days: i64,

    /// Page size used when enumerating the artifact store (default: 1000,
    /// hard-capped at the provider page limit)
    #[serde(default = "default_list_page_size")]
    pub list_page_size: usize,

    /// Lookback window (days) for the incremental scan when no artifacts
    /// exist yet (default: 7)
    #[serde(default = "default_incremental_lookback_days")]
    pub incremental_lookback_days: u64,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            epoch: default_epoch(),
            recheck_window_days: default_recheck_window_days(),
            list_page_size: default_list_page_size(),
            incremental_lookback_days: default_incremental_lookback_days(),
        }
    }
}

/// Upstream transcript source configuration
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SourceConfig {
    /// Base URL of the transcript endpoint; the sitting date key is appended
    /// as the final path segment
    #[serde(default = "default_base_url")]
    #[schema(value_type = String)]
    pub base_url: Url,

    /// Per-request timeout in seconds (default: 30). Timeouts classify as
    /// transient failures.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Upstream rate limit shared across all consumer workers, in requests
    /// per minute (None = unlimited; default: 12)
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: Option<u64>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            requests_per_minute: default_requests_per_minute(),
        }
    }
}

/// Consumer and work-queue configuration
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ConsumerConfig {
    /// Maximum work items leased per batch (default: 10)
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Lease duration in seconds; an unacked item becomes redeliverable once
    /// its lease expires (default: 300)
    #[serde(default = "default_lease_secs")]
    pub lease_secs: i64,

    /// Worker poll interval in milliseconds when the queue is empty
    /// (default: 1000)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Transient-failure retry budget per work item (default: 2). Beyond
    /// this the item is force-resolved to a terminal no_session checkpoint.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Redelivery backoff tuning
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            lease_secs: default_lease_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            max_retries: default_max_retries(),
            retry: RetryConfig::default(),
        }
    }
}

/// Redelivery backoff configuration (exponential, with optional jitter)
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RetryConfig {
    /// Delay before the first redelivery, in seconds (default: 30)
    #[serde(default = "default_initial_delay_secs")]
    pub initial_delay_secs: u64,

    /// Upper bound on any single redelivery delay, in seconds (default: 600)
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: u64,

    /// Multiplier applied per attempt (default: 2.0)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Add random jitter to spread redeliveries (default: true)
    #[serde(default = "default_true")]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay_secs: default_initial_delay_secs(),
            max_delay_secs: default_max_delay_secs(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: true,
        }
    }
}

/// Data storage and state management
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PersistenceConfig {
    /// Path to the SQLite database holding artifacts, checkpoints, and the
    /// work queue (default: "./data/hansard-dl.db")
    #[serde(default = "default_database_path")]
    #[schema(value_type = String)]
    pub database_path: PathBuf,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

/// API server integration configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ServerIntegrationConfig {
    /// REST API settings
    #[serde(default)]
    pub api: ApiConfig,
}

impl Default for ServerIntegrationConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
        }
    }
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Bind address for the API server (default: 127.0.0.1:8870)
    #[serde(default = "default_bind_address")]
    #[schema(value_type = String)]
    pub bind_address: SocketAddr,

    /// Enable CORS middleware (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins ("*" = any; default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Serve interactive Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: true,
        }
    }
}

/// Main configuration for [`crate::HansardScraper`]
///
/// Fields are organized into logical sub-configs:
/// - [`scrape`](ScrapeConfig) — date window, eligibility, pagination
/// - [`source`](SourceConfig) — upstream endpoint, timeout, rate limit
/// - [`consumer`](ConsumerConfig) — batching, leases, retry budget
/// - [`persistence`](PersistenceConfig) — SQLite location
/// - [`server`](ServerIntegrationConfig) — REST API
///
/// Sub-config fields are flattened for a flat JSON/TOML format (no nesting),
/// except `persistence` which keeps its own key.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Scan behavior settings
    #[serde(flatten)]
    pub scrape: ScrapeConfig,

    /// Upstream source settings
    #[serde(flatten)]
    pub source: SourceConfig,

    /// Consumer and queue settings
    #[serde(flatten)]
    pub consumer: ConsumerConfig,

    /// Data storage and state management
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// API server integration
    #[serde(flatten)]
    pub server: ServerIntegrationConfig,
}

impl Config {
    /// Validate cross-field constraints that serde defaults cannot express
    pub fn validate(&self) -> crate::Result<()> {
        if self.scrape.recheck_window_days < 0 {
            return Err(crate::Error::Config {
                message: "recheck_window_days must be non-negative".to_string(),
                key: Some("recheck_window_days".to_string()),
            });
        }
        if self.scrape.list_page_size == 0 {
            return Err(crate::Error::Config {
                message: "list_page_size must be positive".to_string(),
                key: Some("list_page_size".to_string()),
            });
        }
        if self.consumer.batch_size == 0 {
            return Err(crate::Error::Config {
                message: "batch_size must be positive".to_string(),
                key: Some("batch_size".to_string()),
            });
        }
        Ok(())
    }
}

fn default_epoch() -> SittingDate {
    // Oldest transcript in the archive: 1 March 1985
    SittingDate::from_ymd(1985, 3, 1).unwrap_or_else(SittingDate::today)
}

fn default_recheck_window_days() -> i64 {
    7
}

fn default_list_page_size() -> usize {
    1000
}

fn default_incremental_lookback_days() -> u64 {
    7
}

fn default_base_url() -> Url {
    // Placeholder host; deployments must configure the real endpoint
    #[allow(clippy::expect_used)]
    Url::parse("https://hansard-source.example.com/transcripts/")
        .expect("default base URL is valid")
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

fn default_requests_per_minute() -> Option<u64> {
    Some(12)
}

fn default_batch_size() -> usize {
    10
}

fn default_lease_secs() -> i64 {
    300
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_max_retries() -> u32 {
    2
}

fn default_initial_delay_secs() -> u64 {
    30
}

fn default_max_delay_secs() -> u64 {
    600
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_database_path() -> PathBuf {
    PathBuf::from("./data/hansard-dl.db")
}

fn default_bind_address() -> SocketAddr {
    #[allow(clippy::expect_used)]
    "127.0.0.1:8870"
        .parse()
        .expect("default bind address is valid")
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_true() -> bool {
    true
}
