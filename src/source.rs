//! Transcript source client
//!
//! The upstream publishes at most one transcript per sitting date, addressed
//! by the `DD-MM-YYYY` date key. A 404 is not an error here: for a source
//! indexed by calendar day, "nothing at this key" is the normal answer for
//! every weekend, recess, and holiday, so it maps to a confirmed-absence
//! outcome rather than a failure.

use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

use crate::config::SourceConfig;
use crate::{Error, Result};

/// Outcome of fetching one sitting date from the source
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The date had a sitting; the payload is the transcript document
    Session(serde_json::Value),
    /// The source has nothing for this date (no sitting occurred)
    NoSitting,
}

/// Client for the upstream transcript source
///
/// The trait seam exists so the scrape pipeline can be driven by a scripted
/// source in tests; production uses [`HttpSourceClient`].
#[async_trait]
pub trait SourceClient: Send + Sync {
    /// Fetch the transcript for one sitting date
    ///
    /// Returns [`FetchOutcome::NoSitting`] for a confirmed absence. Transport
    /// failures, unexpected statuses, and unparseable payloads are errors and
    /// say nothing about whether a sitting occurred.
    async fn fetch_date(&self, date_key: &str) -> Result<FetchOutcome>;
}

/// HTTP implementation of [`SourceClient`] over reqwest
pub struct HttpSourceClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpSourceClient {
    /// Create a new HTTP source client from the source configuration
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.fetch_timeout_secs))
            .build()
            .map_err(Error::Network)?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    fn url_for(&self, date_key: &str) -> Result<Url> {
        self.base_url.join(date_key).map_err(|e| Error::Config {
            message: format!("Invalid source URL for date '{}': {}", date_key, e),
            key: Some("source.base_url".to_string()),
        })
    }
}

#[async_trait]
impl SourceClient for HttpSourceClient {
    async fn fetch_date(&self, date_key: &str) -> Result<FetchOutcome> {
        let url = self.url_for(date_key)?;

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                tracing::warn!(date = date_key, "Source fetch timed out");
            }
            Error::Network(e)
        })?;

        match response.status() {
            StatusCode::OK => {
                let payload: serde_json::Value = response.json().await.map_err(|e| {
                    Error::MalformedPayload(format!(
                        "Source returned unparseable JSON for '{}': {}",
                        date_key, e
                    ))
                })?;
                Ok(FetchOutcome::Session(payload))
            }
            StatusCode::NOT_FOUND => Ok(FetchOutcome::NoSitting),
            status => Err(Error::UnexpectedStatus {
                status: status.as_u16(),
            }),
        }
    }
}
