//! Shared fixtures for pipeline tests.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use tempfile::TempDir;

use crate::config::Config;
use crate::source::{FetchOutcome, SourceClient};
use crate::{Error, Result};

use super::HansardScraper;

/// One scripted answer for a fetch
#[derive(Debug, Clone)]
pub(crate) enum Scripted {
    Session(serde_json::Value),
    NoSitting,
    Fail(u16),
}

/// Source client driven by a per-date script
///
/// Each fetch for a date consumes the next scripted outcome; the last
/// outcome repeats once the script is exhausted. Unscripted dates answer
/// NoSitting. Every call is recorded for assertion.
pub(crate) struct ScriptedSource {
    scripts: Mutex<HashMap<String, Vec<Scripted>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedSource {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            scripts: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn script(&self, date_key: &str, outcomes: Vec<Scripted>) {
        self.scripts
            .lock()
            .unwrap()
            .insert(date_key.to_string(), outcomes);
    }

    /// Shorthand: the date always answers with a session payload
    pub(crate) fn session(&self, date_key: &str) {
        self.script(
            date_key,
            vec![Scripted::Session(serde_json::json!({ "sitting": date_key }))],
        );
    }

    /// Shorthand: the date always fails with an upstream 500
    pub(crate) fn always_fail(&self, date_key: &str) {
        self.script(date_key, vec![Scripted::Fail(500)]);
    }

    /// Total recorded fetches
    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Recorded fetches for one date
    pub(crate) fn calls_for(&self, date_key: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|k| k.as_str() == date_key)
            .count()
    }
}

#[async_trait]
impl SourceClient for ScriptedSource {
    async fn fetch_date(&self, date_key: &str) -> Result<FetchOutcome> {
        self.calls.lock().unwrap().push(date_key.to_string());

        let next = {
            let mut scripts = self.scripts.lock().unwrap();
            match scripts.get_mut(date_key) {
                Some(outcomes) if outcomes.len() > 1 => outcomes.remove(0),
                Some(outcomes) => outcomes
                    .first()
                    .cloned()
                    .unwrap_or(Scripted::NoSitting),
                None => Scripted::NoSitting,
            }
        };

        match next {
            Scripted::Session(payload) => Ok(FetchOutcome::Session(payload)),
            Scripted::NoSitting => Ok(FetchOutcome::NoSitting),
            Scripted::Fail(status) => Err(Error::UnexpectedStatus { status }),
        }
    }
}

/// Config tuned for tests: temp database, no rate limit, instant redelivery
pub(crate) fn test_config(temp_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.persistence.database_path = temp_dir.path().join("test.db");
    config.source.requests_per_minute = None;
    config.consumer.retry.initial_delay_secs = 0;
    config.consumer.retry.jitter = false;
    config
}

/// Build a scraper over a temp database and a fresh scripted source
pub(crate) async fn create_test_scraper() -> (Arc<HansardScraper>, Arc<ScriptedSource>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir);
    create_test_scraper_with(config, temp_dir).await
}

/// Build a scraper with a caller-tuned config
pub(crate) async fn create_test_scraper_with(
    config: Config,
    temp_dir: TempDir,
) -> (Arc<HansardScraper>, Arc<ScriptedSource>, TempDir) {
    let source = ScriptedSource::new();
    let scraper = HansardScraper::with_source(config, source.clone())
        .await
        .unwrap();
    (Arc::new(scraper), source, temp_dir)
}
