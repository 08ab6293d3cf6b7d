//! Application state for the API server

use crate::{Config, HansardScraper};
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// This struct is cloned for each request (cheap Arc clone) and provides
/// access to the scraper instance and configuration.
#[derive(Clone)]
pub struct AppState {
    /// The main HansardScraper instance
    pub scraper: Arc<HansardScraper>,

    /// Configuration (read access only; nothing is runtime-mutable here)
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(scraper: Arc<HansardScraper>, config: Arc<Config>) -> Self {
        Self { scraper, config }
    }
}
