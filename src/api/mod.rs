//! REST API server module
//!
//! Exposes the scrape pipeline's entry points over HTTP. Every endpoint is a
//! GET whose handler is safe to re-invoke: scans and reconciliation pages are
//! idempotent by construction, so an operator (or a cron hook) can call these
//! blindly.

use crate::{Config, HansardScraper, Result};
use axum::{Router, http::HeaderValue, routing::get};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod error_response;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::AppState;

/// Create the API router with all route definitions
///
/// # Routes
///
/// ## Scans
/// - `GET /start` - Full-range scan, enqueue every eligible date
/// - `GET /check-today` - Incremental catch-up scan
///
/// ## Reconciliation
/// - `GET /backfill-kv` - One page of absence backfill (`offset`, `limit`)
/// - `GET /sync-r2-batch` - One page of presence sync (`offset`, `limit`)
///
/// ## System
/// - `GET /status` - Archive summary
/// - `GET /health` - Health check
/// - `GET /openapi.json` - OpenAPI specification
/// - `GET /swagger-ui` - Interactive Swagger UI documentation (if enabled)
pub fn create_router(scraper: Arc<HansardScraper>, config: Arc<Config>) -> Router {
    let state = AppState::new(scraper, config.clone());

    let router = Router::new()
        // Scans
        .route("/start", get(routes::start_full_scan))
        .route("/check-today", get(routes::check_today))
        // Reconciliation
        .route("/backfill-kv", get(routes::backfill_checkpoints))
        .route("/sync-r2-batch", get(routes::sync_artifacts))
        // System
        .route("/status", get(routes::status))
        .route("/health", get(routes::health_check));

    // Merge Swagger UI routes if enabled in config (before applying state).
    // SwaggerUi registers its own GET /openapi.json, so the explicit handler
    // is only added when Swagger UI is disabled to avoid a route conflict.
    let router = if config.server.api.swagger_ui {
        router.merge(SwaggerUi::new("/swagger-ui").url("/openapi.json", ApiDoc::openapi()))
    } else {
        router.route("/openapi.json", get(routes::openapi_spec))
    };

    let router = router.with_state(state);

    // Apply CORS middleware if enabled in config
    if config.server.api.cors_enabled {
        let cors = build_cors_layer(&config.server.api.cors_origins);
        router.layer(cors)
    } else {
        router
    }
}

/// Build a CORS layer based on configured origins
///
/// Allows the specified origins (or any, for "*") with all methods and
/// headers.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_any = origins.iter().any(|o| o == "*");

    if allow_any || origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Start the API server on the configured bind address.
///
/// Binds a TCP listener and serves the router until the process stops.
///
/// # Example
///
/// ```no_run
/// use hansard_dl::{Config, HansardScraper};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Arc::new(Config::default());
/// let scraper = Arc::new(HansardScraper::new((*config).clone()).await?);
///
/// // Start API server (blocks until shutdown)
/// hansard_dl::api::start_api_server(scraper, config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_api_server(scraper: Arc<HansardScraper>, config: Arc<Config>) -> Result<()> {
    let bind_address = config.server.api.bind_address;

    tracing::info!(
        address = %bind_address,
        "Starting API server"
    );

    let app = create_router(scraper, config);

    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(crate::error::Error::Io)?;

    tracing::info!(
        address = %bind_address,
        "API server listening"
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| crate::error::Error::ApiServerError(format!("API server failed: {}", e)))?;

    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
