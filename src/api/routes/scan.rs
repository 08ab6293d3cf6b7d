//! Producer scan handlers.
//!
//! Both endpoints return 200 with a summary even when some enqueues failed
//! part-way: re-invoking either scan is always safe, so partial progress is
//! reported rather than rolled back.

use crate::api::AppState;
use axum::{Json, extract::State, response::IntoResponse};

/// GET /start - Full-range scan + enqueue
#[utoipa::path(
    get,
    path = "/start",
    tag = "scan",
    responses(
        (status = 200, description = "Scan summary", body = crate::types::ScanSummary),
        (status = 500, description = "Store enumeration failed"),
        (status = 503, description = "Shutting down")
    )
)]
pub async fn start_full_scan(State(state): State<AppState>) -> impl IntoResponse {
    match state.scraper.full_scan().await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Full scan failed");
            e.into_response()
        }
    }
}

/// GET /check-today - Incremental catch-up scan
#[utoipa::path(
    get,
    path = "/check-today",
    tag = "scan",
    responses(
        (status = 200, description = "Incremental scan summary", body = crate::types::IncrementalSummary),
        (status = 500, description = "Store enumeration failed"),
        (status = 503, description = "Shutting down")
    )
)]
pub async fn check_today(State(state): State<AppState>) -> impl IntoResponse {
    match state.scraper.incremental_scan().await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Incremental scan failed");
            e.into_response()
        }
    }
}
