//! Reconciliation handlers.
//!
//! The endpoint paths carry the store names of the original deployment this
//! archive migrated from (a KV checkpoint namespace and an R2 object bucket);
//! they are kept stable for the external drivers that already call them.

use crate::api::AppState;
use crate::error::ApiError;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::ReconcileQuery;

/// Reject an explicit `limit=0`: such a page can never make progress, so an
/// external driver looping until `complete` would spin forever
fn reject_zero_limit(query: &ReconcileQuery) -> Option<Response> {
    if query.limit == Some(0) {
        let error = ApiError::validation("limit must be positive");
        return Some((StatusCode::BAD_REQUEST, Json(error)).into_response());
    }
    None
}

/// GET /backfill-kv - One page of absence backfill
#[utoipa::path(
    get,
    path = "/backfill-kv",
    tag = "reconcile",
    params(
        ("offset" = Option<usize>, Query, description = "Range position to resume from"),
        ("limit" = Option<usize>, Query, description = "Dates to examine this call")
    ),
    responses(
        (status = 200, description = "Backfill page result", body = crate::types::BackfillPage),
        (status = 400, description = "limit must be positive", body = crate::error::ApiError),
        (status = 500, description = "Store access failed")
    )
)]
pub async fn backfill_checkpoints(
    State(state): State<AppState>,
    Query(query): Query<ReconcileQuery>,
) -> impl IntoResponse {
    if let Some(rejection) = reject_zero_limit(&query) {
        return rejection;
    }
    match state
        .scraper
        .backfill_absence(query.offset(), query.limit())
        .await
    {
        Ok(page) => Json(page).into_response(),
        Err(e) => {
            tracing::error!(error = %e, offset = query.offset(), "Backfill page failed");
            e.into_response()
        }
    }
}

/// GET /sync-r2-batch - One page of presence sync
#[utoipa::path(
    get,
    path = "/sync-r2-batch",
    tag = "reconcile",
    params(
        ("offset" = Option<usize>, Query, description = "Key-listing position to resume from"),
        ("limit" = Option<usize>, Query, description = "Artifact keys to examine this call")
    ),
    responses(
        (status = 200, description = "Sync page result", body = crate::types::SyncPage),
        (status = 400, description = "limit must be positive", body = crate::error::ApiError),
        (status = 500, description = "Store access failed")
    )
)]
pub async fn sync_artifacts(
    State(state): State<AppState>,
    Query(query): Query<ReconcileQuery>,
) -> impl IntoResponse {
    if let Some(rejection) = reject_zero_limit(&query) {
        return rejection;
    }
    match state
        .scraper
        .sync_presence(query.offset(), query.limit())
        .await
    {
        Ok(page) => Json(page).into_response(),
        Err(e) => {
            tracing::error!(error = %e, offset = query.offset(), "Sync page failed");
            e.into_response()
        }
    }
}
