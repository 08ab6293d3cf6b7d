use super::*;
use crate::scraper::test_helpers::{create_test_scraper_with, test_config};
use crate::types::{SessionStatus, SittingDate};
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

/// Helper to create a router over a scraper with a small, fixed epoch window
async fn create_test_app() -> (Router, Arc<HansardScraper>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let mut config = test_config(&temp_dir);
    config.scrape.epoch = SittingDate::today().minus_days(4).unwrap();
    let (scraper, _source, temp_dir) = create_test_scraper_with(config, temp_dir).await;

    let app = create_router(scraper.clone(), scraper.config.clone());
    (app, scraper, temp_dir)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _scraper, _tmp) = create_test_app().await;

    let (status, body) = get_json(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_start_returns_scan_summary() {
    let (app, scraper, _tmp) = create_test_app().await;

    let (status, body) = get_json(app, "/start").await;
    assert_eq!(status, StatusCode::OK);

    // 5-day window, nothing stored yet: everything is newly eligible
    assert_eq!(body["total_dates"], 5);
    assert_eq!(body["enqueued"], 5);
    assert_eq!(body["in_artifact_store"], 0);
    assert_eq!(scraper.db.pending_work_count().await.unwrap(), 5);
}

#[tokio::test]
async fn test_check_today_returns_incremental_summary() {
    let (app, _scraper, _tmp) = create_test_app().await;

    let (status, body) = get_json(app, "/check-today").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["date_range"].as_str().unwrap().contains(" to "));
    assert!(body["enqueued"].is_u64());
}

#[tokio::test]
async fn test_status_reflects_store_contents() {
    let (app, scraper, _tmp) = create_test_app().await;

    scraper
        .db
        .put_artifact(&"23-09-1990".parse().unwrap(), "{}")
        .await
        .unwrap();
    scraper
        .db
        .put_artifact(&"05-01-2024".parse().unwrap(), "{}")
        .await
        .unwrap();

    let (status, body) = get_json(app, "/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sessions_scraped"], 2);
    assert_eq!(body["latest_session"], "05-01-2024");
}

#[tokio::test]
async fn test_backfill_endpoint_pages_with_cursor() {
    let (app, scraper, _tmp) = create_test_app().await;

    let (status, body) = get_json(app.clone(), "/backfill-kv?offset=0&limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_dates"], 5);
    assert_eq!(body["processed"], 2);
    assert_eq!(body["backfilled_this_batch"], 2);
    assert_eq!(body["complete"], false);
    assert_eq!(body["next_offset"], 2);

    // Drive the cursor to completion
    let (_, body) = get_json(app.clone(), "/backfill-kv?offset=2&limit=10").await;
    assert_eq!(body["complete"], true);
    assert_eq!(body["processed"], 3);

    // All five dates now carry no_session checkpoints
    let epoch = scraper.config.scrape.epoch;
    let cp = scraper.db.get_checkpoint(&epoch).await.unwrap().unwrap();
    assert_eq!(cp.status, SessionStatus::NoSession.to_i32());
}

#[tokio::test]
async fn test_reconcile_endpoints_reject_zero_limit() {
    let (app, _scraper, _tmp) = create_test_app().await;

    let (status, body) = get_json(app.clone(), "/backfill-kv?limit=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");

    let (status, body) = get_json(app, "/sync-r2-batch?offset=0&limit=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_sync_endpoint_writes_has_session_checkpoints() {
    let (app, scraper, _tmp) = create_test_app().await;

    scraper
        .db
        .put_artifact(&"14-02-2023".parse().unwrap(), "{}")
        .await
        .unwrap();

    let (status, body) = get_json(app, "/sync-r2-batch").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["processed"], 1);
    assert_eq!(body["total_sessions"], 1);
    assert_eq!(body["complete"], true);

    let cp = scraper
        .db
        .get_checkpoint(&"14-02-2023".parse().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cp.status, SessionStatus::HasSession.to_i32());
}

#[tokio::test]
async fn test_start_after_shutdown_returns_503() {
    let (app, scraper, _tmp) = create_test_app().await;

    scraper.shutdown();

    let (status, body) = get_json(app, "/start").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "shutting_down");
}

#[tokio::test]
async fn test_openapi_spec_is_served() {
    let (app, _scraper, _tmp) = create_test_app().await;

    let (status, body) = get_json(app, "/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/start"].is_object());
    assert!(body["paths"]["/sync-r2-batch"].is_object());
}

#[tokio::test]
async fn test_cors_headers_present_when_enabled() {
    let (app, _scraper, _tmp) = create_test_app().await;

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
}

#[tokio::test]
async fn test_cors_disabled_omits_headers() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = test_config(&temp_dir);
    config.server.api.cors_enabled = false;
    let (scraper, _source, _tmp) = create_test_scraper_with(config, temp_dir).await;
    let app = create_router(scraper.clone(), scraper.config.clone());

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(
        !response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (app, _scraper, _tmp) = create_test_app().await;

    let request = Request::builder()
        .uri("/downloads")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_api_server_spawns() {
    let (_, scraper, _tmp) = create_test_app().await;

    let mut config = (*scraper.config).clone();
    config.server.api.bind_address = "127.0.0.1:0".parse().unwrap(); // OS assigns a free port
    let config = Arc::new(config);

    let api_handle = tokio::spawn({
        let scraper = scraper.clone();
        async move { start_api_server(scraper, config).await }
    });

    // Give it a moment to start, then abort (serve runs until dropped)
    tokio::time::sleep(Duration::from_millis(100)).await;
    api_handle.abort();
}
