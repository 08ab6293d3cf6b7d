//! OpenAPI documentation and schema generation
//!
//! This module defines the OpenAPI specification for the hansard-dl REST API
//! using utoipa for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the hansard-dl REST API
///
/// The spec can be accessed via:
/// - `/openapi.json` - JSON format OpenAPI specification
/// - `/swagger-ui` - Interactive Swagger UI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "hansard-dl REST API",
        version = "0.1.0",
        description = "Resumable, rate-limited Hansard transcript crawl scheduler",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8870", description = "Local development server")
    ),
    paths(
        // Scans
        crate::api::routes::start_full_scan,
        crate::api::routes::check_today,

        // Reconciliation
        crate::api::routes::backfill_checkpoints,
        crate::api::routes::sync_artifacts,

        // System
        crate::api::routes::status,
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
    ),
    components(
        schemas(
            crate::types::SittingDate,
            crate::types::SessionStatus,
            crate::types::ScanSummary,
            crate::types::IncrementalSummary,
            crate::types::StatusReport,
            crate::types::BackfillPage,
            crate::types::SyncPage,
            crate::error::ApiError,
            crate::error::ErrorDetail,
            crate::api::routes::ReconcileQuery,
        )
    ),
    tags(
        (name = "scan", description = "Producer scans that feed the work queue"),
        (name = "reconcile", description = "Paged repair of checkpoint/artifact drift"),
        (name = "system", description = "Status, health, and API documentation")
    )
)]
pub struct ApiDoc;
