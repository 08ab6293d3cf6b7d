//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`scan`] — Producer entry points (full and incremental)
//! - [`reconcile`] — Paged store reconciliation
//! - [`system`] — Status, health, OpenAPI

use serde::{Deserialize, Serialize};

mod reconcile;
mod scan;
mod system;

// Re-export all handlers so `routes::function_name` continues to work
pub use reconcile::*;
pub use scan::*;
pub use system::*;

/// Query parameters for the reconciliation endpoints
///
/// The caller owns the cursor: it starts at `offset=0` and feeds each
/// response's `next_offset` back in until `complete` is true.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ReconcileQuery {
    /// Position in the range/key listing to resume from (default: 0)
    pub offset: Option<usize>,
    /// Maximum entries to examine in this call (default: 500)
    pub limit: Option<usize>,
}

impl ReconcileQuery {
    pub(crate) fn offset(&self) -> usize {
        self.offset.unwrap_or(0)
    }

    pub(crate) fn limit(&self) -> usize {
        self.limit.unwrap_or(500)
    }
}
