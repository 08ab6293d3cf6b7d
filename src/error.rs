//! Error types for hansard-dl
//!
//! This module provides error handling for the library, including:
//! - Domain-specific error types (source fetch, database, configuration)
//! - HTTP status code mapping for API integration
//! - Structured error responses with machine-readable error codes
//!
//! Note that a confirmed "no sitting" signal from the upstream source is NOT
//! an error; it is modeled as [`crate::source::FetchOutcome::NoSitting`].
//! Everything in this module that originates from a fetch is, by definition,
//! an unknown/transient failure to the consumer's retry budget.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for hansard-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for hansard-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "epoch")
        key: Option<String>,
    },

    /// Database operation failed
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// SQLx database error
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Network-level failure (connect, timeout, read) talking to the source
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The source answered with a status that is neither success nor the
    /// confirmed-absence signal
    #[error("unexpected source status: {status}")]
    UnexpectedStatus {
        /// The HTTP status code the source returned
        status: u16,
    },

    /// The source answered 200 but the body was not a usable transcript
    #[error("malformed source payload: {0}")]
    MalformedPayload(String),

    /// A date string that is not valid `DD-MM-YYYY`
    #[error("invalid sitting date: {0}")]
    InvalidDate(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),

    /// Shutdown in progress - not accepting new work
    #[error("shutdown in progress: not accepting new work")]
    ShuttingDown,
}

/// Database-related errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to connect to database
    #[error("failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to run migrations
    #[error("failed to run migrations: {0}")]
    MigrationFailed(String),

    /// Query failed
    #[error("query failed: {0}")]
    QueryFailed(String),
}

impl Error {
    /// Whether this error counts against a work item's retry budget.
    ///
    /// Every failure reaching the consumer is treated as transient, including
    /// store write failures. The exception is shutdown, which must not burn
    /// an attempt.
    pub fn counts_against_retry_budget(&self) -> bool {
        !matches!(self, Error::ShuttingDown)
    }
}

/// API error response format
///
/// Returned by API endpoints when a whole-request error occurs (per-date
/// failures are handled inside the consumer and never surface here).
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "database_error",
///     "message": "query failed: ...",
///     "details": { "offset": 12000 }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "validation_error")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// Create an API error with additional details
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: Some(details),
            },
        }
    }

    /// Create a "validation error" error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("validation_error", message)
    }

    /// Create an "internal server error"
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("internal_error", message)
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - client-supplied input
            Error::Config { .. } => 400,
            Error::InvalidDate(_) => 400,

            // 500 Internal Server Error - our side
            Error::Database(_) => 500,
            Error::Sqlx(_) => 500,
            Error::Serialization(_) => 500,
            Error::Io(_) => 500,
            Error::ApiServerError(_) => 500,

            // 502 Bad Gateway - the upstream source
            Error::Network(_) => 502,
            Error::UnexpectedStatus { .. } => 502,
            Error::MalformedPayload(_) => 502,

            // 503 Service Unavailable
            Error::ShuttingDown => 503,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Database(_) => "database_error",
            Error::Sqlx(_) => "database_error",
            Error::Network(_) => "network_error",
            Error::UnexpectedStatus { .. } => "unexpected_source_status",
            Error::MalformedPayload(_) => "malformed_payload",
            Error::InvalidDate(_) => "invalid_date",
            Error::Serialization(_) => "serialization_error",
            Error::Io(_) => "io_error",
            Error::ApiServerError(_) => "api_server_error",
            Error::ShuttingDown => "shutting_down",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        let details = match &error {
            Error::UnexpectedStatus { status } => Some(serde_json::json!({
                "status": status,
            })),
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    /// Returns (Error, expected_status_code, expected_error_code) for every
    /// reachable match arm in ToHttpStatus.
    fn all_error_variants() -> Vec<(Error, u16, &'static str)> {
        vec![
            (
                Error::Config {
                    message: "bad value".into(),
                    key: Some("epoch".into()),
                },
                400,
                "config_error",
            ),
            (
                Error::InvalidDate("31-02-2024".into()),
                400,
                "invalid_date",
            ),
            (
                Error::Database(DatabaseError::QueryFailed("timeout".into())),
                500,
                "database_error",
            ),
            (
                Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone")),
                500,
                "io_error",
            ),
            (
                Error::ApiServerError("bind failed".into()),
                500,
                "api_server_error",
            ),
            (
                Error::UnexpectedStatus { status: 418 },
                502,
                "unexpected_source_status",
            ),
            (
                Error::MalformedPayload("not JSON".into()),
                502,
                "malformed_payload",
            ),
            (Error::ShuttingDown, 503, "shutting_down"),
        ]
    }

    #[test]
    fn every_variant_maps_to_expected_status_code() {
        for (error, expected_status, expected_code) in all_error_variants() {
            assert_eq!(
                error.status_code(),
                expected_status,
                "Error with error_code={expected_code} returned wrong status"
            );
        }
    }

    #[test]
    fn every_variant_maps_to_expected_error_code() {
        for (error, _, expected_code) in all_error_variants() {
            assert_eq!(error.error_code(), expected_code);
        }
    }

    #[test]
    fn source_errors_map_to_bad_gateway() {
        assert_eq!(Error::UnexpectedStatus { status: 500 }.status_code(), 502);
        assert_eq!(Error::MalformedPayload("x".into()).status_code(), 502);
    }

    #[test]
    fn everything_but_shutdown_burns_retry_budget() {
        assert!(
            Error::UnexpectedStatus { status: 500 }.counts_against_retry_budget(),
            "unexpected status is a transient failure"
        );
        assert!(
            Error::Database(DatabaseError::QueryFailed("locked".into()))
                .counts_against_retry_budget(),
            "store write failures are classified as transient"
        );
        assert!(
            !Error::ShuttingDown.counts_against_retry_budget(),
            "shutdown must not consume an attempt"
        );
    }

    #[test]
    fn api_error_from_unexpected_status_has_status_detail() {
        let api: ApiError = Error::UnexpectedStatus { status: 503 }.into();
        assert_eq!(api.error.code, "unexpected_source_status");
        let details = api.error.details.expect("should have details");
        assert_eq!(details["status"], 503);
    }

    #[test]
    fn api_error_message_matches_error_display() {
        let err = Error::InvalidDate("99-99-9999".into());
        let display_msg = err.to_string();
        let api: ApiError = err.into();
        assert_eq!(api.error.message, display_msg);
    }

    #[test]
    fn api_error_without_details_omits_details_in_json() {
        let api = ApiError::validation("limit must be positive");
        let parsed: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&api).unwrap()).unwrap();

        assert_eq!(parsed["error"]["code"], "validation_error");
        assert!(
            parsed["error"].get("details").is_none(),
            "details field should be omitted from JSON when None"
        );
    }

    #[test]
    fn api_error_factories_produce_expected_codes() {
        assert_eq!(ApiError::validation("x").error.code, "validation_error");
        assert_eq!(ApiError::internal("x").error.code, "internal_error");
        assert_eq!(ApiError::new("custom", "x").error.code, "custom");
    }
}
