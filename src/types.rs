//! Core types for hansard-dl

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;

/// Canonical storage-key format for sitting dates (`DD-MM-YYYY`).
///
/// This matches the key format of the transcript archive. Keys in this
/// format do NOT sort chronologically as strings; anything needing
/// chronological order must parse first (see [`SittingDate`] `Ord`).
pub const DATE_KEY_FORMAT: &str = "%d-%m-%Y";

/// A calendar day on which a parliamentary sitting may have occurred
///
/// Newtype over [`chrono::NaiveDate`]. Serialized everywhere (JSON, SQLite,
/// artifact keys) as `DD-MM-YYYY`. Ordering is chronological, never lexical.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, ToSchema)]
#[schema(value_type = String, example = "05-01-2024")]
pub struct SittingDate(pub NaiveDate);

impl SittingDate {
    /// Create a SittingDate from a NaiveDate
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Construct from year/month/day, returning None for invalid dates
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Today's date in UTC
    pub fn today() -> Self {
        Self(Utc::now().date_naive())
    }

    /// Get the inner NaiveDate
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Signed number of days from `self` to `other`
    pub fn days_until(&self, other: SittingDate) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// The following calendar day, if representable
    pub fn succ(&self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    /// The date `days` days earlier
    pub fn minus_days(&self, days: u64) -> Option<Self> {
        self.0.checked_sub_days(chrono::Days::new(days)).map(Self)
    }
}

impl std::fmt::Display for SittingDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(DATE_KEY_FORMAT))
    }
}

impl std::str::FromStr for SittingDate {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, DATE_KEY_FORMAT).map(Self)
    }
}

impl Serialize for SittingDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for SittingDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// Implement sqlx Type, Encode, and Decode so sitting dates can be bound and
// read directly as TEXT columns
impl sqlx::Type<sqlx::Sqlite> for SittingDate {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <String as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for SittingDate {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
    ) -> Result<sqlx::encode::IsNull, Box<dyn std::error::Error + Send + Sync>> {
        sqlx::Encode::<sqlx::Sqlite>::encode(self.to_string(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for SittingDate {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        Ok(s.parse::<SittingDate>()?)
    }
}

/// Checkpoint status for a sitting date
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// No sitting occurred on this date (provisional inside the recheck
    /// window, terminal outside it)
    NoSession,
    /// A sitting occurred and its transcript was stored. Terminal: never
    /// overwritten by the producer or consumer once set.
    HasSession,
}

impl SessionStatus {
    /// Convert integer status code to SessionStatus
    pub fn from_i32(status: i32) -> Self {
        match status {
            1 => SessionStatus::HasSession,
            _ => SessionStatus::NoSession,
        }
    }

    /// Convert SessionStatus to integer status code
    pub fn to_i32(&self) -> i32 {
        match self {
            SessionStatus::NoSession => 0,
            SessionStatus::HasSession => 1,
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::NoSession => write!(f, "no_session"),
            SessionStatus::HasSession => write!(f, "has_session"),
        }
    }
}

/// Summary of a full-range producer scan
///
/// Returned by `GET /start`. Counts partition the considered range:
/// `total_dates = in_artifact_store + checkpoint_skipped + checkpoint_recheck
/// + newly eligible`, where `enqueued = checkpoint_recheck + newly eligible`.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ScanSummary {
    /// Calendar days considered (inclusive epoch..today)
    pub total_dates: usize,
    /// Dates skipped because an artifact already exists
    pub in_artifact_store: usize,
    /// Dates skipped on checkpoint evidence (has_session, or stale no_session)
    pub checkpoint_skipped: usize,
    /// no_session dates inside the recheck window, re-enqueued
    pub checkpoint_recheck: usize,
    /// Work items handed to the queue this scan
    pub enqueued: usize,
}

/// Summary of an incremental (catch-up) producer scan
///
/// Returned by `GET /check-today`.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct IncrementalSummary {
    /// The window scanned, as "DD-MM-YYYY to DD-MM-YYYY"
    pub date_range: String,
    /// Work items handed to the queue this scan
    pub enqueued: usize,
}

/// Aggregate read-only view of the archive
///
/// Returned by `GET /status`.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusReport {
    /// Total number of stored transcripts
    pub sessions_scraped: usize,
    /// Chronologically latest stored sitting date, if any
    pub latest_session: Option<String>,
    /// The configured scraping window, as "DD-MM-YYYY to DD-MM-YYYY"
    pub scraping_period: String,
}

/// One page of the absence-backfill reconciliation
///
/// Returned by `GET /backfill-kv`. The caller owns the cursor: it feeds
/// `next_offset` back in until `complete` is true.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct BackfillPage {
    /// Size of the full synthetic date range
    pub total_dates: usize,
    /// Dates examined in this page
    pub processed: usize,
    /// no_session checkpoints written in this page
    pub backfilled_this_batch: usize,
    /// True once the range is exhausted
    pub complete: bool,
    /// Offset to resume from
    pub next_offset: usize,
}

/// One page of the presence-sync reconciliation
///
/// Returned by `GET /sync-r2-batch`.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SyncPage {
    /// Artifact keys examined in this page
    pub processed: usize,
    /// Artifact keys examined up to and including this page
    pub total_processed: usize,
    /// Total artifacts currently stored
    pub total_sessions: usize,
    /// True once every artifact key has been visited
    pub complete: bool,
    /// Offset to resume from
    pub next_offset: usize,
}
