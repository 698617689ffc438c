//! Decoder types

use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Where report rows live in a successful response
pub const ROWS_PATH: &str = "data.reportingDataResponse.row";

/// A flat output record
pub type NormalizedRecord = JsonObject;

/// One report row as returned by the API
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawReportRow {
    /// Identifiers and dimensions of the row
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: JsonObject,
    /// Dated metric buckets
    #[serde(default, deserialize_with = "null_as_default")]
    pub granularity: Vec<JsonObject>,
    /// Optional insights block
    #[serde(default)]
    pub insights: Option<JsonValue>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Why a slice produced no rows without failing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuppressedReason {
    /// 400 with an allow-listed "no sub-resource" message
    NoSubResource {
        /// The matching message
        message: String,
    },
    /// 2xx whose body is not a report envelope
    MalformedEnvelope,
}

impl fmt::Display for SuppressedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSubResource { message } => write!(f, "no sub-resource ({message})"),
            Self::MalformedEnvelope => write!(f, "malformed response envelope"),
        }
    }
}

/// Outcome of one report page request
#[derive(Debug, Clone, PartialEq)]
pub enum ReportPage {
    /// Rows of the page and the server-reported total
    Rows {
        /// Report rows in server order
        rows: Vec<RawReportRow>,
        /// `pagination.totalResults`, if present
        total_results: Option<u64>,
    },
    /// The slice has nothing to report
    Suppressed(SuppressedReason),
}

impl ReportPage {
    /// Number of rows on the page
    pub fn row_count(&self) -> usize {
        match self {
            Self::Rows { rows, .. } => rows.len(),
            Self::Suppressed(_) => 0,
        }
    }
}
