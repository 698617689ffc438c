//! Report response decoding
//!
//! Classifies report responses into rows or a suppressed empty result and
//! normalizes nested report rows into flat records, one per row and
//! granularity entry.

mod envelope;
mod normalizer;
mod types;

pub use envelope::{classify_response, error_messages};
pub use normalizer::{flatten, flatten_into, ResponseNormalizer, FLATTEN_SEPARATOR};
pub use types::{NormalizedRecord, RawReportRow, ReportPage, SuppressedReason, ROWS_PATH};
