//! Engine types
//!
//! Message types and configuration for the sync engine.

use super::parents::ParentListing;
use crate::types::{JsonObject, SyncMode};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;

/// A message emitted during sync
///
/// Serialized as one JSON object per line:
/// `{"type":"RECORD","stream":..,"data":{..},"emitted_at":..}` or
/// `{"type":"STATE","stream":..,"data":{..}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    /// One normalized record
    Record {
        /// Stream name
        stream: String,
        /// Flat record
        data: JsonObject,
        /// Milliseconds since the epoch when the record was emitted
        emitted_at: i64,
    },
    /// Committed watermark of a stream
    State {
        /// Stream name
        stream: String,
        /// `{"cursor_field":..,"cursor":..}`
        data: Value,
    },
}

impl Message {
    /// Create a record message stamped now
    pub fn record(stream: impl Into<String>, data: JsonObject) -> Self {
        Self::record_at(stream, data, Utc::now())
    }

    /// Create a record message with an explicit emission time
    pub fn record_at(stream: impl Into<String>, data: JsonObject, at: DateTime<Utc>) -> Self {
        Self::Record {
            stream: stream.into(),
            data,
            emitted_at: at.timestamp_millis(),
        }
    }

    /// Create a state message
    pub fn state(stream: impl Into<String>, data: Value) -> Self {
        Self::State {
            stream: stream.into(),
            data,
        }
    }

    /// Stream the message belongs to
    pub fn stream(&self) -> &str {
        match self {
            Self::Record { stream, .. } | Self::State { stream, .. } => stream,
        }
    }

    /// Check if this is a record message
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record { .. })
    }

    /// Check if this is a state message
    pub fn is_state(&self) -> bool {
        matches!(self, Self::State { .. })
    }

    /// Record payload, if this is a record
    pub fn record_data(&self) -> Option<&JsonObject> {
        match self {
            Self::Record { data, .. } => Some(data),
            Self::State { .. } => None,
        }
    }
}

/// Configuration for sync operation
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// First day extracted when a stream has no watermark
    pub start_date: NaiveDate,
    /// Exclusive end of the window, none means the current UTC date
    pub today: Option<NaiveDate>,
    /// Rows per report page
    pub page_size: u64,
    /// Parent listing strategy and page size
    pub parent_listing: ParentListing,
    /// Incremental resumes from the watermark, full refresh ignores it
    pub sync_mode: SyncMode,
}

impl SyncConfig {
    /// Create a sync config starting at `start_date`
    pub fn new(start_date: NaiveDate) -> Self {
        Self {
            start_date,
            today: None,
            page_size: 1000,
            parent_listing: ParentListing::default(),
            sync_mode: SyncMode::default(),
        }
    }

    /// Pin the exclusive end date
    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Set the report page size
    #[must_use]
    pub fn with_page_size(mut self, size: u64) -> Self {
        self.page_size = size;
        self
    }

    /// Set the parent listing strategy
    #[must_use]
    pub fn with_parent_listing(mut self, listing: ParentListing) -> Self {
        self.parent_listing = listing;
        self
    }

    /// Set the sync mode
    #[must_use]
    pub fn with_sync_mode(mut self, mode: SyncMode) -> Self {
        self.sync_mode = mode;
        self
    }

    /// Exclusive end date for this run
    pub fn effective_today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Utc::now().date_naive())
    }
}

/// Statistics from a sync operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    /// Total records emitted
    pub records_synced: usize,
    /// Total report pages fetched
    pub pages_fetched: usize,
    /// Total slices completed
    pub slices_synced: usize,
    /// Slices that ended in a suppressed empty result
    pub slices_suppressed: usize,
    /// Total streams completed
    pub streams_synced: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SyncStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add records
    pub fn add_records(&mut self, count: usize) {
        self.records_synced += count;
    }

    /// Add a page
    pub fn add_page(&mut self) {
        self.pages_fetched += 1;
    }

    /// Add a slice
    pub fn add_slice(&mut self) {
        self.slices_synced += 1;
    }

    /// Add a suppressed slice
    pub fn add_suppressed(&mut self) {
        self.slices_suppressed += 1;
    }

    /// Add a stream
    pub fn add_stream(&mut self) {
        self.streams_synced += 1;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
