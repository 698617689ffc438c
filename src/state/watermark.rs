//! Watermark tracking
//!
//! Cursor values are zero-padded ISO-8601 dates, so lexical order is date
//! order. Cursors in any other format are not supported.

use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Serialize};

/// Persisted cursor of one stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watermark {
    /// Record field the cursor tracks
    pub cursor_field: String,
    /// Highest value seen
    pub value: String,
}

/// Lexical maximum of two cursor values, the empty string being minimal
///
/// ```
/// use searchads_source::state::advance;
///
/// assert_eq!(advance("2022-01-05", "2022-01-03"), "2022-01-05");
/// assert_eq!(advance("", "2022-01-01"), "2022-01-01");
/// ```
pub fn advance(current: &str, candidate: &str) -> String {
    if candidate > current {
        candidate.to_string()
    } else {
        current.to_string()
    }
}

/// Folds record cursor values into the next watermark
#[derive(Debug, Clone)]
pub struct WatermarkTracker {
    cursor_field: String,
    value: String,
}

impl WatermarkTracker {
    /// Start from the stored value, or from nothing
    pub fn new(cursor_field: impl Into<String>, initial: Option<&str>) -> Self {
        Self {
            cursor_field: cursor_field.into(),
            value: initial.unwrap_or_default().to_string(),
        }
    }

    /// Advance with a candidate cursor value
    pub fn observe_value(&mut self, candidate: &str) {
        if candidate > self.value.as_str() {
            self.value = candidate.to_string();
        }
    }

    /// Advance with the cursor field of a record
    ///
    /// Records whose cursor is missing or not a string leave the
    /// watermark unchanged.
    pub fn observe(&mut self, record: &JsonObject) {
        if let Some(candidate) = record.get(&self.cursor_field).and_then(JsonValue::as_str) {
            self.observe_value(candidate);
        }
    }

    /// Current fold value, empty when nothing was seen
    pub fn current(&self) -> &str {
        &self.value
    }

    /// Cursor field being tracked
    pub fn cursor_field(&self) -> &str {
        &self.cursor_field
    }

    /// Final watermark, none if the fold never saw a value
    pub fn into_watermark(self) -> Option<Watermark> {
        if self.value.is_empty() {
            None
        } else {
            Some(Watermark {
                cursor_field: self.cursor_field,
                value: self.value,
            })
        }
    }
}
