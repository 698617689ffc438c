//! Report request bodies
//!
//! A body is built in three layers: the stream's default selector, the
//! pagination cursor, then the slice's own fields. Objects merge
//! recursively and later layers win on conflicting keys.

use crate::pagination::PageCursor;
use crate::partition::{Slice, DATE_FORMAT};
use crate::streams::{ReportStream, PARENT_KEY};
use crate::types::{JsonObject, JsonValue};
use serde_json::json;

/// Builds report request bodies for one stream
#[derive(Debug, Clone, Copy)]
pub struct ReportRequestBuilder<'a> {
    stream: &'a ReportStream,
    limit: u64,
}

impl<'a> ReportRequestBuilder<'a> {
    /// Create a builder for `stream` paging `limit` rows at a time
    pub fn new(stream: &'a ReportStream, limit: u64) -> Self {
        Self { stream, limit }
    }

    /// Page size used in the default selector
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Default body before any cursor or slice is applied
    pub fn default_body(&self) -> JsonValue {
        json!({
            "selector": {
                "orderBy": [{"field": self.stream.sort_field, "sortOrder": "ASCENDING"}],
                "conditions": [],
                "pagination": {"offset": 0, "limit": self.limit}
            },
            "timeZone": "UTC",
            "returnRecordsWithNoMetrics": false,
            "returnRowTotals": false,
            "returnGrandTotals": false,
            "granularity": "DAILY"
        })
    }

    /// Fields contributed by a slice
    ///
    /// The parent id is a routing key for the path and never part of the
    /// body.
    pub fn slice_fields(&self, slice: &Slice) -> JsonValue {
        let mut fields = JsonObject::new();
        fields.insert(
            "startTime".to_string(),
            JsonValue::String(slice.start_time.format(DATE_FORMAT).to_string()),
        );
        fields.insert(
            "endTime".to_string(),
            JsonValue::String(
                self.stream
                    .request_end_time(slice)
                    .format(DATE_FORMAT)
                    .to_string(),
            ),
        );
        if !self.stream.group_by.is_empty() {
            fields.insert("groupBy".to_string(), json!(self.stream.group_by));
        }
        JsonValue::Object(fields)
    }

    /// Body for `slice`, optionally continuing at `cursor`
    pub fn build_body(&self, slice: &Slice, cursor: Option<&PageCursor>) -> JsonValue {
        let mut body = self.default_body();
        if let Some(cursor) = cursor {
            merge_json(&mut body, &cursor.to_selector());
        }
        merge_json(&mut body, &self.slice_fields(slice));
        if let Some(fields) = body.as_object_mut() {
            fields.remove(PARENT_KEY);
        }
        body
    }
}

/// Recursively merge `overlay` into `base`
///
/// Objects merge key by key. Any other value in `overlay` replaces the
/// one in `base`, arrays included.
pub fn merge_json(base: &mut JsonValue, overlay: &JsonValue) {
    match (base, overlay) {
        (JsonValue::Object(base), JsonValue::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}
