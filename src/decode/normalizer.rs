//! Report row normalization

use super::types::{NormalizedRecord, RawReportRow};
use crate::partition::{Slice, DATE_FORMAT};
use crate::streams::{FieldSource, ReportStream};
use crate::types::{value_at, JsonObject, JsonValue};
use tracing::debug;

/// Separator between flattened key segments
pub const FLATTEN_SEPARATOR: &str = "_";

/// Flatten nested objects into `parent_child` keys
///
/// Arrays and scalars are leaves. Empty objects produce no key.
///
/// ```
/// use searchads_source::decode::flatten;
/// use serde_json::json;
///
/// let nested = json!({"a": {"b": 1, "c": {"d": 2}}});
/// let flat = flatten(nested.as_object().unwrap());
/// assert_eq!(serde_json::Value::Object(flat), json!({"a_b": 1, "a_c_d": 2}));
/// ```
pub fn flatten(object: &JsonObject) -> JsonObject {
    let mut out = JsonObject::new();
    for (key, value) in object {
        flatten_into(&mut out, key, value);
    }
    out
}

/// Flatten `value` into `out` under the key path `prefix`
pub fn flatten_into(out: &mut JsonObject, prefix: &str, value: &JsonValue) {
    match value {
        JsonValue::Object(map) => {
            for (key, child) in map {
                flatten_into(out, &format!("{prefix}{FLATTEN_SEPARATOR}{key}"), child);
            }
        }
        leaf => {
            out.insert(prefix.to_string(), leaf.clone());
        }
    }
}

/// Turns raw report rows into flat records for one stream
#[derive(Debug, Clone, Copy)]
pub struct ResponseNormalizer<'a> {
    stream: &'a ReportStream,
}

impl<'a> ResponseNormalizer<'a> {
    /// Create a normalizer for `stream`
    pub fn new(stream: &'a ReportStream) -> Self {
        Self { stream }
    }

    /// Records for every row and granularity entry, in input order
    pub fn normalize<'r>(
        &'r self,
        rows: &'r [RawReportRow],
        slice: &'r Slice,
    ) -> impl Iterator<Item = NormalizedRecord> + 'r {
        rows.iter().flat_map(move |row| self.normalize_row(row, slice))
    }

    /// One record per granularity entry of `row`
    pub fn normalize_row(&self, row: &RawReportRow, slice: &Slice) -> Vec<NormalizedRecord> {
        row.granularity
            .iter()
            .map(|entry| self.build_record(row, entry, slice))
            .collect()
    }

    fn build_record(
        &self,
        row: &RawReportRow,
        entry: &JsonObject,
        slice: &Slice,
    ) -> NormalizedRecord {
        let mut record = NormalizedRecord::new();

        for field in self.stream.lifted_fields {
            let value = match field.source {
                FieldSource::Metadata(path) => metadata_value(&row.metadata, path).cloned(),
                FieldSource::SliceParent => slice.parent_id.clone().map(JsonValue::String),
            };
            record.insert(field.name.to_string(), value.unwrap_or(JsonValue::Null));
        }

        let cursor = match entry.get("date") {
            Some(date) if !date.is_null() => date.clone(),
            _ => {
                debug!(
                    "Granularity entry without date in {}, using slice day",
                    self.stream.name
                );
                JsonValue::String(slice.start_time.format(DATE_FORMAT).to_string())
            }
        };
        record.insert(self.stream.cursor_field.to_string(), cursor);

        for (key, value) in &row.metadata {
            flatten_into(&mut record, &format!("metadata{FLATTEN_SEPARATOR}{key}"), value);
        }
        for (key, value) in entry {
            flatten_into(&mut record, &format!("metrics{FLATTEN_SEPARATOR}{key}"), value);
        }
        if let Some(insights) = row.insights.as_ref().filter(|v| !v.is_null()) {
            flatten_into(&mut record, "insights", insights);
        }

        record
    }
}

fn metadata_value<'v>(metadata: &'v JsonObject, path: &str) -> Option<&'v JsonValue> {
    let (head, rest) = path.split_once('.').unwrap_or((path, ""));
    value_at(metadata.get(head)?, rest)
}
