//! Common types used throughout the source
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// HTTP Types
// ============================================================================

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
        }
    }
}

// ============================================================================
// Sync Mode
// ============================================================================

/// Synchronization mode for streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Full refresh - fetch all data every time
    FullRefresh,
    /// Incremental - only fetch days at or after the stored watermark
    #[default]
    Incremental,
}

// ============================================================================
// Utilities
// ============================================================================

/// Look up a dotted path (`"pagination.totalResults"`) inside a JSON value
///
/// A leading `$.` is accepted and ignored.
pub fn value_at<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() {
        return Some(value);
    }

    path.split('.')
        .try_fold(value, |current, part| current.as_object()?.get(part))
}

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_conversion() {
        let get: reqwest::Method = Method::GET.into();
        assert_eq!(reqwest::Method::GET, get);
        let post: reqwest::Method = Method::POST.into();
        assert_eq!(reqwest::Method::POST, post);
    }

    #[test]
    fn test_sync_mode_serde() {
        let mode: SyncMode = serde_json::from_str("\"full_refresh\"").unwrap();
        assert_eq!(mode, SyncMode::FullRefresh);

        let json = serde_json::to_string(&SyncMode::Incremental).unwrap();
        assert_eq!(json, "\"incremental\"");
    }

    #[test]
    fn test_value_at() {
        let value = serde_json::json!({
            "pagination": {"totalResults": 2500},
            "metadata": {"app": {"adamId": 42}}
        });

        assert_eq!(value_at(&value, "pagination.totalResults"), Some(&serde_json::json!(2500)));
        assert_eq!(value_at(&value, "$.metadata.app.adamId"), Some(&serde_json::json!(42)));
        assert_eq!(value_at(&value, "metadata.app.missing"), None);
        assert_eq!(value_at(&value, "pagination.totalResults.deeper"), None);
        assert_eq!(value_at(&value, ""), Some(&value));
    }

    #[test]
    fn test_option_string_none_if_empty() {
        assert_eq!(
            Some("2022-01-01".to_string()).none_if_empty(),
            Some("2022-01-01".to_string())
        );
        assert_eq!(Some(String::new()).none_if_empty(), None);
        assert_eq!(None::<String>.none_if_empty(), None);
        assert_eq!(String::new().none_if_empty(), None);
    }
}
