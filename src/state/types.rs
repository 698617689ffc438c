//! State types for tracking sync progress
//!
//! These types are serialized to JSON and persisted between runs:
//!
//! ```json
//! {"streams": {"keywords_report": {"cursor_field": "startTime", "cursor": "2022-01-02"}}}
//! ```

use super::watermark::{advance, Watermark};
use crate::streams::CURSOR_FIELD;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete state of the source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Per-stream state
    #[serde(default)]
    pub streams: BTreeMap<String, StreamState>,
}

impl State {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get state for a stream
    pub fn get_stream(&self, stream: &str) -> Option<&StreamState> {
        self.streams.get(stream)
    }

    /// Get mutable state for a stream, creating if needed
    pub fn get_stream_mut(&mut self, stream: &str) -> &mut StreamState {
        self.streams.entry(stream.to_string()).or_default()
    }

    /// Get cursor for a stream, ignoring an empty stored value
    pub fn get_cursor(&self, stream: &str) -> Option<&str> {
        self.streams
            .get(stream)?
            .cursor
            .as_deref()
            .filter(|c| !c.is_empty())
    }

    /// Get the watermark of a stream
    pub fn watermark(&self, stream: &str) -> Option<Watermark> {
        let stream_state = self.streams.get(stream)?;
        Some(Watermark {
            cursor_field: stream_state.cursor_field.clone(),
            value: self.get_cursor(stream)?.to_string(),
        })
    }

    /// Store a watermark, keeping the stored value if it is higher
    pub fn set_watermark(&mut self, stream: &str, watermark: Watermark) {
        let stream_state = self.get_stream_mut(stream);
        let current = stream_state.cursor.as_deref().unwrap_or_default();
        stream_state.cursor = Some(advance(current, &watermark.value));
        stream_state.cursor_field = watermark.cursor_field;
    }
}

/// State for a single stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamState {
    /// Record field the cursor tracks
    #[serde(default = "default_cursor_field")]
    pub cursor_field: String,

    /// Current cursor value
    #[serde(default)]
    pub cursor: Option<String>,
}

impl Default for StreamState {
    fn default() -> Self {
        Self {
            cursor_field: default_cursor_field(),
            cursor: None,
        }
    }
}

fn default_cursor_field() -> String {
    CURSOR_FIELD.to_string()
}
