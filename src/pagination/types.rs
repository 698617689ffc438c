//! Pagination types
//!
//! Defines the cursor handed between pages and the per-fetch bookkeeping.

use crate::types::JsonValue;
use serde_json::json;
use std::collections::HashMap;

/// Offset/limit position of one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    /// Index of the first record on the page
    pub offset: u64,
    /// Page size
    pub limit: u64,
}

impl PageCursor {
    /// Cursor for the first page
    pub fn first(limit: u64) -> Self {
        Self { offset: 0, limit }
    }

    /// Cursor as a body override: `{"selector":{"pagination":{...}}}`
    pub fn to_selector(&self) -> JsonValue {
        json!({
            "selector": {
                "pagination": {
                    "offset": self.offset,
                    "limit": self.limit
                }
            }
        })
    }

    /// Cursor as a bare pagination object: `{"offset":..,"limit":..}`
    pub fn to_pagination(&self) -> JsonValue {
        json!({
            "offset": self.offset,
            "limit": self.limit
        })
    }

    /// Cursor as query parameters for listing GETs
    pub fn to_query(&self) -> HashMap<String, String> {
        let mut params = HashMap::new();
        params.insert("offset".to_string(), self.offset.to_string());
        params.insert("limit".to_string(), self.limit.to_string());
        params
    }
}

/// Result of the next page computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    /// Request this page next
    Continue(PageCursor),
    /// No more pages
    Done,
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue(_))
    }

    /// The cursor to request next, if any
    pub fn cursor(self) -> Option<PageCursor> {
        match self {
            Self::Continue(cursor) => Some(cursor),
            Self::Done => None,
        }
    }
}

/// Tracks pagination progress during one fetch
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Pages received so far
    pub pages: u64,
    /// Records received so far
    pub total_fetched: u64,
    /// Last `totalResults` reported by the server
    pub total_results: Option<u64>,
    /// Is pagination complete?
    pub done: bool,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a received page
    pub fn record_page(&mut self, records: usize, total_results: Option<u64>) {
        self.pages += 1;
        self.total_fetched += records as u64;
        if total_results.is_some() {
            self.total_results = total_results;
        }
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }
}
