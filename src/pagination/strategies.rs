//! Offset pagination strategy

use super::types::{NextPage, PageCursor};
use crate::types::{value_at, JsonValue};

/// Where Search Ads reports the total record count
pub const DEFAULT_TOTAL_PATH: &str = "pagination.totalResults";

/// Offset of the page after `offset`, or `None` once `offset + limit`
/// reaches `total`
///
/// ```
/// use searchads_source::pagination::next_offset;
///
/// assert_eq!(next_offset(0, 1000, 2500), Some(1000));
/// assert_eq!(next_offset(2000, 1000, 2500), None);
/// ```
pub fn next_offset(offset: u64, limit: u64, total: u64) -> Option<u64> {
    let next = offset.saturating_add(limit);
    (limit > 0 && next < total).then_some(next)
}

/// Offset/limit paginator driven by the server's `totalResults`
#[derive(Debug, Clone)]
pub struct OffsetPaginator {
    /// Number of records per page
    pub limit: u64,
    /// Dotted path to the total count in a response body
    pub total_path: String,
}

impl OffsetPaginator {
    /// Create a new offset paginator
    pub fn new(limit: u64) -> Self {
        Self {
            limit,
            total_path: DEFAULT_TOTAL_PATH.to_string(),
        }
    }

    /// Read the total count from a different path
    #[must_use]
    pub fn with_total_path(mut self, path: impl Into<String>) -> Self {
        self.total_path = path.into();
        self
    }

    /// Cursor for the first request
    pub fn first_page(&self) -> PageCursor {
        PageCursor::first(self.limit)
    }

    /// Extract `totalResults` from a response body
    ///
    /// Accepts integers and numeric strings.
    pub fn total_results(&self, body: &JsonValue) -> Option<u64> {
        match value_at(body, &self.total_path)? {
            JsonValue::Number(n) => n.as_u64(),
            JsonValue::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Decide the page after `current` given the server-reported total
    ///
    /// A missing total ends pagination.
    pub fn next_page_for_total(&self, current: &PageCursor, total: Option<u64>) -> NextPage {
        match total.and_then(|total| next_offset(current.offset, current.limit, total)) {
            Some(offset) => NextPage::Continue(PageCursor {
                offset,
                limit: current.limit,
            }),
            None => NextPage::Done,
        }
    }

    /// Decide the page after `current` from a response body
    pub fn next_page(&self, current: &PageCursor, body: &JsonValue) -> NextPage {
        self.next_page_for_total(current, self.total_results(body))
    }
}
