//! Pagination module
//!
//! Search Ads list and report endpoints page with an `offset`/`limit` pair
//! and report `pagination.totalResults` in every response. The cursor is
//! carried in the query string for listing GETs and inside
//! `selector.pagination` for report and find POSTs.

mod strategies;
mod types;

pub use strategies::{next_offset, OffsetPaginator, DEFAULT_TOTAL_PATH};
pub use types::{NextPage, PageCursor, PaginationState};
