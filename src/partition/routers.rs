//! Slice scheduling
//!
//! Slices are produced lazily, parent-major and date-minor, so the order
//! of a run depends only on the parent order and the window.

use super::types::{DateWindow, ParentEntity, Slice};
use crate::error::{Error, Result};
use crate::types::OptionStringExt;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Calendar date format used for slice bounds and cursor values
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Builds date windows and slices for one stream
#[derive(Debug, Clone, Copy)]
pub struct SliceScheduler {
    /// First day to extract when no watermark is stored
    pub default_start: NaiveDate,
    /// Exclusive end of every window
    pub today: NaiveDate,
}

impl SliceScheduler {
    /// Create a scheduler
    pub fn new(default_start: NaiveDate, today: NaiveDate) -> Self {
        Self {
            default_start,
            today,
        }
    }

    /// Window from the watermark (or the default start) up to today
    ///
    /// An empty watermark counts as absent.
    pub fn window(&self, watermark: Option<&str>) -> Result<DateWindow> {
        let start = match watermark.map(str::to_string).none_if_empty() {
            Some(value) => parse_date(&value)
                .map_err(|_| Error::state(format!("Invalid watermark date: {value}")))?,
            None => self.default_start,
        };
        Ok(DateWindow::new(start, self.today))
    }

    /// Slices for a run
    ///
    /// `parents` is `None` for account-scoped reports, which get one slice
    /// per day. `Some(&[])` means an entity-scoped report with no parents.
    pub fn slices<'a>(
        &self,
        parents: Option<&'a [ParentEntity]>,
        watermark: Option<&str>,
    ) -> Result<impl Iterator<Item = Slice> + 'a> {
        let window = self.window(watermark)?;

        let parent_ids: Box<dyn Iterator<Item = Option<String>> + 'a> = match parents {
            Some(parents) => Box::new(parents.iter().map(|p| Some(p.id.clone()))),
            None => Box::new(std::iter::once(None)),
        };

        Ok(parent_ids.flat_map(move |parent_id| {
            window
                .days()
                .map(move |day| Slice::for_day(parent_id.clone(), day))
        }))
    }
}

/// Build slices for `parents` from the watermark through `today`
pub fn build_slices<'a>(
    parents: Option<&'a [ParentEntity]>,
    watermark: Option<&str>,
    default_start: NaiveDate,
    today: NaiveDate,
) -> Result<impl Iterator<Item = Slice> + 'a> {
    SliceScheduler::new(default_start, today).slices(parents, watermark)
}

/// Parse a calendar date
///
/// Accepts `YYYY-MM-DD` and timestamps whose date part is used.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ndt.date());
        }
    }

    Err(Error::config(format!("Invalid date format: {s}")))
}
