//! Slice scheduling types

use crate::error::{Error, Result};
use crate::types::JsonValue;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// A parent entity (campaign) that entity-scoped reports fan out over
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParentEntity {
    /// Identifier, kept as a string whatever the API returned
    pub id: String,
}

impl ParentEntity {
    /// Create a parent entity
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Read the id field of a listing record
    pub fn from_record(record: &JsonValue) -> Result<Self> {
        match record.get("id") {
            Some(JsonValue::String(id)) if !id.is_empty() => Ok(Self::new(id.as_str())),
            Some(JsonValue::Number(n)) => Ok(Self::new(n.to_string())),
            _ => Err(Error::decode(format!(
                "Parent record has no usable id: {record}"
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for ParentEntity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let record = JsonValue::deserialize(deserializer)?;
        Self::from_record(&record).map_err(serde::de::Error::custom)
    }
}

/// Range of calendar days, start inclusive and end exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    /// First day
    pub start: NaiveDate,
    /// Day after the last day
    pub end: NaiveDate,
}

impl DateWindow {
    /// Create a window
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// True when the window holds no day
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Number of days in the window
    pub fn num_days(&self) -> u64 {
        u64::try_from((self.end - self.start).num_days()).unwrap_or(0)
    }

    /// Each day in the window in ascending order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + Clone {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day < end)
    }
}

/// One unit of fetch work: one parent (or the account) for one day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slice {
    /// Parent entity id, none for account-scoped reports
    pub parent_id: Option<String>,
    /// Day being reported
    pub start_time: NaiveDate,
    /// Exclusive end, always the following day
    pub end_time: NaiveDate,
}

impl Slice {
    /// Slice covering a single day
    pub fn for_day(parent_id: Option<String>, day: NaiveDate) -> Self {
        Self {
            parent_id,
            start_time: day,
            end_time: day + Duration::days(1),
        }
    }

    /// Human readable label for logging
    pub fn label(&self) -> String {
        match &self.parent_id {
            Some(parent) => format!("{parent}@{}", self.start_time),
            None => self.start_time.to_string(),
        }
    }
}
