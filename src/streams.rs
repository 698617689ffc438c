//! Built-in stream definitions
//!
//! Each report the source can extract is a [`ReportStream`] value. The
//! differences between reports (endpoint, sort field, which identifiers are
//! lifted to the top level, which 400 messages mean "nothing to report")
//! are data here rather than separate types. Next to the reports sits the
//! `campaigns` dimension stream, read in full on every run.

use crate::error::{Error, Result};
use crate::partition::Slice;
use crate::types::{Method, SyncMode};
use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Placeholder in path templates replaced by the slice's parent id
pub const PARENT_PLACEHOLDER: &str = "{campaignId}";

/// Name of the parent routing key
pub const PARENT_KEY: &str = "campaignId";

/// Cursor field shared by all report streams
pub const CURSOR_FIELD: &str = "startTime";

/// Whether a report is requested for the whole account or per campaign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportScope {
    /// One request per day
    Account,
    /// One request per campaign per day
    Campaign,
}

/// Where a lifted top-level field takes its value from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    /// Dotted path inside the row's `metadata`
    Metadata(&'static str),
    /// The slice's parent id
    SliceParent,
}

/// A field copied to the top level of every record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiftedField {
    /// Output field name
    pub name: &'static str,
    /// Value source
    pub source: FieldSource,
}

impl LiftedField {
    const fn metadata(name: &'static str, path: &'static str) -> Self {
        Self {
            name,
            source: FieldSource::Metadata(path),
        }
    }

    const fn parent(name: &'static str) -> Self {
        Self {
            name,
            source: FieldSource::SliceParent,
        }
    }
}

/// How the `endTime` sent to the API relates to the slice day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndTimeRule {
    /// `endTime` equals `startTime` (single inclusive day)
    SameDay,
    /// `endTime` is the following day
    NextDay,
}

/// Definition of one report stream
#[derive(Debug, Clone, Copy)]
pub struct ReportStream {
    /// Stream name used in output messages and state
    pub name: &'static str,
    /// HTTP method for the report request
    pub method: Method,
    /// Path relative to the API base, may contain [`PARENT_PLACEHOLDER`]
    pub path_template: &'static str,
    /// Account or campaign scope
    pub scope: ReportScope,
    /// Field the selector orders by
    pub sort_field: &'static str,
    /// Primary key fields of the output records
    pub primary_key: &'static [&'static str],
    /// Incremental cursor field
    pub cursor_field: &'static str,
    /// Identifiers lifted to the top level of each record
    pub lifted_fields: &'static [LiftedField],
    /// 400 messages that mean the parent has nothing to report
    pub suppressed_errors: &'static [&'static str],
    /// Grouping dimensions sent with each slice
    pub group_by: &'static [&'static str],
    /// `endTime` rule
    pub end_time: EndTimeRule,
}

/// Account-level campaign report grouped by country or region
pub const CAMPAIGNS_REPORT: ReportStream = ReportStream {
    name: "campaigns_report",
    method: Method::POST,
    path_template: "reports/campaigns",
    scope: ReportScope::Account,
    sort_field: "startTime",
    primary_key: &["startTime", "campaignId", "adamId", "countryOrRegion"],
    cursor_field: CURSOR_FIELD,
    lifted_fields: &[
        LiftedField::metadata("campaignId", "campaignId"),
        LiftedField::metadata("adamId", "app.adamId"),
        LiftedField::metadata("countryOrRegion", "countryOrRegion"),
    ],
    suppressed_errors: &[],
    group_by: &["countryOrRegion"],
    end_time: EndTimeRule::SameDay,
};

/// Keyword-level report per campaign
pub const KEYWORDS_REPORT: ReportStream = ReportStream {
    name: "keywords_report",
    method: Method::POST,
    path_template: "reports/campaigns/{campaignId}/keywords",
    scope: ReportScope::Campaign,
    sort_field: "keywordId",
    primary_key: &["startTime", "keywordId"],
    cursor_field: CURSOR_FIELD,
    lifted_fields: &[LiftedField::metadata("keywordId", "keywordId")],
    suppressed_errors: &[
        "APPSTORE_SEARCH_TAB CAMPAIGN DOES NOT CONTAIN KEYWORD",
        "APPSTORE_PRODUCT_PAGES_BROWSE CAMPAIGN DOES NOT CONTAIN KEYWORD",
    ],
    group_by: &[],
    end_time: EndTimeRule::NextDay,
};

/// Search-term-level report per campaign
pub const SEARCH_TERMS_REPORT: ReportStream = ReportStream {
    name: "search_terms_report",
    method: Method::POST,
    path_template: "reports/campaigns/{campaignId}/searchterms",
    scope: ReportScope::Campaign,
    sort_field: "adGroupId",
    primary_key: &["adGroupId", "startTime", "keywordId", "searchTermText"],
    cursor_field: CURSOR_FIELD,
    lifted_fields: &[
        LiftedField::metadata("adGroupId", "adGroupId"),
        LiftedField::metadata("keywordId", "keywordId"),
        LiftedField::metadata("searchTermText", "searchTermText"),
        LiftedField::parent("campaignId"),
    ],
    suppressed_errors: &[
        "APPSTORE_SEARCH_TAB CAMPAIGN DOES NOT CONTAIN SEARCHTERM",
        "APPSTORE_PRODUCT_PAGES_BROWSE CAMPAIGN DOES NOT CONTAIN SEARCHTERM",
    ],
    group_by: &[],
    end_time: EndTimeRule::SameDay,
};

/// Every built-in report
pub static REPORT_STREAMS: &[ReportStream] =
    &[CAMPAIGNS_REPORT, KEYWORDS_REPORT, SEARCH_TERMS_REPORT];

/// Name of the campaign dimension stream
pub const CAMPAIGNS_STREAM: &str = "campaigns";

/// Primary key of campaign records
pub const CAMPAIGNS_PRIMARY_KEY: &[&str] = &["id"];

/// A stream the source can read
#[derive(Debug, Clone, Copy)]
pub enum SourceStream {
    /// Every campaign, deleted ones included
    Campaigns,
    /// A daily report, incremental on its cursor field
    Report(&'static ReportStream),
}

/// Every built-in stream in catalog order
pub static ALL_STREAMS: &[SourceStream] = &[
    SourceStream::Campaigns,
    SourceStream::Report(&CAMPAIGNS_REPORT),
    SourceStream::Report(&KEYWORDS_REPORT),
    SourceStream::Report(&SEARCH_TERMS_REPORT),
];

impl SourceStream {
    /// Stream name used in output messages and state
    pub fn name(&self) -> &'static str {
        match self {
            Self::Campaigns => CAMPAIGNS_STREAM,
            Self::Report(report) => report.name,
        }
    }

    /// How the stream is read
    pub fn sync_mode(&self) -> SyncMode {
        match self {
            Self::Campaigns => SyncMode::FullRefresh,
            Self::Report(_) => SyncMode::Incremental,
        }
    }

    /// The report definition, if this is a report
    pub fn report(&self) -> Option<&'static ReportStream> {
        match *self {
            Self::Campaigns => None,
            Self::Report(report) => Some(report),
        }
    }
}

impl From<&'static ReportStream> for SourceStream {
    fn from(report: &'static ReportStream) -> Self {
        Self::Report(report)
    }
}

impl ReportStream {
    /// True for reports fetched once per parent entity
    pub fn is_entity_scoped(&self) -> bool {
        self.scope == ReportScope::Campaign
    }

    /// Render the request path for a slice
    pub fn path(&self, slice: &Slice) -> Result<String> {
        if !self.path_template.contains(PARENT_PLACEHOLDER) {
            return Ok(self.path_template.to_string());
        }

        let parent = slice.parent_id.as_deref().ok_or_else(|| {
            Error::Other(format!(
                "Stream '{}' needs a {PARENT_KEY} but the slice has none",
                self.name
            ))
        })?;
        Ok(self.path_template.replace(PARENT_PLACEHOLDER, parent))
    }

    /// `endTime` to send for a slice
    pub fn request_end_time(&self, slice: &Slice) -> NaiveDate {
        match self.end_time {
            EndTimeRule::SameDay => slice.start_time,
            EndTimeRule::NextDay => slice.start_time + Duration::days(1),
        }
    }

    /// Whether a 400 error message marks an empty result
    pub fn is_suppressed_message(&self, message: &str) -> bool {
        self.suppressed_errors.contains(&message)
    }
}

/// Get a built-in stream by name
pub fn get_stream(name: &str) -> Option<SourceStream> {
    ALL_STREAMS.iter().find(|s| s.name() == name).copied()
}

/// Get a built-in report by name
pub fn get_report(name: &str) -> Option<&'static ReportStream> {
    REPORT_STREAMS.iter().find(|s| s.name == name)
}

/// Get a built-in stream by name or fail with [`Error::StreamNotFound`]
pub fn find_stream(name: &str) -> Result<SourceStream> {
    get_stream(name).ok_or_else(|| Error::StreamNotFound {
        stream: name.to_string(),
    })
}

/// Resolve a list of names, or every stream when the list is empty
pub fn select_streams(names: &[String]) -> Result<Vec<SourceStream>> {
    if names.is_empty() {
        return Ok(ALL_STREAMS.to_vec());
    }
    names.iter().map(|name| find_stream(name.trim())).collect()
}

/// List all built-in stream names
pub fn list_streams() -> Vec<&'static str> {
    ALL_STREAMS.iter().map(SourceStream::name).collect()
}

/// Catalog entry printed by the `streams` command
#[derive(Debug, Clone, Serialize)]
pub struct StreamInfo {
    /// Stream name
    pub name: &'static str,
    /// How the stream is read
    pub sync_mode: SyncMode,
    /// Account or campaign scope of a report
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<ReportScope>,
    /// Primary key fields
    pub primary_key: &'static [&'static str],
    /// Incremental cursor field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor_field: Option<&'static str>,
}

impl From<&SourceStream> for StreamInfo {
    fn from(stream: &SourceStream) -> Self {
        match stream {
            SourceStream::Campaigns => Self {
                name: CAMPAIGNS_STREAM,
                sync_mode: SyncMode::FullRefresh,
                scope: None,
                primary_key: CAMPAIGNS_PRIMARY_KEY,
                cursor_field: None,
            },
            SourceStream::Report(report) => Self {
                name: report.name,
                sync_mode: SyncMode::Incremental,
                scope: Some(report.scope),
                primary_key: report.primary_key,
                cursor_field: Some(report.cursor_field),
            },
        }
    }
}
