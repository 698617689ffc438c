//! Report response classification

use super::types::{RawReportRow, ReportPage, SuppressedReason, ROWS_PATH};
use crate::error::{Error, Result};
use crate::http::ApiResponse;
use crate::pagination::OffsetPaginator;
use crate::types::{value_at, JsonValue};

/// Classify a report response
///
/// - 2xx with a report envelope gives the rows and `totalResults`.
/// - 2xx without one is a suppressed empty result.
/// - 2xx with a row that is not a report row is [`Error::Decode`].
/// - 400 carrying a message from `suppressed` is a suppressed empty result.
/// - Anything else is [`Error::HttpStatus`] with the response body.
pub fn classify_response(
    response: &ApiResponse,
    suppressed: &[&str],
    paginator: &OffsetPaginator,
) -> Result<ReportPage> {
    if response.is_success() {
        return decode_envelope(response, paginator);
    }

    if response.status == 400 {
        if let Ok(body) = response.json() {
            if let Some(message) = error_messages(&body)
                .into_iter()
                .find(|m| suppressed.contains(&m.as_str()))
            {
                return Ok(ReportPage::Suppressed(SuppressedReason::NoSubResource {
                    message,
                }));
            }
        }
    }

    Err(Error::http_status(response.status, response.body.clone()))
}

/// Messages in an `{"error":{"errors":[{"message":..}]}}` body
pub fn error_messages(body: &JsonValue) -> Vec<String> {
    value_at(body, "error.errors")
        .and_then(JsonValue::as_array)
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e.get("message").and_then(JsonValue::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn decode_envelope(response: &ApiResponse, paginator: &OffsetPaginator) -> Result<ReportPage> {
    let malformed = Ok(ReportPage::Suppressed(SuppressedReason::MalformedEnvelope));

    let Ok(body) = response.json() else {
        return malformed;
    };
    let Some(rows) = value_at(&body, ROWS_PATH).and_then(JsonValue::as_array) else {
        return malformed;
    };
    let rows = rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            serde_json::from_value::<RawReportRow>(row.clone())
                .map_err(|e| Error::decode(format!("Report row {index}: {e}")))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ReportPage::Rows {
        rows,
        total_results: paginator.total_results(&body),
    })
}
