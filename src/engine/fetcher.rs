//! Paginated report fetching
//!
//! One slice is fetched page by page until `totalResults` is exhausted, a
//! page is suppressed, or an error occurs. Pages are produced lazily as a
//! stream so the caller emits records before the next request is sent.

use crate::decode::{classify_response, RawReportRow, ReportPage, SuppressedReason};
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::{OffsetPaginator, PageCursor};
use crate::partition::Slice;
use crate::request::ReportRequestBuilder;
use crate::streams::ReportStream;
use futures::stream::{self, Stream, TryStreamExt};
use tracing::{debug, info, warn};

/// One fetched page of a slice
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Cursor the page was requested with
    pub cursor: PageCursor,
    /// Classified response
    pub page: ReportPage,
}

impl FetchedPage {
    /// Rows of the page, empty when suppressed
    pub fn into_rows(self) -> Vec<RawReportRow> {
        match self.page {
            ReportPage::Rows { rows, .. } => rows,
            ReportPage::Suppressed(_) => Vec::new(),
        }
    }

    /// Check if the page ended the slice with a suppressed result
    pub fn is_suppressed(&self) -> bool {
        matches!(self.page, ReportPage::Suppressed(_))
    }
}

/// Fetches the pages of report slices for one stream
#[derive(Debug, Clone)]
pub struct ReportFetcher<'a> {
    client: &'a HttpClient,
    stream: &'a ReportStream,
    builder: ReportRequestBuilder<'a>,
    paginator: OffsetPaginator,
}

impl<'a> ReportFetcher<'a> {
    /// Create a fetcher paging `page_size` rows at a time
    pub fn new(client: &'a HttpClient, stream: &'a ReportStream, page_size: u64) -> Self {
        Self {
            client,
            stream,
            builder: ReportRequestBuilder::new(stream, page_size),
            paginator: OffsetPaginator::new(page_size),
        }
    }

    /// Request and classify one page
    ///
    /// The first page is sent with the default selector, later pages
    /// override its pagination with `cursor`.
    pub async fn fetch_page(&self, slice: &Slice, cursor: &PageCursor) -> Result<ReportPage> {
        let path = self.stream.path(slice)?;
        let continuation = (cursor.offset > 0).then_some(cursor);
        let body = self.builder.build_body(slice, continuation);

        let response = self
            .client
            .request(self.stream.method, &path, RequestConfig::new().json(body))
            .await?;
        let page = classify_response(&response, self.stream.suppressed_errors, &self.paginator)?;

        match &page {
            ReportPage::Rows { rows, total_results } => debug!(
                "{} {} offset {}: {} rows of {:?}",
                self.stream.name,
                slice.label(),
                cursor.offset,
                rows.len(),
                total_results
            ),
            ReportPage::Suppressed(reason @ SuppressedReason::NoSubResource { .. }) => info!(
                "{} {}: empty result ({reason})",
                self.stream.name,
                slice.label()
            ),
            ReportPage::Suppressed(reason @ SuppressedReason::MalformedEnvelope) => warn!(
                "{} {}: skipping page at offset {} ({reason})",
                self.stream.name,
                slice.label(),
                cursor.offset
            ),
        }

        Ok(page)
    }

    /// Every page of `slice` in offset order
    ///
    /// The stream ends after the last page, after a suppressed page, or
    /// after the first error.
    pub fn fetch_pages<'s>(
        &'s self,
        slice: &'s Slice,
    ) -> impl Stream<Item = Result<FetchedPage>> + 's {
        stream::try_unfold(Some(self.paginator.first_page()), move |next| async move {
            let Some(cursor) = next else {
                return Ok(None);
            };

            let page = self.fetch_page(slice, &cursor).await?;
            let following = match &page {
                ReportPage::Rows { total_results, .. } => self
                    .paginator
                    .next_page_for_total(&cursor, *total_results)
                    .cursor(),
                ReportPage::Suppressed(_) => None,
            };

            Ok(Some((FetchedPage { cursor, page }, following)))
        })
    }

    /// Every raw row of `slice` across all pages
    pub fn fetch<'s>(&'s self, slice: &'s Slice) -> impl Stream<Item = Result<RawReportRow>> + 's {
        self.fetch_pages(slice)
            .map_ok(|page| stream::iter(page.into_rows().into_iter().map(Ok::<_, Error>)))
            .try_flatten()
    }

    /// Page size requested
    pub fn page_size(&self) -> u64 {
        self.builder.limit()
    }
}

/// Collect every row of a slice
pub async fn fetch_all(fetcher: &ReportFetcher<'_>, slice: &Slice) -> Result<Vec<RawReportRow>> {
    fetcher.fetch(slice).try_collect().await
}
