//! Parent entity enumeration
//!
//! Lists campaigns page by page and returns them as a `Vec`, so a run can
//! walk the same parents for every entity-scoped stream.

use crate::error::{Error, Result};
use crate::http::{ApiResponse, HttpClient, RequestConfig};
use crate::pagination::{NextPage, OffsetPaginator, PageCursor, PaginationState};
use crate::partition::ParentEntity;
use crate::types::{JsonObject, JsonValue};
use serde_json::json;
use tracing::debug;

/// Listing endpoint for campaigns
pub const CAMPAIGNS_PATH: &str = "campaigns";

/// Selector endpoint for campaigns
pub const CAMPAIGNS_FIND_PATH: &str = "campaigns/find";

/// Default campaigns per listing page
pub const DEFAULT_PARENT_PAGE_SIZE: u64 = 100;

/// How parent campaigns are listed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentListing {
    /// `GET campaigns?offset=..&limit=..`
    List {
        /// Page size
        limit: u64,
    },
    /// `POST campaigns/find`, deleted campaigns included
    Find {
        /// Page size
        limit: u64,
    },
}

impl Default for ParentListing {
    fn default() -> Self {
        Self::List {
            limit: DEFAULT_PARENT_PAGE_SIZE,
        }
    }
}

impl ParentListing {
    /// Page size of the listing
    pub fn limit(&self) -> u64 {
        match self {
            Self::List { limit } | Self::Find { limit } => *limit,
        }
    }
}

/// A listed campaign
#[derive(Debug, Clone, PartialEq)]
pub struct ListedCampaign {
    /// Parent entity for report slices
    pub parent: ParentEntity,
    /// Campaign record as returned by the API
    pub record: JsonObject,
}

/// Lists the parent entities of entity-scoped reports
#[derive(Debug)]
pub struct ParentEnumerator<'a> {
    client: &'a HttpClient,
    listing: ParentListing,
    paginator: OffsetPaginator,
}

impl<'a> ParentEnumerator<'a> {
    /// Create an enumerator
    pub fn new(client: &'a HttpClient, listing: ParentListing) -> Self {
        Self {
            client,
            listing,
            paginator: OffsetPaginator::new(listing.limit()),
        }
    }

    /// Every parent in server order
    pub async fn list_parents(&self) -> Result<Vec<ParentEntity>> {
        Ok(self
            .list_campaigns()
            .await?
            .into_iter()
            .map(|campaign| campaign.parent)
            .collect())
    }

    /// Every campaign record in server order
    ///
    /// Any non-2xx status or undecodable page fails the listing with
    /// [`Error::HttpStatus`] carrying the response status and body.
    pub async fn list_campaigns(&self) -> Result<Vec<ListedCampaign>> {
        let mut campaigns = Vec::new();
        let mut cursor = self.paginator.first_page();
        let mut progress = PaginationState::new();

        while !progress.done {
            let response = self.fetch_page(&cursor).await?.error_for_status()?;
            let (body, page) = parse_page(&response)?;
            progress.record_page(page.len(), self.paginator.total_results(&body));
            debug!(
                "Listed {} parents at offset {} ({} of {:?})",
                page.len(),
                cursor.offset,
                progress.total_fetched,
                progress.total_results
            );
            campaigns.extend(page);

            match self.paginator.next_page(&cursor, &body) {
                NextPage::Continue(next) => cursor = next,
                NextPage::Done => progress.mark_done(),
            }
        }

        Ok(campaigns)
    }

    async fn fetch_page(&self, cursor: &PageCursor) -> Result<ApiResponse> {
        match self.listing {
            ParentListing::List { .. } => {
                let config = RequestConfig {
                    query: cursor.to_query(),
                    ..RequestConfig::default()
                };
                self.client.get(CAMPAIGNS_PATH, config).await
            }
            ParentListing::Find { .. } => {
                self.client
                    .post(CAMPAIGNS_FIND_PATH, find_body(cursor))
                    .await
            }
        }
    }
}

/// Selector for `campaigns/find` that includes deleted campaigns
pub fn find_body(cursor: &PageCursor) -> JsonValue {
    json!({
        "fields": null,
        "conditions": [
            {"field": "deleted", "operator": "IN", "values": ["true", "false"]}
        ],
        "orderBy": [{"field": "name", "sortOrder": "ASCENDING"}],
        "pagination": cursor.to_pagination()
    })
}

fn parse_page(response: &ApiResponse) -> Result<(JsonValue, Vec<ListedCampaign>)> {
    let undecodable = || Error::http_status(response.status, response.body.clone());

    let body = response.json().map_err(|_| undecodable())?;
    let page = body
        .get("data")
        .and_then(JsonValue::as_array)
        .ok_or_else(undecodable)?
        .iter()
        .map(|record| {
            let parent = ParentEntity::from_record(record)?;
            let record = record.as_object().cloned().unwrap_or_default();
            Ok(ListedCampaign { parent, record })
        })
        .collect::<Result<Vec<_>>>()
        .map_err(|e| {
            debug!("Undecodable campaign listing: {e}");
            undecodable()
        })?;

    Ok((body, page))
}
