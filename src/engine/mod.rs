//! Execution engine module
//!
//! Main read loop and stream orchestration.
//!
//! # Overview
//!
//! The engine module provides:
//! - `SyncEngine` - Runs streams slice by slice and commits watermarks
//! - `SyncEngine::sync_campaigns` - Emits every campaign record in full
//! - `ParentEnumerator` - Lists the campaigns entity-scoped reports run under
//! - `ReportFetcher` - Pages through one report slice
//! - Message types for output (Record, State)
//!
//! Streams run sequentially, slices in parent-major date order, pages in
//! offset order. A stream's watermark is committed only after its last
//! slice succeeds.

mod fetcher;
mod parents;
mod types;

pub use fetcher::{fetch_all, FetchedPage, ReportFetcher};
pub use parents::{
    find_body, ListedCampaign, ParentEnumerator, ParentListing, CAMPAIGNS_FIND_PATH,
    CAMPAIGNS_PATH, DEFAULT_PARENT_PAGE_SIZE,
};
pub use types::{Message, SyncConfig, SyncStats};

use crate::decode::ResponseNormalizer;
use crate::error::Result;
use crate::http::HttpClient;
use crate::output::MessageSink;
use crate::partition::{ParentEntity, SliceScheduler};
use crate::state::{StateManager, WatermarkTracker};
use crate::streams::{ReportStream, SourceStream, CAMPAIGNS_STREAM};
use crate::types::SyncMode;
use futures::{pin_mut, TryStreamExt};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Sync engine for orchestrating report extraction
#[derive(Debug)]
pub struct SyncEngine {
    /// HTTP client
    client: HttpClient,
    /// State manager
    state: StateManager,
    /// Sync configuration
    config: SyncConfig,
    /// Statistics
    stats: SyncStats,
    /// Parents listed during this run
    parents: Option<Arc<Vec<ParentEntity>>>,
}

impl SyncEngine {
    /// Create a new sync engine
    pub fn new(client: HttpClient, state: StateManager, config: SyncConfig) -> Self {
        Self {
            client,
            state,
            config,
            stats: SyncStats::default(),
            parents: None,
        }
    }

    /// Get the state manager
    pub fn state(&self) -> &StateManager {
        &self.state
    }

    /// Get the sync configuration
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Get statistics
    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Parent campaigns, listed once per engine
    pub async fn parents(&mut self) -> Result<Arc<Vec<ParentEntity>>> {
        if let Some(parents) = &self.parents {
            return Ok(Arc::clone(parents));
        }

        let listed = ParentEnumerator::new(&self.client, self.config.parent_listing)
            .list_parents()
            .await?;
        info!("Found {} campaigns", listed.len());

        let parents = Arc::new(listed);
        self.parents = Some(Arc::clone(&parents));
        Ok(parents)
    }

    /// Sync one stream into `sink`
    ///
    /// Records are emitted as they are normalized. On success the new
    /// watermark is committed and a state message follows the records. Any
    /// error stops the stream before its watermark is touched.
    pub async fn sync_stream(
        &mut self,
        stream: &ReportStream,
        sink: &mut dyn MessageSink,
    ) -> Result<()> {
        let start = Instant::now();
        info!("Starting sync for stream: {}", stream.name);

        let stored = match self.config.sync_mode {
            SyncMode::Incremental => self.state.watermark(stream.name).await,
            SyncMode::FullRefresh => None,
        };
        let stored_value = stored.as_ref().map(|w| w.value.as_str());

        let scheduler = SliceScheduler::new(self.config.start_date, self.config.effective_today());
        let window = scheduler.window(stored_value)?;
        if window.is_empty() {
            info!("{} is up to date at {}", stream.name, window.start);
        }

        let parents = if stream.is_entity_scoped() && !window.is_empty() {
            Some(self.parents().await?)
        } else {
            None
        };
        let parent_slice = match (stream.is_entity_scoped(), &parents) {
            (true, Some(parents)) => Some(parents.as_slice()),
            (true, None) => Some(&[][..]),
            (false, _) => None,
        };

        let fetcher = ReportFetcher::new(&self.client, stream, self.config.page_size);
        let normalizer = ResponseNormalizer::new(stream);
        let mut tracker = WatermarkTracker::new(stream.cursor_field, stored_value);
        let mut records = 0usize;

        for slice in scheduler.slices(parent_slice, stored_value)? {
            debug!("Fetching {} {}", stream.name, slice.label());

            let pages = fetcher.fetch_pages(&slice);
            pin_mut!(pages);

            while let Some(fetched) = pages.try_next().await? {
                self.stats.add_page();
                if fetched.is_suppressed() {
                    self.stats.add_suppressed();
                }

                let rows = fetched.into_rows();
                for record in normalizer.normalize(&rows, &slice) {
                    tracker.observe(&record);
                    sink.emit(Message::record(stream.name, record))?;
                    records += 1;
                }
            }

            self.stats.add_slice();
        }
        self.stats.add_records(records);

        if let Some(watermark) = tracker.into_watermark() {
            let data = json!({
                "cursor_field": watermark.cursor_field,
                "cursor": watermark.value,
            });
            self.state.set_watermark(stream.name, watermark).await?;
            sink.emit(Message::state(stream.name, data))?;
        }
        sink.flush()?;

        self.stats.add_stream();
        info!(
            "Completed sync for {}: {records} records in {}ms",
            stream.name,
            start.elapsed().as_millis()
        );
        Ok(())
    }

    /// Sync the `campaigns` dimension stream into `sink`
    ///
    /// Every campaign is listed through `campaigns/find`, deleted ones
    /// included, and emitted as returned. No state is kept. When report
    /// parents are listed the same way, the listing also seeds them.
    pub async fn sync_campaigns(&mut self, sink: &mut dyn MessageSink) -> Result<()> {
        let start = Instant::now();
        info!("Starting sync for stream: {CAMPAIGNS_STREAM}");

        let listing = ParentListing::Find {
            limit: self.config.parent_listing.limit(),
        };
        let campaigns = ParentEnumerator::new(&self.client, listing)
            .list_campaigns()
            .await?;

        let records = campaigns.len();
        let mut parents = Vec::with_capacity(records);
        for campaign in campaigns {
            parents.push(campaign.parent);
            sink.emit(Message::record(CAMPAIGNS_STREAM, campaign.record))?;
        }
        sink.flush()?;

        if self.parents.is_none() && self.config.parent_listing == listing {
            self.parents = Some(Arc::new(parents));
        }

        self.stats.add_records(records);
        self.stats.add_stream();
        info!(
            "Completed sync for {CAMPAIGNS_STREAM}: {records} records in {}ms",
            start.elapsed().as_millis()
        );
        Ok(())
    }

    /// Sync `streams` in order, stopping at the first failure
    pub async fn sync(
        &mut self,
        streams: &[SourceStream],
        sink: &mut dyn MessageSink,
    ) -> Result<SyncStats> {
        let start = Instant::now();

        for stream in streams {
            match stream {
                SourceStream::Campaigns => self.sync_campaigns(sink).await?,
                SourceStream::Report(report) => self.sync_stream(report, sink).await?,
            }
        }

        #[allow(clippy::cast_possible_truncation)]
        self.stats.set_duration(start.elapsed().as_millis() as u64);
        Ok(self.stats.clone())
    }
}
