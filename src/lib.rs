// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # Search Ads Source
//!
//! Incremental extraction of Apple Search Ads daily reports.
//!
//! ## Features
//!
//! - **Client-credentials auth**: ES256 client assertion exchanged once per run
//! - **Day slicing**: One slice per day, per campaign for entity-scoped reports
//! - **Offset pagination**: Driven by `pagination.totalResults`
//! - **Flat records**: Nested metadata and metrics flattened with `_`
//! - **Incremental sync**: Per-stream watermark committed after each stream
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use searchads_source::config::SourceConfig;
//! use searchads_source::engine::{Message, SyncEngine};
//! use searchads_source::state::StateManager;
//! use searchads_source::streams::select_streams;
//!
//! #[tokio::main]
//! async fn main() -> searchads_source::Result<()> {
//!     let config = SourceConfig::from_file("config.json")?;
//!     let state = StateManager::from_file("state.json")?;
//!
//!     let mut engine = SyncEngine::new(config.build_client()?, state, config.sync_config()?);
//!     let mut messages: Vec<Message> = Vec::new();
//!     engine.sync(&select_streams(&[])?, &mut messages).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//!  SourceConfig ──► TokenProvider ──► HttpClient
//!                                        │
//!  StateManager ──► SyncEngine ──────────┤
//!       ▲              │                 │
//!       │              ├─ ParentEnumerator (campaigns, once per run)
//!       │              ├─ SliceScheduler   (watermark .. today, per day)
//!       │              ├─ ReportFetcher    (request builder + offset pages)
//!       │              ├─ ResponseNormalizer (rows → flat records)
//!       │              └─ WatermarkTracker (max startTime)
//!       │                     │
//!       └──── commit ◄────────┴──► MessageSink (RECORD / STATE lines)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)] // TODO: Document error variant fields and lift this before 1.0

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the source
pub mod error;

/// Common types and type aliases
pub mod types;

/// Client-credentials token provider
pub mod auth;

/// HTTP client
pub mod http;

/// Offset pagination
pub mod pagination;

/// Day slices and parent entities
pub mod partition;

/// Report response classification and normalization
pub mod decode;

/// Watermarks and state persistence
pub mod state;

/// Message sinks
pub mod output;

/// Main execution engine
pub mod engine;

/// Source configuration
pub mod config;

/// Connection check
pub mod connector;

/// Report request bodies
pub mod request;

/// Built-in report and campaign streams
pub mod streams;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::SourceConfig;
pub use engine::{Message, SyncEngine};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
