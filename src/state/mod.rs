//! State management module
//!
//! The only state kept between runs is one watermark per stream: the
//! highest cursor value (a `YYYY-MM-DD` date) seen in its records.
//!
//! # Overview
//!
//! - [`State`] - watermarks keyed by stream name
//! - [`StateManager`] - file-backed or in-memory persistence
//! - [`WatermarkTracker`] - fold over emitted records

mod manager;
mod types;
mod watermark;

pub use manager::StateManager;
pub use types::{State, StreamState};
pub use watermark::{advance, Watermark, WatermarkTracker};

#[cfg(test)]
mod manager_tests;
