//! Output module
//!
//! Message sinks for the sync engine.
//!
//! # Overview
//!
//! - [`MessageSink`] - where the engine sends records and state
//! - [`JsonLinesWriter`] - one JSON object per line on any `Write`
//! - `Vec<Message>` - collects messages in memory

mod writer;

pub use writer::{JsonLinesWriter, MessageSink};
