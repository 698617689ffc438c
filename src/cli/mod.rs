//! CLI module
//!
//! Command-line interface for running the source.
//!
//! # Commands
//!
//! - `check` - Verify the credentials by acquiring a token
//! - `streams` - List the report streams
//! - `read` - Extract records and state as JSON lines

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
