// Allow common clippy pedantic lints
#![allow(clippy::must_use_candidate)]

//! Search Ads source CLI
//!
//! Reads Apple Search Ads reports and writes JSON lines to stdout

use anyhow::Context;
use clap::Parser;
use searchads_source::cli::{Cli, Runner};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr, stdout carries only messages
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Runner::new(cli).run().await.context("searchads-source failed")?;
    Ok(())
}
