//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::SourceConfig;
use crate::connector::{check_connection, CheckResult};
use crate::engine::SyncEngine;
use crate::error::{Error, Result, ResultExt};
use crate::output::JsonLinesWriter;
use crate::state::StateManager;
use crate::streams::{select_streams, StreamInfo, ALL_STREAMS};
use crate::types::SyncMode;
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::io;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Check => self.check().await,
            Commands::Streams => self.streams(),
            Commands::Read {
                streams,
                today,
                full_refresh,
            } => self.read(streams, *today, *full_refresh).await,
        }
    }

    /// Load configuration, inline JSON first
    fn load_config(&self) -> Result<SourceConfig> {
        if let Some(json_str) = &self.cli.config_json {
            return SourceConfig::from_json_str(json_str);
        }

        match &self.cli.config {
            Some(path) => SourceConfig::from_file(path),
            None => Err(Error::config(
                "Config not specified (use --config or --config-json)",
            )),
        }
    }

    /// Load state, inline JSON first
    fn load_state(&self) -> Result<StateManager> {
        if let Some(state_json) = &self.cli.state_json {
            StateManager::from_json(state_json)
        } else if let Some(path) = &self.cli.state {
            StateManager::from_file(path)
                .with_context(|| format!("Failed to load state {}", path.display()))
        } else {
            Ok(StateManager::in_memory())
        }
    }

    /// Check connection
    async fn check(&self) -> Result<()> {
        let result = match self.load_config() {
            Ok(config) => check_connection(&config).await,
            Err(e) => CheckResult::failure(e.to_string()),
        };
        self.output_message(&result.to_message());
        Ok(())
    }

    /// List streams
    fn streams(&self) -> Result<()> {
        let streams: Vec<StreamInfo> = ALL_STREAMS.iter().map(StreamInfo::from).collect();
        self.output_message(&json!({
            "type": "STREAMS",
            "streams": streams
        }));
        Ok(())
    }

    /// Read streams, writing messages to stdout
    async fn read(
        &self,
        stream_names: &[String],
        today: Option<NaiveDate>,
        full_refresh: bool,
    ) -> Result<()> {
        let config = self.load_config()?;
        let streams = select_streams(stream_names)?;
        let state = self.load_state()?;

        let mut sync_config = config.sync_config()?;
        if let Some(today) = today {
            sync_config = sync_config.with_today(today);
        }
        if full_refresh {
            sync_config = sync_config.with_sync_mode(SyncMode::FullRefresh);
        }

        let mut engine = SyncEngine::new(config.build_client()?, state, sync_config);
        let mut writer = JsonLinesWriter::new(io::stdout().lock()).with_pretty(self.cli.pretty);

        let stats = engine.sync(&streams, &mut writer).await?;
        info!(
            "Read complete: {} messages, {} records from {} streams ({} slices, {} suppressed) in {}ms",
            writer.written(),
            stats.records_synced,
            stats.streams_synced,
            stats.slices_synced,
            stats.slices_suppressed,
            stats.duration_ms
        );
        Ok(())
    }

    /// Output a JSON message on stdout
    fn output_message(&self, msg: &Value) {
        if self.cli.pretty {
            println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
        } else {
            println!("{}", serde_json::to_string(msg).unwrap_or_default());
        }
    }
}
