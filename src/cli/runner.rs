//! CLI runner - executes commands

use crate::auth::{auth_fields, AuthType};
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::error::{Error, Result};
use crate::pipeline::Pipeline;
use crate::scheduler::{poll_interval, Scheduler};
use crate::source::{load_sources, SourceConfig};
use crate::state::StateManager;
use crate::store::MemoryContentStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

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
            Commands::Test { source } => self.test(source).await,
            Commands::Sync { source } => self.sync(source.as_deref()).await,
            Commands::Schedule => self.schedule().await,
            Commands::AuthFields { auth_type } => self.auth_fields(auth_type),
            Commands::Intervals => self.intervals(),
            Commands::Validate => self.validate(),
        }
    }

    /// Fetch one source and print the outcome
    async fn test(&self, source_id: &str) -> Result<()> {
        let source = self.find_source(source_id)?;
        let pipeline = self.build_pipeline()?;
        let result = pipeline.test_fetch(&source).await?;

        self.output_message(&json!({
            "type": "FETCH",
            "source": source.id,
            "success": result.is_success(),
            "message": result.message(),
            "result": result,
        }));

        Ok(())
    }

    /// Run one cycle per selected source
    async fn sync(&self, source_id: Option<&str>) -> Result<()> {
        let sources = match source_id {
            Some(id) => vec![self.find_source(id)?],
            None => self.load_sources()?,
        };
        let pipeline = self.build_pipeline()?;
        let mut failed = 0usize;

        for source in &sources {
            if !source.mapping.has_title() {
                warn!(source = %source.id, "mapping has no post_title entry; every item will be skipped");
            }

            match pipeline.run_cycle(source).await {
                Ok(report) => self.output_message(&json!({
                    "type": "CYCLE",
                    "cycle": report,
                })),
                Err(e) => {
                    failed += 1;
                    warn!(source = %source.id, error = %e, "cycle failed");
                    self.output_message(&json!({
                        "type": "ERROR",
                        "source": source.id,
                        "message": e.to_string(),
                    }));
                }
            }
        }

        if failed > 0 {
            return Err(Error::config(format!(
                "{failed} of {} sources failed",
                sources.len()
            )));
        }

        Ok(())
    }

    /// Run every source on its interval until Ctrl-C
    async fn schedule(&self) -> Result<()> {
        let sources = self.load_sources()?;
        if sources.is_empty() {
            return Err(Error::config("No sources to schedule"));
        }

        let (tx, mut rx) = mpsc::unbounded_channel();
        let scheduler = Scheduler::new(self.build_pipeline()?).with_reports(tx);

        for source in sources {
            let id = source.id.clone();
            let interval = scheduler.schedule(source).await;
            self.output_message(&json!({
                "type": "SCHEDULED",
                "source": id,
                "interval_secs": interval.as_secs_f64(),
            }));
        }

        loop {
            tokio::select! {
                Some(report) = rx.recv() => {
                    self.output_message(&json!({
                        "type": "CYCLE",
                        "cycle": report,
                    }));
                }
                signal = tokio::signal::ctrl_c() => {
                    signal?;
                    info!("interrupt received, stopping");
                    break;
                }
            }
        }

        scheduler.shutdown().await;
        Ok(())
    }

    /// Describe an auth type's credential fields
    fn auth_fields(&self, auth_type: &str) -> Result<()> {
        let parsed = AuthType::from_discriminator(auth_type);
        if parsed.as_str() != auth_type.trim().to_ascii_lowercase() {
            warn!(auth_type, "unknown auth type, showing fields for 'none'");
        }

        self.output_message(&json!({
            "type": "AUTH_FIELDS",
            "auth_type": parsed.as_str(),
            "fields": auth_fields(parsed),
        }));

        Ok(())
    }

    /// Show each source's polling interval
    fn intervals(&self) -> Result<()> {
        for source in self.load_sources()? {
            let interval = poll_interval(source.requests_per_day);
            self.output_message(&json!({
                "type": "INTERVAL",
                "source": source.id,
                "requests_per_day": source.requests_per_day,
                "interval_secs": interval.as_secs_f64(),
                "rate_limit_wait_seconds": source.rate_limit_wait_seconds,
            }));
        }
        Ok(())
    }

    /// Validate the sources file
    fn validate(&self) -> Result<()> {
        let sources = self.load_sources()?;

        self.output_message(&json!({
            "type": "LOG",
            "log": {
                "level": "INFO",
                "message": format!(
                    "Sources file '{}' is valid with {} sources",
                    self.cli.sources.display(),
                    sources.len()
                )
            }
        }));

        Ok(())
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn load_sources(&self) -> Result<Vec<SourceConfig>> {
        load_sources(&self.cli.sources)
    }

    fn find_source(&self, id: &str) -> Result<SourceConfig> {
        self.load_sources()?
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::config(format!("Source '{id}' not found")))
    }

    fn build_pipeline(&self) -> Result<Pipeline> {
        let state = match &self.cli.state {
            Some(path) => StateManager::from_file(path)?,
            None => StateManager::in_memory(),
        };
        let store = match &self.cli.store {
            Some(path) => MemoryContentStore::from_file(path)?,
            None => MemoryContentStore::in_memory(),
        };
        Pipeline::with_stores(Arc::new(state), Arc::new(store))
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}
