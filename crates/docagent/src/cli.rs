//! Command-line surface of the `docagent` binary.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::{load_config, validate_config, Config, OracleKind};
use crate::error::ConfigError;
use crate::pipeline::{ProgressEvent, ProgressReporter};
use crate::sanitize;

#[derive(Parser, Debug)]
#[command(name = "docagent")]
#[command(author, version, about = "Classify documents, extract structured data, store it in SQLite", long_about = None)]
pub struct Cli {
    /// Path to config file (JSON)
    #[arg(short, long, env = "DOCAGENT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ingest files, or every supported file directly inside a directory
    Ingest {
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Decision oracle to use
        #[arg(long, value_enum)]
        oracle: Option<OracleArg>,

        /// Number of parallel workers
        #[arg(short, long)]
        workers: Option<usize>,

        /// Step budget per document
        #[arg(long)]
        max_steps: Option<usize>,

        /// Print every oracle decision
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show counts and recent records
    Stats {
        /// Number of recent rows per table
        #[arg(short, long, default_value_t = 10)]
        limit: u32,
    },

    /// Create the database and apply migrations
    InitDb,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleArg {
    Llm,
    Rules,
}

impl From<OracleArg> for OracleKind {
    fn from(arg: OracleArg) -> Self {
        match arg {
            OracleArg::Llm => OracleKind::Llm,
            OracleArg::Rules => OracleKind::Rules,
        }
    }
}

impl Cli {
    /// Loads the config file (or defaults), then applies environment and
    /// command-line overrides and re-validates.
    pub fn resolve_config(&self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => Config::default(),
        };
        config.apply_env_overrides();

        if let Command::Ingest {
            oracle,
            workers,
            max_steps,
            ..
        } = &self.command
        {
            if let Some(oracle) = oracle {
                config.agent.oracle = (*oracle).into();
            }
            if let Some(workers) = workers {
                config.worker_count = *workers;
            }
            if let Some(max_steps) = max_steps {
                config.agent.max_steps = *max_steps;
            }
        }

        validate_config(&config)?;
        Ok(config)
    }
}

/// Prints loop progress as plain lines on stdout.
pub struct ConsoleProgress {
    verbose: bool,
}

impl ConsoleProgress {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// The line printed for an event, if any.
    pub fn format(&self, event: &ProgressEvent) -> Option<String> {
        match event {
            ProgressEvent::Started { filename, .. } => Some(format!("==> {}", filename)),
            ProgressEvent::Duplicate {
                filename,
                fingerprint,
            } => Some(format!(
                "==> {}: already ingested ({})",
                filename,
                sanitize::short_hash(fingerprint)
            )),
            ProgressEvent::Step {
                step,
                action,
                reasoning,
            } if self.verbose => Some(format!("  [{}] {}: {}", step, action, reasoning)),
            ProgressEvent::Step { .. } => None,
            ProgressEvent::Classified { document_type } => {
                Some(format!("  classified as {}", document_type))
            }
            ProgressEvent::ActionFailed { action, error } => {
                Some(format!("  {} failed: {}", action, error))
            }
            ProgressEvent::Finished { outcome } => Some(format!("  {}", outcome)),
        }
    }
}

impl ProgressReporter for ConsoleProgress {
    fn report(&self, event: ProgressEvent) {
        if let Some(line) = self.format(&event) {
            println!("{}", line);
        }
    }
}
