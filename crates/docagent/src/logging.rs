//! Process-wide tracing setup for the CLI.
//!
//! Filter comes from `RUST_LOG` and defaults to `info`. Records emitted
//! through the `log` macros (database layer) are forwarded into tracing.

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to install log bridge: {0}")]
    LogBridge(#[from] log::SetLoggerError),

    #[error("Failed to install tracing subscriber: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Installs the global subscriber. Output goes to stderr so stdout stays
/// free for command output. `json` switches to one JSON object per line.
pub fn init(json: bool) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().with_writer(std::io::stderr).json()))
        .with((!json).then(|| fmt::layer().with_writer(std::io::stderr).compact()));

    tracing_log::LogTracer::init()?;
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
