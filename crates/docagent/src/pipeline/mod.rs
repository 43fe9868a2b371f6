pub mod action;
pub mod config;
pub mod executor;
pub mod invoice;
pub mod outcome;
pub mod progress;
pub mod runner;

pub use action::Action;
pub use config::PipelineConfig;
pub use executor::ActionExecutor;
pub use outcome::{ActionOutcome, IngestOutcome, IngestReport, LoopOutcome};
pub use progress::{BroadcastProgress, NoopProgress, ProgressEvent, ProgressReporter};
pub use runner::Agent;
