pub mod capability;
pub mod cli;
pub mod config;
pub mod db;
pub mod dedup;
pub mod document;
pub mod error;
pub mod llm;
pub mod logging;
pub mod oracle;
pub mod pipeline;
pub mod processor;
pub mod sanitize;
pub mod secrets;
pub mod worker;

pub use capability::{Classifier, Extractor, LlmToolkit, Toolkit, Transcriber, VisionAnalyzer};
pub use config::{load_config, Config, DocumentFormat, OracleKind};
pub use db::{Database, DatabaseError, DocumentStore};
pub use dedup::{fingerprint, Claim, DedupGate};
pub use document::{DocumentType, ExtractionKind, FieldMap, ProcessingState};
pub use error::{CapabilityError, ConfigError, DocAgentError, LoadError, Result, WorkerError};
pub use oracle::{Decision, DecisionOracle, LlmOracle, RuleOracle, StateProjection};
pub use pipeline::{
    Action, ActionExecutor, ActionOutcome, Agent, IngestOutcome, IngestReport, LoopOutcome,
    PipelineConfig,
};
pub use secrets::{resolve_secret, SecretError};
pub use worker::{DirectoryScanner, IngestJob, IngestJobResult, WorkerPool};
