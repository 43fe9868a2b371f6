use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocAgentError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Document loading error: {0}")]
    Load(#[from] LoadError),

    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    #[error("Database error: {0}")]
    Database(#[from] crate::db::DatabaseError),

    #[error("LLM error: {0}")]
    Llm(#[from] crate::llm::LlmError),

    #[error("Capability error: {0}")]
    Capability(#[from] CapabilityError),

    #[error("Secret error: {0}")]
    Secret(#[from] crate::secrets::SecretError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to read document '{path}': {source}")]
    ReadDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Document '{path}' is not valid UTF-8 text")]
    InvalidText { path: PathBuf },

    #[error("Failed to process PDF: {0}")]
    PdfProcessing(String),

    #[error("Transcription failed: {0}")]
    Transcription(#[from] CapabilityError),
}

/// Failure of an external capability (vision, transcription). Extraction and
/// classification capabilities never surface errors; they degrade instead.
#[derive(Error, Debug)]
pub enum CapabilityError {
    #[error("LLM request failed: {0}")]
    Llm(#[from] crate::llm::LlmError),

    #[error("Capability returned an empty result: {0}")]
    EmptyResult(String),

    #[error("Capability not available: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Failed to spawn worker: {0}")]
    SpawnFailed(String),

    #[error("Worker channel closed unexpectedly")]
    ChannelClosed,

    #[error("Failed to build async runtime: {0}")]
    Runtime(String),
}

pub type Result<T> = std::result::Result<T, DocAgentError>;
