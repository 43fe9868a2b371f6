use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::secrets::{self, SecretError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    /// SQLite file; defaults to `~/.docagent/data/docagent.db`.
    #[serde(default)]
    pub database_path: Option<String>,
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub agent: AgentConfig,
}

fn default_worker_count() -> usize {
    num_cpus::get()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            database_path: None,
            worker_count: default_worker_count(),
            llm: LlmConfig::default(),
            agent: AgentConfig::default(),
        }
    }
}

impl Config {
    /// Resolved database location, with `~` expanded.
    pub fn database_path(&self) -> Option<PathBuf> {
        match &self.database_path {
            Some(path) => Some(PathBuf::from(secrets::expand_home(path))),
            None => crate::db::default_db_path(),
        }
    }

    /// Applies overrides from the process environment.
    ///
    /// `MODEL_NAME` replaces the chat model.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(model) = std::env::var("MODEL_NAME") {
            let model = model.trim();
            if !model.is_empty() {
                self.llm.model = model.to_string();
            }
        }
    }
}

/// OpenAI-compatible provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_vision_model")]
    pub vision_model: String,
    #[serde(default = "default_transcription_model")]
    pub transcription_model: String,
    /// Inline key. Prefer `api_key_env` or `api_key_file`.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_key_file: Option<String>,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: Option<String>,
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub temperature: f32,
}

fn default_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_vision_model() -> String {
    "meta-llama/llama-4-scout-17b-16e-instruct".to_string()
}

fn default_transcription_model() -> String {
    "whisper-large-v3".to_string()
}

fn default_api_key_env() -> Option<String> {
    Some("GROQ_API_KEY".to_string())
}

fn default_llm_timeout() -> u64 {
    60
}

fn default_max_tokens() -> u32 {
    1024
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            vision_model: default_vision_model(),
            transcription_model: default_transcription_model(),
            api_key: None,
            api_key_file: None,
            api_key_env: default_api_key_env(),
            timeout_secs: default_llm_timeout(),
            max_tokens: default_max_tokens(),
            temperature: 0.0,
        }
    }
}

impl LlmConfig {
    pub fn resolve_api_key(&self) -> Result<secrecy::SecretString, SecretError> {
        secrets::resolve_secret(
            self.api_key.as_deref(),
            self.api_key_file.as_deref(),
            self.api_key_env.as_deref(),
        )
    }

    pub fn has_api_key_source(&self) -> bool {
        secrets::has_secret_source(
            self.api_key.as_deref(),
            self.api_key_file.as_deref(),
            self.api_key_env.as_deref(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OracleKind {
    #[default]
    Llm,
    Rules,
}

/// Decision loop tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    /// Characters of content shown to the oracle.
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
    /// Characters of content sent to the classifier.
    #[serde(default = "default_classify_chars")]
    pub classify_chars: usize,
    /// Characters of content sent to extractors.
    #[serde(default = "default_extract_chars")]
    pub extract_chars: usize,
    /// Pause between turns.
    #[serde(default)]
    pub step_delay_ms: u64,
    #[serde(default)]
    pub oracle: OracleKind,
}

fn default_max_steps() -> usize {
    8
}

fn default_preview_chars() -> usize {
    500
}

fn default_classify_chars() -> usize {
    1000
}

fn default_extract_chars() -> usize {
    3000
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            preview_chars: default_preview_chars(),
            classify_chars: default_classify_chars(),
            extract_chars: default_extract_chars(),
            step_delay_ms: 0,
            oracle: OracleKind::default(),
        }
    }
}

/// Input file kinds the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Text,
    Pdf,
    Image,
    Audio,
}

impl DocumentFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" | "text" | "md" => Some(Self::Text),
            "png" | "jpg" | "jpeg" | "gif" | "webp" => Some(Self::Image),
            "mp3" | "wav" | "m4a" | "ogg" | "flac" | "webm" => Some(Self::Audio),
            _ => None,
        }
    }

    /// Falls back to the MIME type guessed from the path.
    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        if let Some(format) = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
        {
            return Some(format);
        }

        let mime = mime_guess::from_path(path).first()?;
        match mime.type_().as_str() {
            "text" => Some(Self::Text),
            "image" => Some(Self::Image),
            "audio" => Some(Self::Audio),
            "application" if mime.subtype() == "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }
}
