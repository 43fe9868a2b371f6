//! API key resolution for the LLM provider.
//!
//! The key can come from three places, checked in this order:
//!
//! 1. **Inline value** in the config file (`llm.api_key`), for quick local runs
//! 2. **Key file** (`llm.api_key_file`), e.g. a Docker secret mount
//! 3. **Environment variable** (`llm.api_key_env`, `GROQ_API_KEY` by default),
//!    which also picks up values loaded from a `.env` file

use secrecy::SecretString;
use std::fs;

/// Error type for API key resolution failures.
#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("No API key source configured (need one of: api_key, api_key_file, api_key_env)")]
    NoSourceProvided,

    #[error("Failed to read API key from file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Environment variable '{name}' not set")]
    EnvVarNotSet { name: String },

    #[error("Environment variable '{name}' contains invalid UTF-8")]
    EnvVarNotUnicode { name: String },

    #[error("API key from {origin} is empty")]
    Empty { origin: String },
}

pub type Result<T> = std::result::Result<T, SecretError>;

/// Resolves the API key from the first configured source.
///
/// A configured source that fails (missing file, unset variable) is an
/// error; later sources are not consulted.
pub fn resolve_secret(
    inline: Option<&str>,
    file_path: Option<&str>,
    env_var: Option<&str>,
) -> Result<SecretString> {
    if let Some(value) = inline.filter(|v| !v.is_empty()) {
        return Ok(SecretString::from(value.to_string()));
    }

    if let Some(path) = file_path.filter(|p| !p.is_empty()) {
        let expanded = expand_home(path);
        let content = fs::read_to_string(&expanded).map_err(|e| SecretError::FileReadError {
            path: expanded.clone(),
            source: e,
        })?;
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(SecretError::Empty { origin: expanded });
        }
        return Ok(SecretString::from(trimmed.to_string()));
    }

    if let Some(name) = env_var.filter(|n| !n.is_empty()) {
        return match std::env::var(name) {
            Ok(value) if value.trim().is_empty() => Err(SecretError::Empty {
                origin: format!("${}", name),
            }),
            Ok(value) => Ok(SecretString::from(value.trim().to_string())),
            Err(std::env::VarError::NotPresent) => Err(SecretError::EnvVarNotSet {
                name: name.to_string(),
            }),
            Err(std::env::VarError::NotUnicode(_)) => Err(SecretError::EnvVarNotUnicode {
                name: name.to_string(),
            }),
        };
    }

    Err(SecretError::NoSourceProvided)
}

/// Checks if at least one key source is configured (non-empty).
pub fn has_secret_source(
    inline: Option<&str>,
    file_path: Option<&str>,
    env_var: Option<&str>,
) -> bool {
    inline.is_some_and(|s| !s.is_empty())
        || file_path.is_some_and(|s| !s.is_empty())
        || env_var.is_some_and(|s| !s.is_empty())
}

/// Expands a leading `~` to the user's home directory (`~user` is not supported).
pub(crate) fn expand_home(path: &str) -> String {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            let home = home.to_string_lossy();
            if path == "~" {
                return home.into_owned();
            }
            return path.replacen('~', &home, 1);
        }
    }
    path.to_string()
}
