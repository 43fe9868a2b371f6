//! Client for OpenAI-compatible HTTP APIs (Groq by default).
//!
//! Chat completions go to `{base_url}/chat/completions`, audio to
//! `{base_url}/audio/transcriptions`. Transient failures are retried with
//! exponential backoff; everything else surfaces as [`LlmError`].

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{is_retryable_status, ChatRequest, LlmClient, LlmError};
use crate::config::LlmConfig;

/// Maximum number of retries for transient errors
const MAX_RETRIES: u32 = 3;

/// Initial backoff delay for retries
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Upper bound on a server-requested Retry-After wait
const MAX_RETRY_AFTER_SECS: u64 = 30;

pub struct OpenAiCompatClient {
    http: Client,
    base_url: String,
    api_key: SecretString,
    model: String,
    transcription_model: String,
    max_tokens: u32,
    temperature: f32,
    initial_backoff: Duration,
}

impl OpenAiCompatClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = config
            .resolve_api_key()
            .map_err(|e| LlmError::MissingApiKey(e.to_string()))?;
        Self::new(config, api_key)
    }

    /// Builds a client with an explicit key, bypassing key resolution.
    pub fn new(config: &LlmConfig, api_key: SecretString) -> Result<Self, LlmError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(LlmError::Network)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            transcription_model: config.transcription_model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            initial_backoff: Duration::from_millis(INITIAL_BACKOFF_MS),
        })
    }

    /// Shortens retry waits; used by tests against a local server.
    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    fn build_chat_body(&self, request: &ChatRequest) -> serde_json::Value {
        let mut messages = Vec::new();
        if let Some(system) = &request.system {
            messages.push(serde_json::json!({ "role": "system", "content": system }));
        }

        let user_content = match &request.image {
            Some(image) => serde_json::json!([
                { "type": "text", "text": request.user },
                { "type": "image_url", "image_url": { "url": image.data_url() } },
            ]),
            None => serde_json::json!(request.user),
        };
        messages.push(serde_json::json!({ "role": "user", "content": user_content }));

        let mut body = serde_json::json!({
            "model": request.model.as_deref().unwrap_or(&self.model),
            "messages": messages,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        if request.json_mode {
            body["response_format"] = serde_json::json!({ "type": "json_object" });
        }

        body
    }

    /// Sends a request, retrying transient failures.
    ///
    /// `build` is called once per attempt because multipart bodies cannot be cloned.
    async fn send_with_retry<F>(&self, operation: &str, build: F) -> Result<Response, LlmError>
    where
        F: Fn() -> Result<RequestBuilder, LlmError>,
    {
        let mut last_error = None;
        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let backoff = match &last_error {
                    Some(LlmError::RateLimited { retry_after }) => *retry_after,
                    _ => self.initial_backoff * 2u32.pow(attempt - 1),
                };
                warn!(
                    operation,
                    attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    "Retrying after transient error"
                );
                tokio::time::sleep(backoff).await;
            }

            let response = match build()?
                .bearer_auth(self.api_key.expose_secret())
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    debug!(operation, attempt, error = %e, "Network error");
                    last_error = Some(LlmError::Network(e));
                    continue;
                }
            };

            let status = response.status().as_u16();
            if response.status().is_success() {
                return Ok(response);
            }

            if status == 429 {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(1)
                    .min(MAX_RETRY_AFTER_SECS);
                debug!(operation, attempt, retry_after, "Rate limited");
                last_error = Some(LlmError::RateLimited {
                    retry_after: Duration::from_secs(retry_after),
                });
                continue;
            }

            let message = response.text().await.unwrap_or_default();
            if is_retryable_status(status) {
                debug!(operation, attempt, status, "Retryable API error");
                last_error = Some(LlmError::ApiError { status, message });
                continue;
            }

            return Err(LlmError::ApiError { status, message });
        }

        Err(last_error.unwrap_or_else(|| LlmError::InvalidResponse("Max retries exceeded".to_string())))
    }
}

#[async_trait]
impl LlmClient for OpenAiCompatClient {
    async fn complete(&self, request: ChatRequest) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.build_chat_body(&request);
        debug!(model = %body["model"], json_mode = request.json_mode, "Sending chat completion");

        let response = self
            .send_with_retry("chat", || Ok(self.http.post(&url).json(&body)))
            .await?;

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(LlmError::InvalidResponse(
                "completion contained no content".to_string(),
            ));
        }
        Ok(content)
    }

    async fn transcribe(&self, audio: &[u8], filename: &str) -> Result<String, LlmError> {
        let url = format!("{}/audio/transcriptions", self.base_url);
        let mime = mime_guess::from_path(filename)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        debug!(filename, bytes = audio.len(), "Sending transcription");

        let response = self
            .send_with_retry("transcription", || {
                let part = reqwest::multipart::Part::bytes(audio.to_vec())
                    .file_name(filename.to_string())
                    .mime_str(&mime)
                    .map_err(LlmError::Network)?;
                let form = reqwest::multipart::Form::new()
                    .text("model", self.transcription_model.clone())
                    .text("response_format", "json")
                    .part("file", part);
                Ok(self.http.post(&url).multipart(form))
            })
            .await?;

        let parsed: TranscriptionResponse = response.json().await?;
        if parsed.text.trim().is_empty() {
            return Err(LlmError::InvalidResponse(
                "transcription contained no text".to_string(),
            ));
        }
        Ok(parsed.text)
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: String,
}
