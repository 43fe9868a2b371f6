//! LLM provider access.

pub mod error;
pub mod openai;
pub mod prompt;
pub mod types;

use async_trait::async_trait;

pub use error::{is_retryable_status, LlmError};
pub use openai::OpenAiCompatClient;
pub use types::{ChatRequest, ImageInput};

/// Stateless LLM client: every call is an independent single-turn request.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Returns the text of the first completion choice.
    async fn complete(&self, request: ChatRequest) -> Result<String, LlmError>;

    /// Transcribes audio bytes into text.
    async fn transcribe(&self, audio: &[u8], filename: &str) -> Result<String, LlmError>;
}
