//! External capabilities the action executor calls through narrow interfaces.
//!
//! Classification and extraction are total: they degrade to `OTHER` or an
//! empty map instead of failing. Vision and transcription report errors.

pub mod llm;
pub mod prompts;

use async_trait::async_trait;
use std::sync::Arc;

use crate::document::{DocumentType, ExtractionKind, FieldMap};
use crate::error::CapabilityError;

pub use llm::LlmToolkit;

#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classifies text. Never fails; unknown content is `Other`.
    async fn classify(&self, text: &str) -> DocumentType;
}

#[async_trait]
pub trait Extractor: Send + Sync {
    /// Extracts structured fields. Returns an empty map on failure.
    async fn extract(&self, kind: ExtractionKind, text: &str) -> FieldMap;
}

#[async_trait]
pub trait VisionAnalyzer: Send + Sync {
    /// Describes a base64-encoded image, including any text it contains.
    async fn analyze(&self, image_base64: &str) -> Result<String, CapabilityError>;
}

#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: &[u8], filename: &str) -> Result<String, CapabilityError>;
}

/// The capability set handed to the action executor.
#[derive(Clone)]
pub struct Toolkit {
    pub classifier: Arc<dyn Classifier>,
    pub extractor: Arc<dyn Extractor>,
    pub vision: Arc<dyn VisionAnalyzer>,
}

impl Toolkit {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        extractor: Arc<dyn Extractor>,
        vision: Arc<dyn VisionAnalyzer>,
    ) -> Self {
        Self {
            classifier,
            extractor,
            vision,
        }
    }

    /// Uses one LLM-backed implementation for every capability.
    pub fn from_llm(toolkit: Arc<LlmToolkit>) -> Self {
        Self {
            classifier: toolkit.clone(),
            extractor: toolkit.clone(),
            vision: toolkit,
        }
    }
}
