//! Capabilities backed by an [`LlmClient`].

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use super::{prompts, Classifier, Extractor, Transcriber, VisionAnalyzer};
use crate::config::{AgentConfig, LlmConfig};
use crate::document::{DocumentType, ExtractionKind, FieldMap};
use crate::error::CapabilityError;
use crate::llm::prompt::{parse_json_object, sanitize_for_prompt};
use crate::llm::{ChatRequest, ImageInput, LlmClient};
use crate::sanitize::preview;

pub struct LlmToolkit {
    client: Arc<dyn LlmClient>,
    vision_model: String,
    classify_chars: usize,
    extract_chars: usize,
}

impl LlmToolkit {
    pub fn new(client: Arc<dyn LlmClient>, llm: &LlmConfig, agent: &AgentConfig) -> Self {
        Self {
            client,
            vision_model: llm.vision_model.clone(),
            classify_chars: agent.classify_chars,
            extract_chars: agent.extract_chars,
        }
    }
}

/// Maps free-form classifier output onto a document type.
///
/// The model sometimes decorates its answer ("Category: RESEARCH PAPER."),
/// so keywords are matched anywhere in the reply. The image type is never
/// a classifier answer: it comes from the content markers alone.
pub fn parse_classification(raw: &str) -> DocumentType {
    let upper = raw.to_ascii_uppercase();
    if upper.contains("INVOICE") {
        DocumentType::Invoice
    } else if upper.contains("RESUME") {
        DocumentType::Resume
    } else if upper.contains("RESEARCH") {
        DocumentType::ResearchPaper
    } else if upper.contains("LEGAL") {
        DocumentType::LegalDoc
    } else {
        match DocumentType::from_label(&upper) {
            DocumentType::ImagePendingOcr => DocumentType::Other,
            document_type => document_type,
        }
    }
}

#[async_trait]
impl Classifier for LlmToolkit {
    async fn classify(&self, text: &str) -> DocumentType {
        let prompt = prompts::classify(&sanitize_for_prompt(preview(text, self.classify_chars)));
        match self.client.complete(ChatRequest::new(prompt)).await {
            Ok(raw) => {
                let document_type = parse_classification(&raw);
                debug!(raw = raw.trim(), %document_type, "Classifier replied");
                document_type
            }
            Err(e) => {
                warn!(error = %e, "Classification failed, defaulting to OTHER");
                DocumentType::Other
            }
        }
    }
}

#[async_trait]
impl Extractor for LlmToolkit {
    async fn extract(&self, kind: ExtractionKind, text: &str) -> FieldMap {
        let prompt = prompts::extract(kind, &sanitize_for_prompt(preview(text, self.extract_chars)));
        let request = ChatRequest::new(prompt)
            .with_system(prompts::JSON_ONLY_SYSTEM)
            .json();

        let raw = match self.client.complete(request).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(%kind, error = %e, "Extraction request failed");
                return FieldMap::new();
            }
        };

        match parse_json_object(&raw) {
            Ok(fields) => fields,
            Err(reason) => {
                warn!(%kind, %reason, "Extraction returned unusable output");
                FieldMap::new()
            }
        }
    }
}

#[async_trait]
impl VisionAnalyzer for LlmToolkit {
    async fn analyze(&self, image_base64: &str) -> Result<String, CapabilityError> {
        let request = ChatRequest::new(prompts::VISION)
            .with_image(ImageInput::from_base64(image_base64))
            .with_model(self.vision_model.clone());
        let text = self.client.complete(request).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(CapabilityError::EmptyResult("vision analysis".to_string()));
        }
        Ok(text.to_string())
    }
}

#[async_trait]
impl Transcriber for LlmToolkit {
    async fn transcribe(&self, audio: &[u8], filename: &str) -> Result<String, CapabilityError> {
        let text = self.client.transcribe(audio, filename).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(CapabilityError::EmptyResult("transcription".to_string()));
        }
        Ok(text.to_string())
    }
}
