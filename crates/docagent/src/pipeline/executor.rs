//! Maps one action onto the capability set and the state.
//!
//! Side effects are confined to the document type, a single extraction
//! slot, or the content (image and audio only). History and fingerprint
//! belong to the loop and are never touched here.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::action::Action;
use super::invoice::apply_computed_totals;
use super::outcome::ActionOutcome;
use crate::capability::Toolkit;
use crate::db::store::DocumentStore;
use crate::document::markers;
use crate::document::{DocumentType, ExtractionKind, FieldMap, ProcessingState};

pub struct ActionExecutor {
    toolkit: Toolkit,
    store: Arc<dyn DocumentStore>,
}

impl ActionExecutor {
    pub fn new(toolkit: Toolkit, store: Arc<dyn DocumentStore>) -> Self {
        Self { toolkit, store }
    }

    pub async fn execute(&self, action: &Action, state: &mut ProcessingState) -> ActionOutcome {
        match action {
            Action::ClassifyDocument => {
                let document_type = self.classify(&state.content).await;
                state.set_document_type(document_type);
                ActionOutcome::Classified(document_type)
            }
            Action::AnalyzeImage => self.analyze_image(state).await,
            Action::Extract(kind) => self.extract(*kind, state).await,
            Action::SaveData => self.save(state),
            Action::Stop => ActionOutcome::Done,
            Action::Other(name) => {
                debug!(action = %name, "Ignoring unknown action");
                ActionOutcome::Done
            }
        }
    }

    /// Markers win over the classifier. Only the image delimiters can make
    /// a document `IMAGE_PENDING_OCR`.
    async fn classify(&self, content: &str) -> DocumentType {
        if markers::is_audio_transcript(content) {
            return DocumentType::AudioNote;
        }
        if markers::has_image_payload(content) {
            return DocumentType::ImagePendingOcr;
        }
        match self.toolkit.classifier.classify(content).await {
            DocumentType::ImagePendingOcr => {
                debug!("Classifier returned IMAGE_PENDING_OCR without image data, using OTHER");
                DocumentType::Other
            }
            document_type => document_type,
        }
    }

    async fn analyze_image(&self, state: &mut ProcessingState) -> ActionOutcome {
        let payload = match markers::image_payload(&state.content) {
            Some(p) if !p.is_empty() => p,
            _ => return ActionOutcome::Failed("Error: no embedded image data".to_string()),
        };

        let text = match self.toolkit.vision.analyze(payload).await {
            Ok(text) => text,
            Err(e) => return ActionOutcome::Failed(format!("Error: vision analysis failed: {}", e)),
        };

        debug!(chars = text.chars().count(), "Vision analysis returned text");
        let document_type = self.classify(&text).await;
        state.content = text;
        state.set_document_type(document_type);
        ActionOutcome::ImageAnalyzed(document_type)
    }

    async fn extract(&self, kind: ExtractionKind, state: &mut ProcessingState) -> ActionOutcome {
        let transcript = (kind == ExtractionKind::AudioNote)
            .then(|| markers::strip_audio_marker(&state.content).to_string());
        let input = transcript.as_deref().unwrap_or(&state.content);

        let mut fields = self.toolkit.extractor.extract(kind, input).await;
        if fields.is_empty() {
            return ActionOutcome::Failed(format!("Error: {} extraction returned no data", kind));
        }

        if kind == ExtractionKind::Invoice {
            apply_computed_totals(&mut fields);
        }

        if let Some(transcript) = transcript {
            fields
                .entry("transcript")
                .or_insert_with(|| Value::String(transcript.clone()));
            state.content = transcript;
        }

        state.extracted.set(kind, fields);
        ActionOutcome::Extracted(kind)
    }

    fn save(&self, state: &ProcessingState) -> ActionOutcome {
        let document_type = match state.document_type() {
            Some(t) => t,
            None => return ActionOutcome::SaveFailed("Error: document has no type".to_string()),
        };
        let kind = match document_type.extraction_kind() {
            Some(kind) => kind,
            None => {
                return ActionOutcome::SaveFailed(format!(
                    "Error: {} has no record table",
                    document_type
                ))
            }
        };

        let empty = FieldMap::new();
        let fields = state.extracted.get(kind).unwrap_or(&empty);

        let result = self
            .store
            .log_processed(
                state.id(),
                state.filename(),
                document_type.as_label(),
                state.fingerprint(),
            )
            .and_then(|_| self.store.save_record(kind, state.id(), fields));

        match result {
            Ok(()) => {
                info!(doc_id = %state.id(), %document_type, "Saved document record");
                ActionOutcome::Saved
            }
            Err(e) => {
                warn!(doc_id = %state.id(), error = %e, "Failed to save document record");
                ActionOutcome::SaveFailed(format!("DB Error: {}", e))
            }
        }
    }
}
