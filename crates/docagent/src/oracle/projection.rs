use serde::Serialize;

use crate::document::{DocumentType, ExtractionKind, ProcessingState};
use crate::sanitize::preview;

/// Sentinel sent in place of a document type before classification.
pub const MISSING_TYPE: &str = "MISSING";

/// Compact view of the state shown to the oracle.
///
/// Holds a bounded content preview and presence flags instead of the
/// extracted payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateProjection {
    pub filename: String,
    #[serde(rename = "type")]
    pub document_type: String,
    pub history: Vec<String>,
    pub content_preview: String,
    pub has_invoice_data: bool,
    pub has_resume_score: bool,
    pub has_research_summary: bool,
    pub has_legal_data: bool,
    pub has_audio_summary: bool,
    pub has_unknown_summary: bool,
}

impl StateProjection {
    pub fn from_state(state: &ProcessingState, preview_chars: usize) -> Self {
        let extracted = &state.extracted;
        Self {
            filename: state.filename().to_string(),
            document_type: state
                .document_type()
                .map(|t| t.as_label().to_string())
                .unwrap_or_else(|| MISSING_TYPE.to_string()),
            history: state.history().to_vec(),
            content_preview: preview(&state.content, preview_chars).to_string(),
            has_invoice_data: extracted.has(ExtractionKind::Invoice),
            has_resume_score: extracted.has(ExtractionKind::Resume),
            has_research_summary: extracted.has(ExtractionKind::ResearchPaper),
            has_legal_data: extracted.has(ExtractionKind::LegalDoc),
            has_audio_summary: extracted.has(ExtractionKind::AudioNote),
            has_unknown_summary: extracted.has(ExtractionKind::Unknown),
        }
    }

    /// The classified type, or `None` for the missing sentinel.
    /// Unrecognized labels read as `Other`.
    pub fn classified_type(&self) -> Option<DocumentType> {
        if self.document_type == MISSING_TYPE {
            None
        } else {
            Some(DocumentType::from_label(&self.document_type))
        }
    }

    pub fn has_data(&self, kind: ExtractionKind) -> bool {
        match kind {
            ExtractionKind::Invoice => self.has_invoice_data,
            ExtractionKind::Resume => self.has_resume_score,
            ExtractionKind::ResearchPaper => self.has_research_summary,
            ExtractionKind::LegalDoc => self.has_legal_data,
            ExtractionKind::AudioNote => self.has_audio_summary,
            ExtractionKind::Unknown => self.has_unknown_summary,
        }
    }
}
