pub mod markers;
pub mod state;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use state::{ExtractedFields, ProcessingState};

/// Structured output of an extraction capability.
pub type FieldMap = serde_json::Map<String, serde_json::Value>;

/// Classification tag of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    Invoice,
    Resume,
    ResearchPaper,
    LegalDoc,
    AudioNote,
    ImagePendingOcr,
    Other,
}

impl DocumentType {
    pub const ALL: [DocumentType; 7] = [
        DocumentType::Invoice,
        DocumentType::Resume,
        DocumentType::ResearchPaper,
        DocumentType::LegalDoc,
        DocumentType::AudioNote,
        DocumentType::ImagePendingOcr,
        DocumentType::Other,
    ];

    pub fn as_label(&self) -> &'static str {
        match self {
            Self::Invoice => "INVOICE",
            Self::Resume => "RESUME",
            Self::ResearchPaper => "RESEARCH_PAPER",
            Self::LegalDoc => "LEGAL_DOC",
            Self::AudioNote => "AUDIO_NOTE",
            Self::ImagePendingOcr => "IMAGE_PENDING_OCR",
            Self::Other => "OTHER",
        }
    }

    /// Parses a wire label. Unknown labels map to `Other`, never an error.
    pub fn from_label(label: &str) -> Self {
        let normalized = label
            .trim()
            .trim_matches(|c: char| c == '"' || c == '\'' || c == '`' || c == '.')
            .to_ascii_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_label() == normalized)
            .unwrap_or(Self::Other)
    }

    /// Extraction that fills the slot for this type.
    ///
    /// Images have no slot of their own: they are re-classified after vision analysis.
    pub fn extraction_kind(&self) -> Option<ExtractionKind> {
        match self {
            Self::Invoice => Some(ExtractionKind::Invoice),
            Self::Resume => Some(ExtractionKind::Resume),
            Self::ResearchPaper => Some(ExtractionKind::ResearchPaper),
            Self::LegalDoc => Some(ExtractionKind::LegalDoc),
            Self::AudioNote => Some(ExtractionKind::AudioNote),
            Self::ImagePendingOcr => None,
            Self::Other => Some(ExtractionKind::Unknown),
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// One kind of structured extraction, each with its own slot in the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionKind {
    Invoice,
    Resume,
    ResearchPaper,
    LegalDoc,
    AudioNote,
    Unknown,
}

impl ExtractionKind {
    pub const ALL: [ExtractionKind; 6] = [
        ExtractionKind::Invoice,
        ExtractionKind::Resume,
        ExtractionKind::ResearchPaper,
        ExtractionKind::LegalDoc,
        ExtractionKind::AudioNote,
        ExtractionKind::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::Resume => "resume",
            Self::ResearchPaper => "research_paper",
            Self::LegalDoc => "legal_doc",
            Self::AudioNote => "audio_note",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ExtractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_roundtrip_for_every_type() {
        for t in DocumentType::ALL {
            assert_eq!(DocumentType::from_label(t.as_label()), t);
        }
    }

    #[test]
    fn test_from_label_is_lenient() {
        assert_eq!(DocumentType::from_label("  invoice\n"), DocumentType::Invoice);
        assert_eq!(DocumentType::from_label("\"RESUME\""), DocumentType::Resume);
        assert_eq!(DocumentType::from_label("RESEARCH_PAPER."), DocumentType::ResearchPaper);
    }

    #[test]
    fn test_unrecognized_label_degrades_to_other() {
        assert_eq!(DocumentType::from_label("RECIPE"), DocumentType::Other);
        assert_eq!(DocumentType::from_label(""), DocumentType::Other);
    }

    #[test]
    fn test_serde_uses_wire_labels() {
        let json = serde_json::to_string(&DocumentType::ImagePendingOcr).unwrap();
        assert_eq!(json, "\"IMAGE_PENDING_OCR\"");
    }

    #[test]
    fn test_extraction_kind_mapping() {
        assert_eq!(
            DocumentType::Other.extraction_kind(),
            Some(ExtractionKind::Unknown)
        );
        assert_eq!(DocumentType::ImagePendingOcr.extraction_kind(), None);
        assert_eq!(
            DocumentType::LegalDoc.extraction_kind(),
            Some(ExtractionKind::LegalDoc)
        );
    }
}
