use serde::Serialize;
use uuid::Uuid;

use super::{DocumentType, ExtractionKind, FieldMap};
use crate::dedup::fingerprint;

/// One optional slot per extraction kind.
///
/// More than one slot may be filled in a single run; nothing enforces
/// that only the slot matching the document type is populated.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractedFields {
    pub invoice: Option<FieldMap>,
    pub resume: Option<FieldMap>,
    pub research_summary: Option<FieldMap>,
    pub legal: Option<FieldMap>,
    pub audio_summary: Option<FieldMap>,
    pub unknown_summary: Option<FieldMap>,
}

impl ExtractedFields {
    fn slot(&self, kind: ExtractionKind) -> &Option<FieldMap> {
        match kind {
            ExtractionKind::Invoice => &self.invoice,
            ExtractionKind::Resume => &self.resume,
            ExtractionKind::ResearchPaper => &self.research_summary,
            ExtractionKind::LegalDoc => &self.legal,
            ExtractionKind::AudioNote => &self.audio_summary,
            ExtractionKind::Unknown => &self.unknown_summary,
        }
    }

    fn slot_mut(&mut self, kind: ExtractionKind) -> &mut Option<FieldMap> {
        match kind {
            ExtractionKind::Invoice => &mut self.invoice,
            ExtractionKind::Resume => &mut self.resume,
            ExtractionKind::ResearchPaper => &mut self.research_summary,
            ExtractionKind::LegalDoc => &mut self.legal,
            ExtractionKind::AudioNote => &mut self.audio_summary,
            ExtractionKind::Unknown => &mut self.unknown_summary,
        }
    }

    pub fn get(&self, kind: ExtractionKind) -> Option<&FieldMap> {
        self.slot(kind).as_ref()
    }

    pub fn has(&self, kind: ExtractionKind) -> bool {
        self.slot(kind).is_some()
    }

    pub fn set(&mut self, kind: ExtractionKind, fields: FieldMap) {
        *self.slot_mut(kind) = Some(fields);
    }
}

/// Mutable record owned by a single ingest run.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingState {
    id: String,
    filename: String,
    fingerprint: String,
    pub content: String,
    document_type: Option<DocumentType>,
    history: Vec<String>,
    pub extracted: ExtractedFields,
}

impl ProcessingState {
    /// Creates state for freshly submitted content, fingerprinting it before
    /// anything can mutate it.
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let fingerprint = fingerprint(&content);
        Self::with_fingerprint(filename, content, fingerprint)
    }

    /// Creates state for content whose fingerprint was already computed at the gate.
    pub fn with_fingerprint(
        filename: impl Into<String>,
        content: impl Into<String>,
        fingerprint: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            filename: filename.into(),
            fingerprint: fingerprint.into(),
            content: content.into(),
            document_type: None,
            history: Vec::new(),
            extracted: ExtractedFields::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn document_type(&self) -> Option<DocumentType> {
        self.document_type
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Appends an executed action name. History is never rewritten.
    pub fn record_action(&mut self, action: impl Into<String>) {
        self.history.push(action.into());
    }

    pub fn has_executed(&self, action: &str) -> bool {
        self.history.iter().any(|a| a == action)
    }

    /// Sets or overwrites the document type. It is never cleared.
    pub fn set_document_type(&mut self, document_type: DocumentType) {
        self.document_type = Some(document_type);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> FieldMap {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_new_state_fingerprints_original_content() {
        let mut state = ProcessingState::new("a.txt", "hello");
        let original = state.fingerprint().to_string();
        assert_eq!(original, fingerprint("hello"));

        state.content = "replaced by vision output".to_string();
        assert_eq!(state.fingerprint(), original);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = ProcessingState::new("a.txt", "same");
        let b = ProcessingState::new("a.txt", "same");
        assert_ne!(a.id(), b.id());
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_history_is_append_only() {
        let mut state = ProcessingState::new("a.txt", "x");
        state.record_action("classify_document");
        state.record_action("extract_invoice");
        assert_eq!(state.history(), ["classify_document", "extract_invoice"]);
        assert!(state.has_executed("extract_invoice"));
        assert!(!state.has_executed("save_data"));
    }

    #[test]
    fn test_slots_are_permissive() {
        let mut extracted = ExtractedFields::default();
        extracted.set(ExtractionKind::Invoice, fields(json!({"vendor": "ACME"})));
        extracted.set(ExtractionKind::Unknown, fields(json!({"summary": "s"})));

        assert!(extracted.has(ExtractionKind::Invoice));
        assert!(extracted.has(ExtractionKind::Unknown));
        assert!(!extracted.has(ExtractionKind::Resume));
        assert_eq!(
            extracted.get(ExtractionKind::Invoice).unwrap()["vendor"],
            "ACME"
        );
    }

    #[test]
    fn test_document_type_overwrite() {
        let mut state = ProcessingState::new("scan.png", "img");
        state.set_document_type(DocumentType::ImagePendingOcr);
        state.set_document_type(DocumentType::Invoice);
        assert_eq!(state.document_type(), Some(DocumentType::Invoice));
    }
}
