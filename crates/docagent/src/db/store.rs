//! Persistence seam used by the dedup gate and the action executor.

use super::{document_repo, record_repo, Database, DatabaseError};
use crate::dedup::Claim;
use crate::document::{ExtractionKind, FieldMap};

/// Durable store for processed documents and their records.
///
/// Implementations must make `claim` a single atomic check-and-insert.
pub trait DocumentStore: Send + Sync {
    fn is_duplicate(&self, fingerprint: &str) -> Result<bool, DatabaseError>;

    fn claim(&self, id: &str, filename: &str, fingerprint: &str) -> Result<Claim, DatabaseError>;

    fn release(&self, id: &str) -> Result<(), DatabaseError>;

    fn log_processed(
        &self,
        id: &str,
        filename: &str,
        doc_type: &str,
        fingerprint: &str,
    ) -> Result<(), DatabaseError>;

    fn save_invoice(&self, id: &str, fields: &FieldMap) -> Result<(), DatabaseError>;
    fn save_resume(&self, id: &str, fields: &FieldMap) -> Result<(), DatabaseError>;
    fn save_research_paper(&self, id: &str, fields: &FieldMap) -> Result<(), DatabaseError>;
    fn save_legal_doc(&self, id: &str, fields: &FieldMap) -> Result<(), DatabaseError>;
    fn save_audio_note(&self, id: &str, fields: &FieldMap) -> Result<(), DatabaseError>;
    fn save_unknown(&self, id: &str, fields: &FieldMap) -> Result<(), DatabaseError>;

    /// Routes a record to the save method for its kind.
    fn save_record(
        &self,
        kind: ExtractionKind,
        id: &str,
        fields: &FieldMap,
    ) -> Result<(), DatabaseError> {
        match kind {
            ExtractionKind::Invoice => self.save_invoice(id, fields),
            ExtractionKind::Resume => self.save_resume(id, fields),
            ExtractionKind::ResearchPaper => self.save_research_paper(id, fields),
            ExtractionKind::LegalDoc => self.save_legal_doc(id, fields),
            ExtractionKind::AudioNote => self.save_audio_note(id, fields),
            ExtractionKind::Unknown => self.save_unknown(id, fields),
        }
    }
}

impl DocumentStore for Database {
    fn is_duplicate(&self, fingerprint: &str) -> Result<bool, DatabaseError> {
        document_repo::is_duplicate(self, fingerprint)
    }

    fn claim(&self, id: &str, filename: &str, fingerprint: &str) -> Result<Claim, DatabaseError> {
        document_repo::claim(self, id, filename, fingerprint)
    }

    fn release(&self, id: &str) -> Result<(), DatabaseError> {
        document_repo::release(self, id)
    }

    fn log_processed(
        &self,
        id: &str,
        filename: &str,
        doc_type: &str,
        fingerprint: &str,
    ) -> Result<(), DatabaseError> {
        document_repo::log_processed(self, id, filename, doc_type, fingerprint)
    }

    fn save_invoice(&self, id: &str, fields: &FieldMap) -> Result<(), DatabaseError> {
        record_repo::save_invoice(self, id, fields)
    }

    fn save_resume(&self, id: &str, fields: &FieldMap) -> Result<(), DatabaseError> {
        record_repo::save_resume(self, id, fields)
    }

    fn save_research_paper(&self, id: &str, fields: &FieldMap) -> Result<(), DatabaseError> {
        record_repo::save_research_paper(self, id, fields)
    }

    fn save_legal_doc(&self, id: &str, fields: &FieldMap) -> Result<(), DatabaseError> {
        record_repo::save_legal_doc(self, id, fields)
    }

    fn save_audio_note(&self, id: &str, fields: &FieldMap) -> Result<(), DatabaseError> {
        record_repo::save_audio_note(self, id, fields)
    }

    fn save_unknown(&self, id: &str, fields: &FieldMap) -> Result<(), DatabaseError> {
        record_repo::save_unknown(self, id, fields)
    }
}
