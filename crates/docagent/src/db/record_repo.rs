//! Per-type record tables: one insert function per document type.
//!
//! Every function normalizes the raw extraction map before writing and
//! refuses to write for a document id that was never registered.

use rusqlite::params;
use serde_json::Value;

use super::document_repo::ensure_registered;
use super::normalize::{normalize_date, parse_amount, parse_score, string_list, text_field};
use super::{Database, DatabaseError};
use crate::document::FieldMap;

pub const UNKNOWN_CANDIDATE: &str = "Unknown Candidate";
pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const NO_SUMMARY: &str = "No summary available.";
pub const NEUTRAL_SENTIMENT: &str = "Neutral";

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceRecord {
    pub vendor: Option<String>,
    pub inv_date: Option<String>,
    pub total_amount: f64,
    pub raw_data: String,
}

impl InvoiceRecord {
    pub fn from_fields(fields: &FieldMap) -> Result<Self, DatabaseError> {
        Ok(Self {
            vendor: text_field(fields, &["vendor"]),
            inv_date: normalize_date(fields.get("date")),
            total_amount: parse_amount(fields.get("total_amount")).unwrap_or(0.0),
            raw_data: serde_json::to_string(fields)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResumeRecord {
    pub candidate_name: String,
    pub score: i64,
    pub skills: Vec<String>,
}

impl ResumeRecord {
    pub fn from_fields(fields: &FieldMap) -> Self {
        Self {
            candidate_name: text_field(fields, &["name", "candidate_name"])
                .unwrap_or_else(|| UNKNOWN_CANDIDATE.to_string()),
            score: parse_score(fields.get("score")),
            skills: string_list(fields.get("skills")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResearchPaperRecord {
    pub title: String,
    pub summary: String,
}

impl ResearchPaperRecord {
    pub fn from_fields(fields: &FieldMap) -> Self {
        Self {
            title: text_field(fields, &["title"]).unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            summary: text_field(fields, &["summary"]).unwrap_or_else(|| NO_SUMMARY.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegalDocRecord {
    pub document_type: Option<String>,
    pub parties: Vec<String>,
    pub effective_date: Option<String>,
    pub expiration_date: Option<String>,
    pub key_clauses: Value,
    pub summary: String,
}

impl LegalDocRecord {
    pub fn from_fields(fields: &FieldMap) -> Self {
        Self {
            document_type: text_field(fields, &["document_type", "type"]),
            parties: string_list(fields.get("parties")),
            effective_date: normalize_date(fields.get("effective_date")),
            expiration_date: normalize_date(fields.get("expiration_date")),
            key_clauses: fields
                .get("key_clauses")
                .filter(|v| !v.is_null())
                .cloned()
                .unwrap_or_else(|| Value::Array(Vec::new())),
            summary: text_field(fields, &["summary"]).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AudioNoteRecord {
    pub transcript: String,
    pub summary: String,
    pub sentiment: String,
}

impl AudioNoteRecord {
    pub fn from_fields(fields: &FieldMap) -> Self {
        Self {
            transcript: text_field(fields, &["transcript"]).unwrap_or_default(),
            summary: text_field(fields, &["summary"]).unwrap_or_default(),
            sentiment: text_field(fields, &["sentiment"])
                .unwrap_or_else(|| NEUTRAL_SENTIMENT.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnknownDocRecord {
    pub summary: String,
    pub keywords: Vec<String>,
}

impl UnknownDocRecord {
    pub fn from_fields(fields: &FieldMap) -> Self {
        Self {
            summary: text_field(fields, &["summary"]).unwrap_or_default(),
            keywords: string_list(fields.get("keywords")),
        }
    }
}

pub fn save_invoice(db: &Database, doc_id: &str, fields: &FieldMap) -> Result<(), DatabaseError> {
    let record = InvoiceRecord::from_fields(fields)?;
    db.with_conn(|conn| {
        ensure_registered(conn, doc_id)?;
        conn.execute(
            "INSERT INTO invoices (doc_id, vendor, inv_date, total_amount, raw_data)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                doc_id,
                record.vendor,
                record.inv_date,
                record.total_amount,
                record.raw_data
            ],
        )?;
        log::info!(
            "Saved invoice for {} (total {:.2})",
            doc_id,
            record.total_amount
        );
        Ok(())
    })
}

pub fn save_resume(db: &Database, doc_id: &str, fields: &FieldMap) -> Result<(), DatabaseError> {
    let record = ResumeRecord::from_fields(fields);
    let skills = serde_json::to_string(&record.skills)?;
    db.with_conn(|conn| {
        ensure_registered(conn, doc_id)?;
        conn.execute(
            "INSERT INTO resumes (doc_id, candidate_name, score, skills) VALUES (?1, ?2, ?3, ?4)",
            params![doc_id, record.candidate_name, record.score, skills],
        )?;
        log::info!(
            "Saved resume for {} (score {}, {} skills)",
            doc_id,
            record.score,
            record.skills.len()
        );
        Ok(())
    })
}

pub fn save_research_paper(
    db: &Database,
    doc_id: &str,
    fields: &FieldMap,
) -> Result<(), DatabaseError> {
    let record = ResearchPaperRecord::from_fields(fields);
    db.with_conn(|conn| {
        ensure_registered(conn, doc_id)?;
        conn.execute(
            "INSERT INTO research_papers (doc_id, title, summary) VALUES (?1, ?2, ?3)",
            params![doc_id, record.title, record.summary],
        )?;
        log::info!("Saved research paper for {}", doc_id);
        Ok(())
    })
}

pub fn save_legal_doc(db: &Database, doc_id: &str, fields: &FieldMap) -> Result<(), DatabaseError> {
    let record = LegalDocRecord::from_fields(fields);
    let parties = serde_json::to_string(&record.parties)?;
    let clauses = serde_json::to_string(&record.key_clauses)?;
    db.with_conn(|conn| {
        ensure_registered(conn, doc_id)?;
        conn.execute(
            "INSERT INTO legal_docs (doc_id, document_type, parties, effective_date,
             expiration_date, key_clauses, summary)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                doc_id,
                record.document_type,
                parties,
                record.effective_date,
                record.expiration_date,
                clauses,
                record.summary
            ],
        )?;
        log::info!("Saved legal document for {}", doc_id);
        Ok(())
    })
}

pub fn save_audio_note(db: &Database, doc_id: &str, fields: &FieldMap) -> Result<(), DatabaseError> {
    let record = AudioNoteRecord::from_fields(fields);
    db.with_conn(|conn| {
        ensure_registered(conn, doc_id)?;
        conn.execute(
            "INSERT INTO audio_notes (doc_id, transcript, summary, sentiment)
             VALUES (?1, ?2, ?3, ?4)",
            params![doc_id, record.transcript, record.summary, record.sentiment],
        )?;
        log::info!("Saved audio note for {}", doc_id);
        Ok(())
    })
}

pub fn save_unknown(db: &Database, doc_id: &str, fields: &FieldMap) -> Result<(), DatabaseError> {
    let record = UnknownDocRecord::from_fields(fields);
    let keywords = serde_json::to_string(&record.keywords)?;
    db.with_conn(|conn| {
        ensure_registered(conn, doc_id)?;
        conn.execute(
            "INSERT INTO unknown_docs (doc_id, summary, extracted_keywords) VALUES (?1, ?2, ?3)",
            params![doc_id, record.summary, keywords],
        )?;
        log::info!("Saved unknown document summary for {}", doc_id);
        Ok(())
    })
}
