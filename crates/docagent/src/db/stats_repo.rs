//! Statistics repository: aggregate counts and recent records for reporting.

use rusqlite::params;
use serde::Serialize;

use super::{document_repo, Database, DatabaseError};

/// Number of saved documents per type.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeCount {
    pub doc_type: String,
    pub count: i64,
}

/// Overall processing summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total_documents: i64,
    pub saved: i64,
    pub in_progress: i64,
    /// Unfinished claims old enough to be taken over by the next upload.
    pub stale: i64,
    pub by_type: Vec<TypeCount>,
}

pub fn summary(db: &Database) -> Result<StatsSummary, DatabaseError> {
    db.with_conn(|conn| {
        let (total, saved, in_progress, stale): (i64, i64, i64, i64) = conn.query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(CASE WHEN status = 'saved' THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN status = 'processing' THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN status = 'processing'
                        AND processed_at < strftime('%Y-%m-%dT%H:%M:%fZ', 'now', ?1)
                        THEN 1 ELSE 0 END), 0)
             FROM processed_docs",
            params![document_repo::stale_cutoff_modifier()],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
        )?;

        let mut stmt = conn.prepare(
            "SELECT doc_type, COUNT(*) FROM processed_docs
             WHERE status = 'saved' AND doc_type IS NOT NULL
             GROUP BY doc_type ORDER BY COUNT(*) DESC, doc_type ASC",
        )?;
        let by_type = stmt
            .query_map([], |row| {
                Ok(TypeCount {
                    doc_type: row.get(0)?,
                    count: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(StatsSummary {
            total_documents: total,
            saved,
            in_progress,
            stale,
            by_type,
        })
    })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSummaryRow {
    pub doc_id: String,
    pub filename: String,
    pub vendor: Option<String>,
    pub inv_date: Option<String>,
    pub total_amount: f64,
}

pub fn recent_invoices(db: &Database, limit: u32) -> Result<Vec<InvoiceSummaryRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT i.doc_id, d.filename, i.vendor, i.inv_date, i.total_amount
             FROM invoices i JOIN processed_docs d ON d.id = i.doc_id
             ORDER BY d.processed_at DESC, i.rowid DESC LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![limit], |row| {
                Ok(InvoiceSummaryRow {
                    doc_id: row.get(0)?,
                    filename: row.get(1)?,
                    vendor: row.get(2)?,
                    inv_date: row.get(3)?,
                    total_amount: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeSummaryRow {
    pub doc_id: String,
    pub filename: String,
    pub candidate_name: String,
    pub score: i64,
}

pub fn recent_resumes(db: &Database, limit: u32) -> Result<Vec<ResumeSummaryRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT r.doc_id, d.filename, r.candidate_name, r.score
             FROM resumes r JOIN processed_docs d ON d.id = r.doc_id
             ORDER BY d.processed_at DESC, r.rowid DESC LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![limit], |row| {
                Ok(ResumeSummaryRow {
                    doc_id: row.get(0)?,
                    filename: row.get(1)?,
                    candidate_name: row.get(2)?,
                    score: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Total of all stored invoice amounts.
pub fn invoice_total(db: &Database) -> Result<f64, DatabaseError> {
    db.with_conn(|conn| {
        let total: f64 = conn.query_row(
            "SELECT COALESCE(SUM(total_amount), 0.0) FROM invoices",
            [],
            |r| r.get(0),
        )?;
        Ok(total)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::record_repo;
    use crate::document::FieldMap;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> FieldMap {
        value.as_object().cloned().unwrap()
    }

    fn saved(db: &Database, id: &str, doc_type: &str) {
        document_repo::claim(db, id, &format!("{}.txt", id), &format!("h-{}", id)).unwrap();
        document_repo::log_processed(db, id, &format!("{}.txt", id), doc_type, &format!("h-{}", id))
            .unwrap();
    }

    #[test]
    fn test_summary_empty() {
        let db = Database::open_in_memory().unwrap();
        let s = summary(&db).unwrap();
        assert_eq!(s.total_documents, 0);
        assert_eq!(s.saved, 0);
        assert!(s.by_type.is_empty());
    }

    #[test]
    fn test_summary_counts() {
        let db = Database::open_in_memory().unwrap();
        saved(&db, "a", "INVOICE");
        saved(&db, "b", "INVOICE");
        saved(&db, "c", "RESUME");
        document_repo::claim(&db, "d", "d.txt", "h-d").unwrap();

        let s = summary(&db).unwrap();
        assert_eq!(s.total_documents, 4);
        assert_eq!(s.saved, 3);
        assert_eq!(s.in_progress, 1);
        assert_eq!(s.stale, 0);
        assert_eq!(s.by_type[0].doc_type, "INVOICE");
        assert_eq!(s.by_type[0].count, 2);
        assert_eq!(s.by_type[1].doc_type, "RESUME");
    }

    #[test]
    fn test_summary_reports_abandoned_claims() {
        let db = Database::open_in_memory().unwrap();
        document_repo::claim(&db, "old", "old.txt", "h-old").unwrap();
        document_repo::claim(&db, "new", "new.txt", "h-new").unwrap();
        db.with_conn(|conn| {
            conn.execute(
                "UPDATE processed_docs SET processed_at = '2000-01-01T00:00:00.000Z' WHERE id = 'old'",
                [],
            )?;
            Ok(())
        })
        .unwrap();

        let s = summary(&db).unwrap();
        assert_eq!(s.in_progress, 2);
        assert_eq!(s.stale, 1);
    }

    #[test]
    fn test_recent_invoices_and_total() {
        let db = Database::open_in_memory().unwrap();
        saved(&db, "a", "INVOICE");
        saved(&db, "b", "INVOICE");
        record_repo::save_invoice(&db, "a", &fields(json!({"vendor": "A", "total_amount": 10.0})))
            .unwrap();
        record_repo::save_invoice(&db, "b", &fields(json!({"vendor": "B", "total_amount": 2.5})))
            .unwrap();

        let rows = recent_invoices(&db, 10).unwrap();
        assert_eq!(rows.len(), 2);
        assert!((invoice_total(&db).unwrap() - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_recent_resumes() {
        let db = Database::open_in_memory().unwrap();
        saved(&db, "r", "RESUME");
        record_repo::save_resume(&db, "r", &fields(json!({"name": "Ada", "score": "91"}))).unwrap();

        let rows = recent_resumes(&db, 5).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].candidate_name, "Ada");
        assert_eq!(rows[0].score, 91);
        assert_eq!(rows[0].filename, "r.txt");
    }
}
