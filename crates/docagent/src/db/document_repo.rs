//! Document registry: operations on the `processed_docs` table.
//!
//! A row is inserted when content is first claimed (`status = 'processing'`)
//! and promoted to `'saved'` once its record has been persisted. A
//! `processing` row older than [`STALE_CLAIM_SECS`] belongs to a run that
//! died and may be taken over.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DatabaseError};
use crate::dedup::Claim;

pub const STATUS_PROCESSING: &str = "processing";
pub const STATUS_SAVED: &str = "saved";

/// Age after which an unfinished claim is considered abandoned. Far longer
/// than a full step budget of LLM calls with retries.
pub const STALE_CLAIM_SECS: u64 = 6 * 60 * 60;

/// SQLite modifier selecting rows claimed before the stale cutoff.
pub(crate) fn stale_cutoff_modifier() -> String {
    format!("-{} seconds", STALE_CLAIM_SECS)
}

/// A raw row from `processed_docs`.
#[derive(Debug, Clone)]
pub struct ProcessedDocRow {
    pub id: String,
    pub filename: String,
    pub file_hash: String,
    pub doc_type: Option<String>,
    pub status: String,
    pub processed_at: String,
}

impl ProcessedDocRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            filename: row.get("filename")?,
            file_hash: row.get("file_hash")?,
            doc_type: row.get("doc_type")?,
            status: row.get("status")?,
            processed_at: row.get("processed_at")?,
        })
    }
}

/// Returns true if any record owns the fingerprint.
pub fn is_duplicate(db: &Database, file_hash: &str) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let exists = conn
            .query_row(
                "SELECT 1 FROM processed_docs WHERE file_hash = ?1",
                params![file_hash],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        Ok(exists)
    })
}

/// Atomically claims a fingerprint for `id`.
///
/// Relies on the UNIQUE constraint on `file_hash`: when the insert is
/// ignored, someone else owns the content. A stale `processing` claim on
/// the same fingerprint is dropped first, in the same transaction.
pub fn claim(
    db: &Database,
    id: &str,
    filename: &str,
    file_hash: &str,
) -> Result<Claim, DatabaseError> {
    db.with_conn(|conn| {
        let tx = conn.unchecked_transaction()?;
        let reclaimed = tx.execute(
            "DELETE FROM processed_docs
             WHERE file_hash = ?1 AND status = ?2
               AND processed_at < strftime('%Y-%m-%dT%H:%M:%fZ', 'now', ?3)",
            params![file_hash, STATUS_PROCESSING, stale_cutoff_modifier()],
        )?;
        if reclaimed > 0 {
            log::warn!("Taking over abandoned claim for fingerprint {}", file_hash);
        }

        let inserted = tx.execute(
            "INSERT OR IGNORE INTO processed_docs (id, filename, file_hash, status)
             VALUES (?1, ?2, ?3, ?4)",
            params![id, filename, file_hash, STATUS_PROCESSING],
        )?;
        tx.commit()?;

        if inserted == 0 {
            log::debug!("Claim for {} ignored, fingerprint already present", id);
            Ok(Claim::Duplicate)
        } else {
            Ok(Claim::New)
        }
    })
}

/// Removes a claim together with any records written for it.
pub fn release(db: &Database, id: &str) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        let removed = conn.execute("DELETE FROM processed_docs WHERE id = ?1", params![id])?;
        if removed > 0 {
            log::debug!("Released claim {}", id);
        }
        Ok(())
    })
}

/// Marks the document as saved with its final type.
///
/// Updates the claimed row in place; if the row is missing (e.g. written
/// by a caller that skipped the gate) it is inserted, unless another row
/// already owns the fingerprint.
pub fn log_processed(
    db: &Database,
    id: &str,
    filename: &str,
    doc_type: &str,
    file_hash: &str,
) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO processed_docs (id, filename, file_hash, doc_type, status)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET doc_type = excluded.doc_type, status = excluded.status
             ON CONFLICT(file_hash) DO NOTHING",
            params![id, filename, file_hash, doc_type, STATUS_SAVED],
        )?;
        Ok(())
    })
}

pub fn get(db: &Database, id: &str) -> Result<Option<ProcessedDocRow>, DatabaseError> {
    db.with_conn(|conn| {
        let row = conn
            .query_row(
                "SELECT * FROM processed_docs WHERE id = ?1",
                params![id],
                ProcessedDocRow::from_row,
            )
            .optional()?;
        Ok(row)
    })
}

/// Ensures `id` is present before a record row references it.
pub(crate) fn ensure_registered(conn: &rusqlite::Connection, id: &str) -> Result<(), DatabaseError> {
    let exists = conn
        .query_row(
            "SELECT 1 FROM processed_docs WHERE id = ?1",
            params![id],
            |_| Ok(()),
        )
        .optional()?
        .is_some();
    if exists {
        Ok(())
    } else {
        Err(DatabaseError::UnknownDocument { id: id.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_claim_then_duplicate() {
        let db = setup_db();
        assert_eq!(claim(&db, "id-1", "a.txt", "h").unwrap(), Claim::New);
        assert_eq!(claim(&db, "id-2", "b.txt", "h").unwrap(), Claim::Duplicate);
        assert!(get(&db, "id-2").unwrap().is_none());

        let row = get(&db, "id-1").unwrap().unwrap();
        assert_eq!(row.file_hash, "h");
        assert_eq!(row.status, STATUS_PROCESSING);
        assert!(row.doc_type.is_none());
    }

    fn backdate(db: &Database, id: &str, processed_at: &str) {
        db.with_conn(|conn| {
            conn.execute(
                "UPDATE processed_docs SET processed_at = ?1 WHERE id = ?2",
                params![processed_at, id],
            )?;
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_abandoned_claim_is_taken_over() {
        let db = setup_db();
        claim(&db, "crashed", "a.txt", "h").unwrap();
        backdate(&db, "crashed", "2000-01-01T00:00:00.000Z");

        assert_eq!(claim(&db, "retry", "a.txt", "h").unwrap(), Claim::New);
        assert!(get(&db, "crashed").unwrap().is_none());
        assert_eq!(get(&db, "retry").unwrap().unwrap().status, STATUS_PROCESSING);
    }

    #[test]
    fn test_old_saved_row_is_never_taken_over() {
        let db = setup_db();
        claim(&db, "done", "a.txt", "h").unwrap();
        log_processed(&db, "done", "a.txt", "INVOICE", "h").unwrap();
        backdate(&db, "done", "2000-01-01T00:00:00.000Z");

        assert_eq!(claim(&db, "again", "a.txt", "h").unwrap(), Claim::Duplicate);
        assert_eq!(get(&db, "done").unwrap().unwrap().status, STATUS_SAVED);
    }

    #[test]
    fn test_is_duplicate() {
        let db = setup_db();
        assert!(!is_duplicate(&db, "h").unwrap());
        claim(&db, "id-1", "a.txt", "h").unwrap();
        assert!(is_duplicate(&db, "h").unwrap());
    }

    #[test]
    fn test_log_processed_promotes_claim() {
        let db = setup_db();
        claim(&db, "id-1", "a.txt", "h").unwrap();
        log_processed(&db, "id-1", "a.txt", "INVOICE", "h").unwrap();

        let row = get(&db, "id-1").unwrap().unwrap();
        assert_eq!(row.status, STATUS_SAVED);
        assert_eq!(row.doc_type.as_deref(), Some("INVOICE"));
    }

    #[test]
    fn test_log_processed_without_claim_inserts() {
        let db = setup_db();
        log_processed(&db, "id-9", "z.txt", "OTHER", "hz").unwrap();
        assert!(is_duplicate(&db, "hz").unwrap());
    }

    #[test]
    fn test_log_processed_ignores_foreign_fingerprint() {
        let db = setup_db();
        claim(&db, "id-1", "a.txt", "h").unwrap();
        log_processed(&db, "id-2", "b.txt", "OTHER", "h").unwrap();

        assert!(get(&db, "id-2").unwrap().is_none());
        assert_eq!(get(&db, "id-1").unwrap().unwrap().status, STATUS_PROCESSING);
    }

    #[test]
    fn test_release_removes_row() {
        let db = setup_db();
        claim(&db, "id-1", "a.txt", "h").unwrap();
        release(&db, "id-1").unwrap();
        assert!(get(&db, "id-1").unwrap().is_none());
        // Releasing twice is harmless.
        release(&db, "id-1").unwrap();
    }
}
