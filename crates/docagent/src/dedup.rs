//! Content fingerprinting and the duplicate gate in front of the decision loop.

use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::db::store::DocumentStore;
use crate::db::DatabaseError;

/// SHA-256 of the full UTF-8 content, lower-case hex.
pub fn fingerprint(content: &str) -> String {
    format!("{:x}", Sha256::digest(content.as_bytes()))
}

/// Result of an atomic claim on a fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// The fingerprint was unclaimed and now belongs to the caller.
    New,
    /// Another record already owns the fingerprint.
    Duplicate,
}

/// Check-and-record of incoming content as a single conditional insert.
#[derive(Clone)]
pub struct DedupGate {
    store: Arc<dyn DocumentStore>,
}

impl DedupGate {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn is_duplicate(&self, fingerprint: &str) -> Result<bool, DatabaseError> {
        self.store.is_duplicate(fingerprint)
    }

    /// Claims `fingerprint` for the record `id`. Store failures propagate.
    pub fn admit(&self, id: &str, filename: &str, fingerprint: &str) -> Result<Claim, DatabaseError> {
        let claim = self.store.claim(id, filename, fingerprint)?;
        if claim == Claim::Duplicate {
            tracing::debug!(
                fingerprint = crate::sanitize::short_hash(fingerprint),
                "Fingerprint already claimed"
            );
        }
        Ok(claim)
    }

    /// Gives up a claim so the same content can be ingested again later.
    pub fn release(&self, id: &str) -> Result<(), DatabaseError> {
        self.store.release(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn test_fingerprint_is_sha256_hex() {
        assert_eq!(
            fingerprint("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(fingerprint("").len(), 64);
    }

    #[test]
    fn test_fingerprint_covers_whole_content() {
        let a = format!("{}{}", "x".repeat(5000), "a");
        let b = format!("{}{}", "x".repeat(5000), "b");
        assert_ne!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn test_second_claim_is_duplicate() {
        let db = Database::open_in_memory().unwrap();
        let gate = DedupGate::new(Arc::new(db));
        let fp = fingerprint("same bytes");

        assert_eq!(gate.admit("id-1", "a.txt", &fp).unwrap(), Claim::New);
        assert!(gate.is_duplicate(&fp).unwrap());
        assert_eq!(gate.admit("id-2", "b.txt", &fp).unwrap(), Claim::Duplicate);
    }

    #[test]
    fn test_release_allows_reclaim() {
        let db = Database::open_in_memory().unwrap();
        let gate = DedupGate::new(Arc::new(db));
        let fp = fingerprint("retry me");

        assert_eq!(gate.admit("id-1", "a.txt", &fp).unwrap(), Claim::New);
        gate.release("id-1").unwrap();
        assert!(!gate.is_duplicate(&fp).unwrap());
        assert_eq!(gate.admit("id-2", "a.txt", &fp).unwrap(), Claim::New);
    }
}
