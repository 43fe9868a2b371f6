use std::path::{Path, PathBuf};

use crate::pipeline::{IngestOutcome, LoopOutcome};

#[derive(Debug, Clone)]
pub struct IngestJob {
    pub id: String,
    pub source_path: PathBuf,
    /// MIME type guessed from the path, for display only.
    pub mime_type: Option<String>,
}

impl IngestJob {
    pub fn new(source_path: PathBuf) -> Self {
        let mime_type = Self::detect_mime_type(&source_path);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            source_path,
            mime_type,
        }
    }

    fn detect_mime_type(path: &Path) -> Option<String> {
        mime_guess::from_path(path)
            .first()
            .map(|m| m.essence_str().to_string())
    }
}

/// Summary of one finished job, sent back from a worker.
#[derive(Debug, Clone)]
pub struct IngestJobResult {
    pub job_id: String,
    pub source_path: PathBuf,
    pub status: JobStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Skipped,
    Finished {
        doc_id: String,
        document_type: Option<String>,
        outcome: LoopOutcome,
        steps: usize,
    },
    /// The file could not be loaded, or the store failed at the dedup gate.
    Error(String),
}

impl IngestJobResult {
    pub fn from_outcome(job: &IngestJob, outcome: &IngestOutcome) -> Self {
        let status = match outcome {
            IngestOutcome::Skipped { .. } => JobStatus::Skipped,
            IngestOutcome::Processed(report) => JobStatus::Finished {
                doc_id: report.state.id().to_string(),
                document_type: report.state.document_type().map(|t| t.as_label().to_string()),
                outcome: report.outcome.clone(),
                steps: report.steps,
            },
        };
        Self {
            job_id: job.id.clone(),
            source_path: job.source_path.clone(),
            status,
        }
    }

    pub fn failure(job: &IngestJob, error: String) -> Self {
        Self {
            job_id: job.id.clone(),
            source_path: job.source_path.clone(),
            status: JobStatus::Error(error),
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(
            self.status,
            JobStatus::Finished {
                outcome: LoopOutcome::SavedOk,
                ..
            }
        )
    }
}
