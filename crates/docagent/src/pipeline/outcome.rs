use serde::Serialize;
use std::fmt;

use crate::document::{DocumentType, ExtractionKind, ProcessingState};

/// Result of executing one action against the state.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    Classified(DocumentType),
    /// Vision text replaced the content and was re-classified.
    ImageAnalyzed(DocumentType),
    Extracted(ExtractionKind),
    Saved,
    SaveFailed(String),
    /// A non-save action could not complete. State is unchanged.
    Failed(String),
    /// Nothing to do (unknown action name, or STOP reached the executor).
    Done,
}

impl ActionOutcome {
    /// A save attempt ends the run whether or not it succeeded.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Saved | Self::SaveFailed(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::SaveFailed(msg) | Self::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// How a decision loop ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoopOutcome {
    /// The oracle asked to stop, or faulted.
    StoppedExplicit { reasoning: String },
    /// The step budget ran out before a stop or save. The run is incomplete.
    StoppedBudget,
    SavedOk,
    SavedFailed { message: String },
}

impl LoopOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::SavedOk)
    }
}

impl fmt::Display for LoopOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StoppedExplicit { reasoning } => write!(f, "stopped ({})", reasoning),
            Self::StoppedBudget => f.write_str("step budget exhausted"),
            Self::SavedOk => f.write_str("saved"),
            Self::SavedFailed { message } => write!(f, "save failed ({})", message),
        }
    }
}

/// A completed run: the final state plus how it ended.
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub state: ProcessingState,
    pub outcome: LoopOutcome,
    pub steps: usize,
}

#[derive(Debug, Clone)]
pub enum IngestOutcome {
    /// Content was already ingested; nothing ran.
    Skipped { filename: String, fingerprint: String },
    Processed(IngestReport),
}

impl IngestOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }

    pub fn report(&self) -> Option<&IngestReport> {
        match self {
            Self::Processed(report) => Some(report),
            Self::Skipped { .. } => None,
        }
    }
}
