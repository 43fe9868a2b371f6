use serde::Serialize;
use tokio::sync::broadcast;

use super::outcome::LoopOutcome;
use crate::document::DocumentType;

/// Events emitted while a document moves through the decision loop.
/// Document content is never included.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    Started {
        id: String,
        filename: String,
    },
    Duplicate {
        filename: String,
        fingerprint: String,
    },
    Step {
        step: usize,
        action: String,
        reasoning: String,
    },
    Classified {
        document_type: DocumentType,
    },
    ActionFailed {
        action: String,
        error: String,
    },
    Finished {
        outcome: LoopOutcome,
    },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// No-op reporter for unit tests.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Forwards events to a broadcast channel. Events are dropped when nobody
/// is subscribed.
pub struct BroadcastProgress {
    sender: broadcast::Sender<ProgressEvent>,
}

impl BroadcastProgress {
    pub fn new(sender: broadcast::Sender<ProgressEvent>) -> Self {
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.sender.subscribe()
    }
}

impl ProgressReporter for BroadcastProgress {
    fn report(&self, event: ProgressEvent) {
        let _ = self.sender.send(event);
    }
}
