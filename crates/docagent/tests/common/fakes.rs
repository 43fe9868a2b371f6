//! Deterministic stand-ins for the oracle, the capabilities and the store.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use docagent::capability::{Classifier, Extractor, Transcriber, VisionAnalyzer};
use docagent::dedup::Claim;
use docagent::llm::{ChatRequest, LlmClient, LlmError};
use docagent::oracle::{Decision, DecisionOracle, StateProjection};
use docagent::pipeline::{Action, ProgressEvent, ProgressReporter};
use docagent::{CapabilityError, Database, DatabaseError, DocumentStore, DocumentType, ExtractionKind, FieldMap};

pub fn fields(value: Value) -> FieldMap {
    value.as_object().cloned().expect("fields must be a JSON object")
}

/// Replays a fixed list of action names, then answers STOP.
pub struct ScriptedOracle {
    script: Mutex<Vec<String>>,
    pub calls: AtomicUsize,
}

impl ScriptedOracle {
    pub fn new(actions: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(actions.iter().map(|a| a.to_string()).collect()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DecisionOracle for ScriptedOracle {
    async fn decide(&self, _projection: &StateProjection) -> Decision {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script.lock().unwrap();
        if script.is_empty() {
            return Decision::new(Action::Stop, "script finished");
        }
        Decision::new(Action::parse(&script.remove(0)), "scripted")
    }
}

/// Answers the same action forever.
pub struct RepeatingOracle {
    action: String,
    pub calls: AtomicUsize,
}

impl RepeatingOracle {
    pub fn new(action: &str) -> Arc<Self> {
        Arc::new(Self {
            action: action.to_string(),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl DecisionOracle for RepeatingOracle {
    async fn decide(&self, _projection: &StateProjection) -> Decision {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Decision::new(Action::parse(&self.action), "again")
    }
}

/// Wraps another oracle and counts calls.
pub struct CountingOracle<O> {
    inner: O,
    pub calls: AtomicUsize,
}

impl<O> CountingOracle<O> {
    pub fn new(inner: O) -> Arc<Self> {
        Arc::new(Self {
            inner,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<O: DecisionOracle> DecisionOracle for CountingOracle<O> {
    async fn decide(&self, projection: &StateProjection) -> Decision {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.decide(projection).await
    }
}

/// Chat client that returns canned completions in order.
pub struct CannedLlm {
    replies: Mutex<Vec<Result<String, LlmError>>>,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl CannedLlm {
    pub fn new(replies: Vec<Result<String, LlmError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn text(replies: &[&str]) -> Arc<Self> {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }
}

#[async_trait]
impl LlmClient for CannedLlm {
    async fn complete(&self, request: ChatRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request);
        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Err(LlmError::InvalidResponse("no canned reply left".to_string()));
        }
        replies.remove(0)
    }

    async fn transcribe(&self, _audio: &[u8], _filename: &str) -> Result<String, LlmError> {
        Err(LlmError::InvalidResponse("not scripted".to_string()))
    }
}

/// Hands the decision to the scheduler before every turn, so concurrent
/// runs interleave.
pub struct YieldingOracle<O> {
    inner: O,
}

impl<O> YieldingOracle<O> {
    pub fn new(inner: O) -> Arc<Self> {
        Arc::new(Self { inner })
    }
}

#[async_trait]
impl<O: DecisionOracle> DecisionOracle for YieldingOracle<O> {
    async fn decide(&self, projection: &StateProjection) -> Decision {
        tokio::task::yield_now().await;
        self.inner.decide(projection).await
    }
}

/// Answers the same label for any text.
pub struct LabelClassifier(pub DocumentType);

#[async_trait]
impl Classifier for LabelClassifier {
    async fn classify(&self, _text: &str) -> DocumentType {
        self.0
    }
}

/// Classifies by keyword, like a well-behaved model would.
pub struct KeywordClassifier {
    pub calls: AtomicUsize,
}

impl KeywordClassifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Classifier for KeywordClassifier {
    async fn classify(&self, text: &str) -> DocumentType {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let upper = text.to_uppercase();
        if upper.contains("INVOICE") {
            DocumentType::Invoice
        } else if upper.contains("RESUME") || upper.contains("CURRICULUM") {
            DocumentType::Resume
        } else if upper.contains("ABSTRACT") {
            DocumentType::ResearchPaper
        } else if upper.contains("AGREEMENT") {
            DocumentType::LegalDoc
        } else {
            DocumentType::Other
        }
    }
}

/// Returns a preset map per extraction kind; kinds without a preset get `{}`.
pub struct MapExtractor {
    presets: HashMap<ExtractionKind, FieldMap>,
    pub inputs: Mutex<Vec<(ExtractionKind, String)>>,
}

impl MapExtractor {
    pub fn new(presets: Vec<(ExtractionKind, Value)>) -> Arc<Self> {
        Arc::new(Self {
            presets: presets.into_iter().map(|(k, v)| (k, fields(v))).collect(),
            inputs: Mutex::new(Vec::new()),
        })
    }

    /// Presets covering every kind.
    pub fn complete() -> Arc<Self> {
        Self::new(vec![
            (
                ExtractionKind::Invoice,
                serde_json::json!({
                    "vendor": "ACME Corp",
                    "date": "15/03/2024",
                    "line_items": [
                        {"description": "Widgets", "total": 10.00},
                        {"description": "Gadgets", "total": "20.50"},
                        {"description": "Shipping", "total": "$5.25"}
                    ]
                }),
            ),
            (
                ExtractionKind::Resume,
                serde_json::json!({"name": "Jane Doe", "score": "87/100", "skills": "Rust, SQL"}),
            ),
            (
                ExtractionKind::ResearchPaper,
                serde_json::json!({"title": "On Agents", "summary": "A study."}),
            ),
            (
                ExtractionKind::LegalDoc,
                serde_json::json!({"document_type": "NDA", "parties": ["A", "B"], "summary": "Mutual NDA."}),
            ),
            (
                ExtractionKind::AudioNote,
                serde_json::json!({"summary": "Shopping reminder.", "sentiment": "Positive", "action_items": ["buy milk"]}),
            ),
            (
                ExtractionKind::Unknown,
                serde_json::json!({"summary": "Something else.", "keywords": ["misc"]}),
            ),
        ])
    }

    pub fn inputs(&self) -> Vec<(ExtractionKind, String)> {
        self.inputs.lock().unwrap().clone()
    }
}

#[async_trait]
impl Extractor for MapExtractor {
    async fn extract(&self, kind: ExtractionKind, text: &str) -> FieldMap {
        self.inputs.lock().unwrap().push((kind, text.to_string()));
        self.presets.get(&kind).cloned().unwrap_or_default()
    }
}

/// Vision fake: returns a fixed description, or fails when none is set.
pub struct FakeVision {
    reply: Option<String>,
    pub payloads: Mutex<Vec<String>>,
}

impl FakeVision {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(text.to_string()),
            payloads: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            payloads: Mutex::new(Vec::new()),
        })
    }

    pub fn payloads(&self) -> Vec<String> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl VisionAnalyzer for FakeVision {
    async fn analyze(&self, image_base64: &str) -> Result<String, CapabilityError> {
        self.payloads.lock().unwrap().push(image_base64.to_string());
        self.reply
            .clone()
            .ok_or_else(|| CapabilityError::Unavailable("vision offline".to_string()))
    }
}

pub struct FakeTranscriber {
    pub transcript: String,
}

#[async_trait]
impl Transcriber for FakeTranscriber {
    async fn transcribe(&self, _audio: &[u8], _filename: &str) -> Result<String, CapabilityError> {
        Ok(self.transcript.clone())
    }
}

/// Delegates to a real database but refuses every record write.
pub struct FailingSaveStore {
    pub db: Database,
}

impl FailingSaveStore {
    fn refuse(&self) -> Result<(), DatabaseError> {
        Err(DatabaseError::UnknownDocument {
            id: "refused by test store".to_string(),
        })
    }
}

impl DocumentStore for FailingSaveStore {
    fn is_duplicate(&self, fingerprint: &str) -> Result<bool, DatabaseError> {
        self.db.is_duplicate(fingerprint)
    }
    fn claim(&self, id: &str, filename: &str, fingerprint: &str) -> Result<Claim, DatabaseError> {
        self.db.claim(id, filename, fingerprint)
    }
    fn release(&self, id: &str) -> Result<(), DatabaseError> {
        self.db.release(id)
    }
    fn log_processed(&self, id: &str, filename: &str, doc_type: &str, fingerprint: &str) -> Result<(), DatabaseError> {
        self.db.log_processed(id, filename, doc_type, fingerprint)
    }
    fn save_invoice(&self, _: &str, _: &FieldMap) -> Result<(), DatabaseError> {
        self.refuse()
    }
    fn save_resume(&self, _: &str, _: &FieldMap) -> Result<(), DatabaseError> {
        self.refuse()
    }
    fn save_research_paper(&self, _: &str, _: &FieldMap) -> Result<(), DatabaseError> {
        self.refuse()
    }
    fn save_legal_doc(&self, _: &str, _: &FieldMap) -> Result<(), DatabaseError> {
        self.refuse()
    }
    fn save_audio_note(&self, _: &str, _: &FieldMap) -> Result<(), DatabaseError> {
        self.refuse()
    }
    fn save_unknown(&self, _: &str, _: &FieldMap) -> Result<(), DatabaseError> {
        self.refuse()
    }
}

/// A store whose every call fails, as if the database were gone.
pub struct UnavailableStore;

impl DocumentStore for UnavailableStore {
    fn is_duplicate(&self, _: &str) -> Result<bool, DatabaseError> {
        Err(DatabaseError::LockPoisoned)
    }
    fn claim(&self, _: &str, _: &str, _: &str) -> Result<Claim, DatabaseError> {
        Err(DatabaseError::LockPoisoned)
    }
    fn release(&self, _: &str) -> Result<(), DatabaseError> {
        Err(DatabaseError::LockPoisoned)
    }
    fn log_processed(&self, _: &str, _: &str, _: &str, _: &str) -> Result<(), DatabaseError> {
        Err(DatabaseError::LockPoisoned)
    }
    fn save_invoice(&self, _: &str, _: &FieldMap) -> Result<(), DatabaseError> {
        Err(DatabaseError::LockPoisoned)
    }
    fn save_resume(&self, _: &str, _: &FieldMap) -> Result<(), DatabaseError> {
        Err(DatabaseError::LockPoisoned)
    }
    fn save_research_paper(&self, _: &str, _: &FieldMap) -> Result<(), DatabaseError> {
        Err(DatabaseError::LockPoisoned)
    }
    fn save_legal_doc(&self, _: &str, _: &FieldMap) -> Result<(), DatabaseError> {
        Err(DatabaseError::LockPoisoned)
    }
    fn save_audio_note(&self, _: &str, _: &FieldMap) -> Result<(), DatabaseError> {
        Err(DatabaseError::LockPoisoned)
    }
    fn save_unknown(&self, _: &str, _: &FieldMap) -> Result<(), DatabaseError> {
        Err(DatabaseError::LockPoisoned)
    }
}

/// Collects every progress event.
#[derive(Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressReporter for RecordingProgress {
    fn report(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}
