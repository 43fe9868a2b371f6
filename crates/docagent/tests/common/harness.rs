//! Test harness: a file-backed database in a temp directory plus fake
//! capabilities, ready to build agents around any oracle.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use docagent::pipeline::PipelineConfig;
use docagent::{Agent, Database, DecisionOracle, DocumentStore, Toolkit};

use super::fakes::{FakeTranscriber, FakeVision, KeywordClassifier, MapExtractor};

pub struct TestHarness {
    pub temp_dir: TempDir,
    pub db: Database,
    pub classifier: Arc<KeywordClassifier>,
    pub extractor: Arc<MapExtractor>,
    pub vision: Arc<FakeVision>,
    pub config: PipelineConfig,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db = Database::open(&temp_dir.path().join("docagent.db")).expect("Failed to open database");

        Self {
            temp_dir,
            db,
            classifier: KeywordClassifier::new(),
            extractor: MapExtractor::complete(),
            vision: FakeVision::replying("INVOICE #7\nTotal due: 35.75"),
            config: PipelineConfig {
                max_steps: 8,
                preview_chars: 500,
                step_delay: Duration::ZERO,
            },
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.config.max_steps = max_steps;
        self
    }

    pub fn with_vision(mut self, vision: Arc<FakeVision>) -> Self {
        self.vision = vision;
        self
    }

    pub fn with_extractor(mut self, extractor: Arc<MapExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn toolkit(&self) -> Toolkit {
        Toolkit::new(
            self.classifier.clone(),
            self.extractor.clone(),
            self.vision.clone(),
        )
    }

    pub fn agent(&self, oracle: Arc<dyn DecisionOracle>) -> Agent {
        self.agent_with_store(Arc::new(self.db.clone()), oracle)
    }

    pub fn agent_with_toolkit(&self, toolkit: Toolkit, oracle: Arc<dyn DecisionOracle>) -> Agent {
        Agent::new(Arc::new(self.db.clone()), oracle, toolkit, self.config.clone())
    }

    pub fn agent_with_store(&self, store: Arc<dyn DocumentStore>, oracle: Arc<dyn DecisionOracle>) -> Agent {
        Agent::new(store, oracle, self.toolkit(), self.config.clone()).with_transcriber(Arc::new(
            FakeTranscriber {
                transcript: "Remember to buy milk and call the plumber.".to_string(),
            },
        ))
    }

    /// Row count of a table.
    pub fn count(&self, table: &str) -> i64 {
        self.db
            .with_conn(|conn| {
                Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?)
            })
            .expect("count query failed")
    }

    pub fn write_file(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, contents).expect("Failed to write test file");
        path
    }
}
