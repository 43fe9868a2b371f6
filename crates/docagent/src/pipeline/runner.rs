//! The decision loop: ask the oracle, execute, record, repeat.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, info_span, warn, Instrument};

use super::config::PipelineConfig;
use super::executor::ActionExecutor;
use super::outcome::{ActionOutcome, IngestOutcome, IngestReport, LoopOutcome};
use super::progress::{ProgressEvent, ProgressReporter};
use crate::capability::{LlmToolkit, Toolkit, Transcriber};
use crate::config::{Config, OracleKind};
use crate::db::store::DocumentStore;
use crate::dedup::{fingerprint, Claim, DedupGate};
use crate::document::ProcessingState;
use crate::error::DocAgentError;
use crate::llm::{LlmClient, OpenAiCompatClient};
use crate::oracle::{DecisionOracle, LlmOracle, RuleOracle, StateProjection};
use crate::processor::ProcessorRegistry;
use crate::sanitize;

pub struct Agent {
    gate: DedupGate,
    oracle: Arc<dyn DecisionOracle>,
    executor: ActionExecutor,
    config: PipelineConfig,
    processors: ProcessorRegistry,
    transcriber: Option<Arc<dyn Transcriber>>,
}

impl Agent {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        oracle: Arc<dyn DecisionOracle>,
        toolkit: Toolkit,
        config: PipelineConfig,
    ) -> Self {
        Self {
            gate: DedupGate::new(store.clone()),
            oracle,
            executor: ActionExecutor::new(toolkit, store),
            config,
            processors: ProcessorRegistry::new(),
            transcriber: None,
        }
    }

    /// Production constructor: one HTTP client shared by the oracle and
    /// every capability.
    pub fn from_config(config: &Config, store: Arc<dyn DocumentStore>) -> Result<Self, DocAgentError> {
        let client: Arc<dyn LlmClient> = Arc::new(OpenAiCompatClient::from_config(&config.llm)?);
        Ok(Self::with_client(config, store, client))
    }

    pub fn with_client(config: &Config, store: Arc<dyn DocumentStore>, client: Arc<dyn LlmClient>) -> Self {
        let llm = Arc::new(LlmToolkit::new(client.clone(), &config.llm, &config.agent));
        let oracle: Arc<dyn DecisionOracle> = match config.agent.oracle {
            OracleKind::Llm => Arc::new(LlmOracle::new(client)),
            OracleKind::Rules => Arc::new(RuleOracle),
        };
        Self::new(
            store,
            oracle,
            Toolkit::from_llm(llm.clone()),
            PipelineConfig::from_config(config),
        )
        .with_transcriber(llm)
    }

    pub fn with_transcriber(mut self, transcriber: Arc<dyn Transcriber>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    /// Loads a file from disk and ingests its content.
    pub async fn ingest_path(
        &self,
        path: &Path,
        progress: &dyn ProgressReporter,
    ) -> Result<IngestOutcome, DocAgentError> {
        let loaded = self
            .processors
            .load(path, self.transcriber.as_deref())
            .await?;
        self.ingest(&loaded.filename, loaded.content, progress).await
    }

    /// Runs one document through the dedup gate and the decision loop.
    ///
    /// Only a store failure at the gate is an `Err`. Every other fault ends
    /// up in the returned outcome.
    pub async fn ingest(
        &self,
        filename: &str,
        content: impl Into<String>,
        progress: &dyn ProgressReporter,
    ) -> Result<IngestOutcome, DocAgentError> {
        let content = content.into();
        let fingerprint = fingerprint(&content);
        let filename = sanitize::redact_path(Path::new(filename));

        let state = ProcessingState::with_fingerprint(filename.as_str(), content, fingerprint.as_str());
        if self.gate.admit(state.id(), &filename, &fingerprint)? == Claim::Duplicate {
            info!(
                filename = %filename,
                fingerprint = sanitize::short_hash(&fingerprint),
                "Skipping duplicate document"
            );
            progress.report(ProgressEvent::Duplicate {
                filename: filename.clone(),
                fingerprint: fingerprint.clone(),
            });
            return Ok(IngestOutcome::Skipped {
                filename,
                fingerprint,
            });
        }

        let span = info_span!("ingest", doc_id = %state.id(), filename = %filename);
        let report = self.run_loop(state, progress).instrument(span).await;

        if !report.outcome.is_saved() {
            if let Err(e) = self.gate.release(report.state.id()) {
                warn!(doc_id = %report.state.id(), error = %e, "Failed to release fingerprint claim");
            }
        }

        Ok(IngestOutcome::Processed(report))
    }

    async fn run_loop(&self, mut state: ProcessingState, progress: &dyn ProgressReporter) -> IngestReport {
        progress.report(ProgressEvent::Started {
            id: state.id().to_string(),
            filename: state.filename().to_string(),
        });

        let mut outcome = LoopOutcome::StoppedBudget;
        let mut steps = 0;

        for step in 1..=self.config.max_steps {
            steps = step;
            let projection = StateProjection::from_state(&state, self.config.preview_chars);
            let decision = self.oracle.decide(&projection).await;
            debug!(step, action = %decision.action, reasoning = %decision.reasoning, "Oracle decided");
            progress.report(ProgressEvent::Step {
                step,
                action: decision.action.name().to_string(),
                reasoning: decision.reasoning.clone(),
            });

            if decision.action.is_stop() {
                if decision.is_error() {
                    warn!(step, reasoning = %decision.reasoning, "Oracle fault, stopping");
                }
                outcome = LoopOutcome::StoppedExplicit {
                    reasoning: decision.reasoning,
                };
                break;
            }

            let result = self.executor.execute(&decision.action, &mut state).await;
            state.record_action(decision.action.name());

            match &result {
                ActionOutcome::Classified(document_type)
                | ActionOutcome::ImageAnalyzed(document_type) => {
                    progress.report(ProgressEvent::Classified {
                        document_type: *document_type,
                    });
                }
                _ => {}
            }

            if let Some(error) = result.error() {
                warn!(step, action = %decision.action, error, "Action failed");
                progress.report(ProgressEvent::ActionFailed {
                    action: decision.action.name().to_string(),
                    error: error.to_string(),
                });
            }

            if result.is_terminal() {
                outcome = match result {
                    ActionOutcome::SaveFailed(message) => LoopOutcome::SavedFailed { message },
                    _ => LoopOutcome::SavedOk,
                };
                break;
            }

            if !self.config.step_delay.is_zero() && step < self.config.max_steps {
                tokio::time::sleep(self.config.step_delay).await;
            }
        }

        if outcome == LoopOutcome::StoppedBudget {
            warn!(max_steps = self.config.max_steps, "Step budget exhausted before completion");
        }
        info!(%outcome, steps, history = ?state.history(), "Decision loop finished");
        progress.report(ProgressEvent::Finished {
            outcome: outcome.clone(),
        });

        IngestReport {
            state,
            outcome,
            steps,
        }
    }
}
