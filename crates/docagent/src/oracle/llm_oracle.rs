use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use super::{parse_decision, Decision, DecisionOracle, StateProjection};
use crate::capability::prompts;
use crate::llm::prompt::sanitize_for_prompt;
use crate::llm::{ChatRequest, LlmClient};

/// Asks a chat model for the next action.
pub struct LlmOracle {
    client: Arc<dyn LlmClient>,
}

impl LlmOracle {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }

    fn build_request(projection: &StateProjection) -> Result<ChatRequest, serde_json::Error> {
        let mut projection = projection.clone();
        projection.content_preview = sanitize_for_prompt(&projection.content_preview);
        let state_json = serde_json::to_string_pretty(&projection)?;
        Ok(ChatRequest::new(prompts::decide(&state_json))
            .with_system(prompts::AGENT_SYSTEM)
            .json())
    }
}

#[async_trait]
impl DecisionOracle for LlmOracle {
    async fn decide(&self, projection: &StateProjection) -> Decision {
        let request = match Self::build_request(projection) {
            Ok(request) => request,
            Err(e) => return Decision::stop_with_error(e),
        };

        match self.client.complete(request).await {
            Ok(raw) => {
                let decision = parse_decision(&raw);
                if decision.is_error() {
                    warn!(reasoning = %decision.reasoning, "Oracle reply rejected");
                }
                decision
            }
            Err(e) => {
                warn!(error = %e, "Oracle request failed");
                Decision::stop_with_error(e)
            }
        }
    }
}
