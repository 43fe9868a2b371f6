//! Decision oracles: propose the next action from a projection of state.
//!
//! An oracle is untrusted. `decide` is infallible: any fault becomes a
//! `STOP` decision whose reasoning starts with `Error:`.

pub mod llm_oracle;
pub mod parse;
pub mod policy;
pub mod projection;

use async_trait::async_trait;

use crate::pipeline::action::Action;

pub use llm_oracle::LlmOracle;
pub use parse::parse_decision;
pub use policy::{next_action, RuleOracle};
pub use projection::{StateProjection, MISSING_TYPE};

/// An oracle's proposal for the next turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub action: Action,
    pub reasoning: String,
}

impl Decision {
    pub fn new(action: Action, reasoning: impl Into<String>) -> Self {
        Self {
            action,
            reasoning: reasoning.into(),
        }
    }

    /// A stop decision carrying a fault description.
    pub fn stop_with_error(error: impl std::fmt::Display) -> Self {
        Self {
            action: Action::Stop,
            reasoning: format!("Error: {}", error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.action.is_stop() && self.reasoning.starts_with("Error:")
    }
}

#[async_trait]
pub trait DecisionOracle: Send + Sync {
    async fn decide(&self, projection: &StateProjection) -> Decision;
}
