//! The deterministic decision policy and an oracle that applies it directly.

use async_trait::async_trait;

use super::{Decision, DecisionOracle, StateProjection};
use crate::pipeline::action::{Action, SAVE_DATA};

/// Next action for a projection.
///
/// Total over every type label: unrecognized types fall through to the
/// generic summary.
pub fn next_action(projection: &StateProjection) -> Decision {
    if projection.history.iter().any(|a| a == SAVE_DATA) {
        return Decision::new(Action::Stop, "Data has been saved");
    }

    let document_type = match projection.classified_type() {
        Some(t) => t,
        None => {
            return Decision::new(Action::ClassifyDocument, "Document type is missing");
        }
    };

    let kind = match document_type.extraction_kind() {
        Some(kind) => kind,
        None => {
            return Decision::new(
                Action::AnalyzeImage,
                "Image content must be analyzed before extraction",
            );
        }
    };

    if projection.has_data(kind) {
        Decision::new(
            Action::SaveData,
            format!("{} data is present", document_type.as_label()),
        )
    } else {
        Decision::new(
            Action::extraction(kind),
            format!("{} needs {} extraction", document_type.as_label(), kind),
        )
    }
}

/// Offline oracle applying [`next_action`]. Never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleOracle;

#[async_trait]
impl DecisionOracle for RuleOracle {
    async fn decide(&self, projection: &StateProjection) -> Decision {
        next_action(projection)
    }
}
