use super::Decision;
use crate::llm::prompt::parse_json_object;
use crate::pipeline::action::Action;

/// Validates raw oracle output.
///
/// The reply must be a JSON object (code fences tolerated) with a non-empty
/// string `action`. Anything else becomes a STOP-with-error decision.
pub fn parse_decision(raw: &str) -> Decision {
    let object = match parse_json_object(raw) {
        Ok(object) => object,
        Err(reason) => return Decision::stop_with_error(reason),
    };

    let action = match object.get("action") {
        Some(serde_json::Value::String(name)) if !name.trim().is_empty() => Action::parse(name),
        Some(serde_json::Value::String(_)) => {
            return Decision::stop_with_error("decision has an empty 'action'")
        }
        Some(_) => return Decision::stop_with_error("decision 'action' is not a string"),
        None => return Decision::stop_with_error("decision is missing 'action'"),
    };

    let reasoning = match object.get("reasoning") {
        Some(serde_json::Value::String(text)) => text.clone(),
        Some(serde_json::Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };

    Decision::new(action, reasoning)
}
