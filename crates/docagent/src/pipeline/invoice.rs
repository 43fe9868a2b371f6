//! Local arithmetic over extracted invoice fields.
//!
//! Model output is not trusted for sums: the subtotal is always recomputed
//! from the line items.

use serde_json::Value;

use crate::db::normalize::parse_amount;
use crate::document::FieldMap;

/// Sum of the per-row `total` values, rounded to cents.
///
/// Rows whose total is missing or unparsable are skipped.
pub fn line_item_subtotal(fields: &FieldMap) -> f64 {
    let sum: f64 = fields
        .get("line_items")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| parse_amount(item.get("total")))
                .sum()
        })
        .unwrap_or(0.0);
    round_cents(sum)
}

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn is_falsy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(a)) => a.is_empty(),
        Some(Value::Object(o)) => o.is_empty(),
    }
}

/// Writes `subtotal` and, when the model gave none, `total_amount`.
pub fn apply_computed_totals(fields: &mut FieldMap) {
    let subtotal = line_item_subtotal(fields);
    fields.insert("subtotal".to_string(), Value::from(subtotal));
    if is_falsy(fields.get("total_amount")) {
        fields.insert("total_amount".to_string(), Value::from(subtotal));
    }
}
