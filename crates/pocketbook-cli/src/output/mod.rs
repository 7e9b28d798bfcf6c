pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Render a single value as text. Tagged projections such as
/// `{"kind": "finite", "months": 22}` collapse to `22`, `never` or `n/a`.
pub(crate) fn render_scalar(value: &Value, null: &str) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => null.to_string(),
        Value::Object(map) => render_tagged(map)
            .unwrap_or_else(|| serde_json::to_string(value).unwrap_or_default()),
        Value::Array(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

fn render_tagged(map: &Map<String, Value>) -> Option<String> {
    match map.get("kind")?.as_str()? {
        "finite" => map
            .iter()
            .find(|(key, _)| key.as_str() != "kind")
            .map(|(_, inner)| render_scalar(inner, "")),
        "unbounded" => Some("never".to_string()),
        "not_applicable" => Some("n/a".to_string()),
        _ => None,
    }
}

/// The `rows` array of a tabular result (amortization schedule), if any.
pub(crate) fn result_rows(result: &Value) -> Option<&[Value]> {
    result.get("rows")?.as_array().map(Vec::as_slice)
}
