pub mod csv_out;
pub mod minimal;
pub mod serialized;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => serialized::print_json(value),
        OutputFormat::Yaml => serialized::print_yaml(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The `result` object of an envelope, or the value itself.
pub(crate) fn result_object(value: &Value) -> Option<&Map<String, Value>> {
    match value.get("result") {
        Some(Value::Object(map)) => Some(map),
        _ => value.as_object(),
    }
}

/// First field holding a non-empty array of objects (products, impacts, plays).
pub(crate) fn primary_rows(map: &Map<String, Value>) -> Option<(&str, &[Value])> {
    map.iter().find_map(|(key, val)| match val {
        Value::Array(items) if matches!(items.first(), Some(Value::Object(_))) => {
            Some((key.as_str(), items.as_slice()))
        }
        _ => None,
    })
}

/// Scalars as plain text, containers as compact JSON.
pub(crate) fn scalar_text(value: &Value, null: &str) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => null.to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
