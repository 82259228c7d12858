use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{result_object, scalar_text};

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    print!("{}", render(value));
}

/// Scalar fields as a Field/Value table, then one table per list of
/// records, then envelope warnings and methodology.
fn render(value: &Value) -> String {
    let Some(map) = result_object(value) else {
        return format!("{}\n", value);
    };

    let mut out = String::new();
    let scalars: Vec<(&String, &Value)> = map.iter().filter(|(_, v)| !is_record_list(v)).collect();
    if !scalars.is_empty() {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in scalars {
            builder.push_record([key.clone(), cell(val)]);
        }
        out.push_str(&format!("{}\n", Table::from(builder)));
    }

    for (key, val) in map {
        if let Value::Array(rows) = val {
            if is_record_list(val) {
                out.push_str(&format!("\n{}:\n{}\n", key, records_table(rows)));
            }
        }
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            out.push_str("\nWarnings:\n");
            for w in warnings.iter().filter_map(Value::as_str) {
                out.push_str(&format!("  - {}\n", w));
            }
        }
    }
    if let Some(Value::String(meth)) = value.get("methodology") {
        out.push_str(&format!("\nMethodology: {}\n", meth));
    }
    out
}

fn is_record_list(value: &Value) -> bool {
    matches!(value, Value::Array(items) if matches!(items.first(), Some(Value::Object(_))))
}

fn records_table(rows: &[Value]) -> Table {
    let headers: Vec<String> = match rows.first() {
        Some(Value::Object(first)) => first.keys().cloned().collect(),
        _ => Vec::new(),
    };
    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for row in rows.iter().filter_map(Value::as_object) {
        builder.push_record(headers.iter().map(|h| field(row, h)));
    }
    Table::from(builder)
}

fn field(row: &Map<String, Value>, key: &str) -> String {
    row.get(key).map(cell).unwrap_or_default()
}

fn cell(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|v| scalar_text(v, "null"))
            .collect::<Vec<_>>()
            .join(", "),
        other => scalar_text(other, "null"),
    }
}
