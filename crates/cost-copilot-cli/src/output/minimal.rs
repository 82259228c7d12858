use serde_json::Value;

use super::{result_object, scalar_text};

/// Headline field per command, in priority order.
const PRIORITY_KEYS: [&str; 6] = [
    "narrative",
    "selected_lever",
    "total_pnl_impact",
    "total_cost",
    "total_annual_savings",
    "default_driver",
];

/// Print just the key answer from the output.
///
/// Falls back to one `id name margin%` line per product for health output,
/// then to the first field of the result.
pub fn print_minimal(value: &Value) {
    println!("{}", render(value));
}

fn render(value: &Value) -> String {
    let Some(map) = result_object(value) else {
        return scalar_text(value, "null");
    };

    for key in PRIORITY_KEYS {
        if let Some(val) = map.get(key) {
            if !val.is_null() {
                return scalar_text(val, "null");
            }
        }
    }

    if let Some(Value::Array(products)) = map.get("products") {
        return products
            .iter()
            .map(|p| {
                format!(
                    "{} {} {}%",
                    scalar_text(&p["product_id"], "?"),
                    scalar_text(&p["product_name"], "?"),
                    scalar_text(&p["margin_pct"], "?")
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
    }

    match map.iter().next() {
        Some((key, val)) => format!("{}: {}", key, scalar_text(val, "null")),
        None => String::new(),
    }
}
