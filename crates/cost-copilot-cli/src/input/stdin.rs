use std::io::{self, Read};

use cost_copilot_core::data::Dataset;

/// Parse a JSON dataset piped on stdin.
/// Returns None if stdin is a TTY or nothing was piped.
pub fn read_stdin_dataset() -> Result<Option<Dataset>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_dataset(&buffer)
}

fn parse_dataset(text: &str) -> Result<Option<Dataset>, Box<dyn std::error::Error>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value: serde_json::Value = serde_json::from_str(trimmed)
        .map_err(|e| format!("stdin is not a JSON dataset: {}", e))?;
    Ok(Some(Dataset::from_json(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input_is_no_dataset() {
        assert!(parse_dataset("  \n").unwrap().is_none());
    }

    #[test]
    fn test_piped_dataset() {
        let text = r#"{
            "bom": [{"ProductID": "P1", "ProductName": "Widget", "Component": "Steel",
                     "Quantity": "2", "Unit": "kg", "Region": "Texas",
                     "AnnualVolume": "100", "CurrentSellingPrice": "12"}],
            "rates": [{"CostDriver": "Steel", "Region": "Texas", "Rate": "2",
                       "Per_Unit": "kg", "Feasibility": "4"}]
        }"#;
        let dataset = parse_dataset(text).unwrap().unwrap();
        assert_eq!(dataset.bom.len(), 1);
        assert_eq!(dataset.rates[0].cost_driver, "Steel");
    }

    #[test]
    fn test_invalid_dataset_is_rejected() {
        let text = r#"{"bom": [], "rates": [
            {"CostDriver": "Steel", "Region": "Texas", "Rate": "2",
             "Per_Unit": "kg", "Feasibility": "4"},
            {"CostDriver": "Steel", "Region": "Texas", "Rate": "3",
             "Per_Unit": "kg", "Feasibility": "4"}
        ]}"#;
        assert!(parse_dataset(text).is_err());
    }
}
