use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::error::{CostCopilotError, UnitMismatch};
use crate::types::*;
use crate::CostCopilotResult;

/// Driver pre-selected in the scenario picker when present.
pub const PREFERRED_DEFAULT_DRIVER: &str = "Semiconductors";

/// Where the two record sets live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSource {
    pub bom_path: PathBuf,
    pub rates_path: PathBuf,
}

impl Default for DataSource {
    fn default() -> Self {
        DataSource {
            bom_path: PathBuf::from("data/bom_products.csv"),
            rates_path: PathBuf::from("data/manual_cost_drivers.csv"),
        }
    }
}

/// A validated BOM and cost driver rate set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub bom: Vec<BomLineItem>,
    pub rates: Vec<CostDriverRate>,
}

impl Dataset {
    /// Read both CSV files and validate them.
    pub fn load(source: &DataSource) -> CostCopilotResult<Self> {
        let dataset = Dataset {
            bom: load_bom_csv(&source.bom_path)?,
            rates: load_rates_csv(&source.rates_path)?,
        };
        info!(
            bom_rows = dataset.bom.len(),
            rate_rows = dataset.rates.len(),
            "loaded data files"
        );
        if let Err(e) = validate_dataset(&dataset) {
            error!(error = %e, "data validation failed");
            return Err(e);
        }
        info!("data validation passed");
        Ok(dataset)
    }

    /// Parse a `{ "bom": [...], "rates": [...] }` document and validate it.
    ///
    /// Decimal fields are exact when written as JSON strings. Bare JSON
    /// numbers are read as `f64` first and keep only what it can hold.
    pub fn from_json(value: serde_json::Value) -> CostCopilotResult<Self> {
        let dataset: Dataset = serde_json::from_value(value)?;
        validate_dataset(&dataset)?;
        Ok(dataset)
    }

    /// Distinct cost driver names, sorted.
    pub fn cost_drivers(&self) -> Vec<String> {
        self.rates
            .iter()
            .map(|r| r.cost_driver.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// `Semiconductors` when available, otherwise the first sorted driver.
    pub fn default_driver(&self) -> Option<String> {
        let drivers = self.cost_drivers();
        if drivers.iter().any(|d| d == PREFERRED_DEFAULT_DRIVER) {
            return Some(PREFERRED_DEFAULT_DRIVER.to_string());
        }
        drivers.into_iter().next()
    }
}

pub fn load_bom_csv(path: &Path) -> CostCopilotResult<Vec<BomLineItem>> {
    read_csv(path)
}

pub fn load_rates_csv(path: &Path) -> CostCopilotResult<Vec<CostDriverRate>> {
    read_csv(path)
}

/// Read a `{ "bom": [...], "rates": [...] }` JSON file and validate it.
pub fn load_dataset_json(path: &Path) -> CostCopilotResult<Dataset> {
    let contents = fs::read_to_string(path).map_err(|e| data_file_error(path, e.to_string()))?;
    let value: serde_json::Value = serde_json::from_str(&contents)?;
    Dataset::from_json(value)
}

fn read_csv<T: DeserializeOwned>(path: &Path) -> CostCopilotResult<Vec<T>> {
    if !path.is_file() {
        return Err(data_file_error(path, "file not found".into()));
    }
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| data_file_error(path, e.to_string()))?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        let record = text_record(&headers, &row)
            .map_err(|e| data_file_error(path, format!("line {line}: {e}")))?;
        records.push(record);
    }
    Ok(records)
}

/// Deserialize a row with every field kept as its original text, so
/// decimal columns go through `Decimal::from_str` and never through `f64`.
fn text_record<T: DeserializeOwned>(
    headers: &csv::StringRecord,
    row: &csv::StringRecord,
) -> Result<T, serde_json::Error> {
    let fields: serde_json::Map<String, serde_json::Value> = headers
        .iter()
        .zip(row.iter())
        .map(|(h, v)| (h.to_string(), serde_json::Value::String(v.to_string())))
        .collect();
    serde_json::from_value(serde_json::Value::Object(fields))
}

fn data_file_error(path: &Path, reason: String) -> CostCopilotError {
    CostCopilotError::DataFile {
        path: path.display().to_string(),
        reason,
    }
}

/// Check the invariants the calculation passes assume:
/// unique `(driver, region)` rate rows, non-negative quantities, and BOM
/// units agreeing with the `Per_Unit` of every matching driver row.
pub fn validate_dataset(dataset: &Dataset) -> CostCopilotResult<()> {
    let mut pairs: HashSet<(&str, &str)> = HashSet::new();
    for r in &dataset.rates {
        if !pairs.insert((r.cost_driver.as_str(), r.region.as_str())) {
            return Err(CostCopilotError::DuplicateRate {
                driver: r.cost_driver.clone(),
                region: r.region.clone(),
            });
        }
    }

    if let Some(line) = dataset.bom.iter().find(|l| l.quantity < Decimal::ZERO) {
        return Err(CostCopilotError::InvalidInput {
            field: format!("bom:{}:{} quantity", line.product_id, line.component),
            reason: "Quantity must be non-negative".into(),
        });
    }

    let mut mismatches: Vec<UnitMismatch> = Vec::new();
    for line in &dataset.bom {
        for r in dataset
            .rates
            .iter()
            .filter(|r| r.cost_driver == line.component && r.per_unit != line.unit)
        {
            let m = UnitMismatch {
                component: line.component.clone(),
                bom_unit: line.unit.clone(),
                rate_unit: r.per_unit.clone(),
            };
            if !mismatches.contains(&m) {
                mismatches.push(m);
            }
        }
    }
    if !mismatches.is_empty() {
        return Err(CostCopilotError::UnitMismatch { mismatches });
    }

    Ok(())
}
