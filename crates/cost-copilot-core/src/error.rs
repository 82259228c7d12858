use thiserror::Error;

/// A BOM component whose unit of measure disagrees with its cost driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitMismatch {
    pub component: String,
    pub bom_unit: String,
    pub rate_unit: String,
}

impl std::fmt::Display for UnitMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (BOM unit '{}', rate unit '{}')",
            self.component, self.bom_unit, self.rate_unit
        )
    }
}

#[derive(Debug, Error)]
pub enum CostCopilotError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Duplicate cost driver rate for ({driver}, {region})")]
    DuplicateRate { driver: String, region: String },

    #[error("Unit mismatch between BOM and cost drivers: {}", format_mismatches(.mismatches))]
    UnitMismatch { mismatches: Vec<UnitMismatch> },

    #[error("Data file error: {path} — {reason}")]
    DataFile { path: String, reason: String },

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Narrative generation failed: {0}")]
    Narrative(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

fn format_mismatches(mismatches: &[UnitMismatch]) -> String {
    mismatches
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<serde_json::Error> for CostCopilotError {
    fn from(e: serde_json::Error) -> Self {
        CostCopilotError::SerializationError(e.to_string())
    }
}

#[cfg(feature = "loader")]
impl From<csv::Error> for CostCopilotError {
    fn from(e: csv::Error) -> Self {
        CostCopilotError::Csv(e.to_string())
    }
}
