pub mod costing;
pub mod error;
pub mod types;

#[cfg(feature = "portfolio")]
pub mod portfolio;

#[cfg(feature = "levers")]
pub mod levers;

#[cfg(feature = "loader")]
pub mod data;

#[cfg(feature = "briefing")]
pub mod report;

pub use error::CostCopilotError;
pub use types::*;

/// Standard result type for all cost-copilot operations
pub type CostCopilotResult<T> = Result<T, CostCopilotError>;
