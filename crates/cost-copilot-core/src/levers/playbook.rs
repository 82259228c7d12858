use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CostCopilotError;
use crate::types::*;
use crate::CostCopilotResult;

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

/// One improvement initiative for a cost component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Play {
    pub name: String,
    pub description: String,
    /// What the improvement percentage measures, e.g. "Price Reduction (%)"
    pub improvement_label: String,
}

/// Known plays for a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playbook {
    pub component: String,
    pub plays: Vec<Play>,
}

const CATALOGUE: &[(&str, &[(&str, &str, &str)])] = &[
    (
        "Machine Time",
        &[
            (
                "Increase Cycle Speed",
                "Run the machine faster to produce more units in the same amount of time.",
                "Cycle Speed Improvement (%)",
            ),
            (
                "Reduce Setup/Changeover Time",
                "Decrease the non-productive time between production runs.",
                "Setup Time Reduction (%)",
            ),
        ],
    ),
    (
        "Labor",
        &[
            (
                "Process Automation",
                "Introduce robotics or automation to reduce the manual labor time per unit.",
                "Labor Time Reduction (%)",
            ),
            (
                "Operator Training Program",
                "Invest in upskilling operators to improve efficiency and reduce errors.",
                "Efficiency Gain from Training (%)",
            ),
        ],
    ),
    (
        "Plastic",
        &[
            (
                "Negotiate with Suppliers",
                "Leverage volume purchasing or longer-term contracts to secure a lower price per kg.",
                "Price Reduction (%)",
            ),
            (
                "Product Re-engineering (Light-weighting)",
                "Redesign the product to use less material without compromising quality.",
                "Material Usage Reduction (%)",
            ),
        ],
    ),
    (
        "Cardboard",
        &[
            (
                "Negotiate with Suppliers",
                "Leverage volume purchasing or longer-term contracts to secure a lower price per unit.",
                "Price Reduction (%)",
            ),
            (
                "Optimize Packaging Design (Right-Sizing)",
                "Redesign the box to use less material while maintaining structural integrity.",
                "Material Usage Reduction (%)",
            ),
        ],
    ),
    (
        "Steel",
        &[
            (
                "Source Alternative Suppliers",
                "Identify new or secondary suppliers to create price competition.",
                "Price Reduction (%)",
            ),
            (
                "Scrap Reduction Program",
                "Implement quality controls to reduce the amount of wasted steel from the manufacturing process.",
                "Waste Reduction (%)",
            ),
        ],
    ),
];

/// Playbook for `component`, or `None` when no plays are known.
pub fn playbook_for(component: &str) -> Option<Playbook> {
    CATALOGUE
        .iter()
        .find(|(name, _)| *name == component)
        .map(|(name, plays)| Playbook {
            component: name.to_string(),
            plays: plays
                .iter()
                .map(|(n, d, l)| Play {
                    name: n.to_string(),
                    description: d.to_string(),
                    improvement_label: l.to_string(),
                })
                .collect(),
        })
}

/// Components that have a playbook.
pub fn playbook_components() -> Vec<&'static str> {
    CATALOGUE.iter().map(|(name, _)| *name).collect()
}

// ---------------------------------------------------------------------------
// Play economics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayEvaluationInput {
    /// Current cost of the component per product unit
    pub base_cost_per_unit: Money,
    pub annual_volume: Decimal,
    /// Expected improvement, 0..=100
    pub improvement_pct: Percent,
    /// One-off project cost to implement the play
    pub project_cost: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayEvaluation {
    pub cost_saving_per_unit: Money,
    pub total_annual_savings: Money,
    /// (savings - project_cost) / project_cost * 100; `None` when the
    /// project is free (unbounded return)
    pub roi_pct: Option<Percent>,
    /// Months of savings needed to recover the project cost; zero for a
    /// free project, `None` when the play saves nothing
    pub payback_months: Option<Decimal>,
}

/// Annual savings, ROI and payback period of a play.
pub fn evaluate_play(
    input: &PlayEvaluationInput,
) -> CostCopilotResult<ComputationOutput<PlayEvaluation>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.improvement_pct < Decimal::ZERO || input.improvement_pct > Decimal::ONE_HUNDRED {
        return Err(CostCopilotError::InvalidInput {
            field: "improvement_pct".into(),
            reason: "Must be between 0 and 100".into(),
        });
    }
    if input.base_cost_per_unit < Decimal::ZERO {
        return Err(CostCopilotError::InvalidInput {
            field: "base_cost_per_unit".into(),
            reason: "Must be non-negative".into(),
        });
    }
    if input.annual_volume < Decimal::ZERO {
        return Err(CostCopilotError::InvalidInput {
            field: "annual_volume".into(),
            reason: "Must be non-negative".into(),
        });
    }
    if input.project_cost < Decimal::ZERO {
        return Err(CostCopilotError::InvalidInput {
            field: "project_cost".into(),
            reason: "Must be non-negative".into(),
        });
    }

    let cost_saving_per_unit =
        input.base_cost_per_unit * input.improvement_pct / Decimal::ONE_HUNDRED;
    let total_annual_savings = cost_saving_per_unit * input.annual_volume;

    let (roi_pct, payback_months) = if input.project_cost > Decimal::ZERO {
        let roi = (total_annual_savings - input.project_cost) / input.project_cost
            * Decimal::ONE_HUNDRED;
        let payback = if total_annual_savings > Decimal::ZERO {
            Some(input.project_cost / total_annual_savings * dec!(12))
        } else {
            warnings.push("Play produces no savings; project cost is never recovered".into());
            None
        };
        (Some(roi), payback)
    } else {
        (None, Some(Decimal::ZERO))
    };

    let output = PlayEvaluation {
        cost_saving_per_unit,
        total_annual_savings,
        roi_pct,
        payback_months,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Improvement Play ROI and Payback",
        &serde_json::json!({
            "improvement_pct": input.improvement_pct.to_string(),
            "project_cost": input.project_cost.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}
