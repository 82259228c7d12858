use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::costing::{calculate_unit_cost, RateTable};
use crate::error::CostCopilotError;
use crate::portfolio::health::unresolved_warning;
use crate::portfolio::products::unique_products;
use crate::types::*;
use crate::CostCopilotResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for a single-driver portfolio scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationInput {
    pub bom: Vec<BomLineItem>,
    pub rates: Vec<CostDriverRate>,
    pub scenario: Scenario,
}

/// Annual profit effect of the scenario on one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImpact {
    pub product_id: String,
    pub product_name: String,
    pub annual_volume: Decimal,
    pub baseline_unit_cost: Money,
    pub scenario_unit_cost: Money,
    pub baseline_profit: Money,
    pub scenario_profit: Money,
    /// scenario_profit - baseline_profit
    pub pnl_impact: Money,
    /// pnl_impact / annual_volume; zero when volume <= 0
    pub per_unit_impact: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub scenario_description: String,
    pub total_baseline_profit: Money,
    pub total_scenario_profit: Money,
    pub total_pnl_impact: Money,
    /// Ranked worst-hit first (ascending P&L impact)
    pub impacts: Vec<ProductImpact>,
}

impl SimulationOutput {
    /// The `n` most negatively affected products.
    pub fn most_impacted(&self, n: usize) -> Vec<ProductImpact> {
        self.impacts.iter().take(n).cloned().collect()
    }
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// Annual gross profit of the portfolio at current rates and with the
/// scenario's driver scaled in every region.
///
/// # Errors
///
/// The one failure is `InvalidInput` for a `change_pct` below -100, which
/// would drive rates negative. Missing rates, unknown drivers and zero
/// volumes still produce a result and are reported as warnings.
pub fn simulate_scenario(
    input: &SimulationInput,
) -> CostCopilotResult<ComputationOutput<SimulationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let scenario = &input.scenario;

    if scenario.change_pct < -Decimal::ONE_HUNDRED {
        return Err(CostCopilotError::InvalidInput {
            field: "scenario.change_pct".into(),
            reason: format!(
                "Change of {}% would make {} rates negative",
                scenario.change_pct, scenario.driver
            ),
        });
    }

    if !input.rates.iter().any(|r| r.cost_driver == scenario.driver) {
        warnings.push(format!(
            "Cost driver '{}' has no rate rows; scenario has no effect",
            scenario.driver
        ));
    }

    let products = unique_products(&input.bom);
    let baseline_rates = RateTable::from_records(&input.rates);
    let scenario_rates = RateTable::with_scenario(&input.rates, scenario);
    debug!(
        products = products.len(),
        driver = %scenario.driver,
        multiplier = %scenario.multiplier(),
        "simulating scenario"
    );

    let mut total_baseline_profit = Decimal::ZERO;
    let mut total_scenario_profit = Decimal::ZERO;
    let mut impacts = Vec::with_capacity(products.len());

    for product in &products {
        let baseline = calculate_unit_cost(
            &product.product_id,
            &input.bom,
            &baseline_rates,
            &product.region,
            false,
        );
        let perturbed = calculate_unit_cost(
            &product.product_id,
            &input.bom,
            &scenario_rates,
            &product.region,
            false,
        );
        // perturbation never changes resolvability, so report once
        for component in &baseline.unresolved_components {
            warnings.push(unresolved_warning(product, component));
        }

        let price = product.current_selling_price;
        let volume = product.annual_volume;
        let baseline_profit = (price - baseline.total_cost) * volume;
        let scenario_profit = (price - perturbed.total_cost) * volume;
        let pnl_impact = scenario_profit - baseline_profit;
        let per_unit_impact = if volume > Decimal::ZERO {
            pnl_impact / volume
        } else {
            Decimal::ZERO
        };

        total_baseline_profit += baseline_profit;
        total_scenario_profit += scenario_profit;

        impacts.push(ProductImpact {
            product_id: product.product_id.clone(),
            product_name: product.product_name.clone(),
            annual_volume: volume,
            baseline_unit_cost: baseline.total_cost,
            scenario_unit_cost: perturbed.total_cost,
            baseline_profit,
            scenario_profit,
            pnl_impact,
            per_unit_impact,
        });
    }

    impacts.sort_by(|a, b| a.pnl_impact.cmp(&b.pnl_impact));

    let output = SimulationOutput {
        scenario_description: scenario.description(),
        total_baseline_profit,
        total_scenario_profit,
        total_pnl_impact: total_scenario_profit - total_baseline_profit,
        impacts,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Portfolio Scenario Simulation (single driver, all regions)",
        &serde_json::json!({
            "driver": scenario.driver,
            "change_pct": scenario.change_pct.to_string(),
            "rate_multiplier": scenario.multiplier().to_string(),
            "num_products": products.len(),
            "ranking": "pnl_impact ascending",
        }),
        warnings,
        elapsed,
        output,
    ))
}
