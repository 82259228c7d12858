use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::costing::rates::{RateSource, RateTable};
use crate::types::*;

/// Per-unit cost of one product under one rate table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitCost {
    pub total_cost: Money,
    /// Component -> accumulated cost; present only when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<BTreeMap<String, Money>>,
    /// Components priced at zero because no specific or Default rate exists
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unresolved_components: Vec<String>,
}

/// Sum `quantity * rate` over the BOM lines of `product_id`.
///
/// An unknown product costs zero. Components without a rate in `region`
/// or `Default` contribute zero and are listed in `unresolved_components`.
pub fn calculate_unit_cost(
    product_id: &str,
    bom: &[BomLineItem],
    rates: &RateTable,
    region: &str,
    with_breakdown: bool,
) -> UnitCost {
    let mut total_cost = Decimal::ZERO;
    let mut breakdown = with_breakdown.then(BTreeMap::new);
    let mut unresolved_components: Vec<String> = Vec::new();

    for item in bom.iter().filter(|l| l.product_id == product_id) {
        let resolution = rates.resolve_detailed(&item.component, region);
        if resolution.source == RateSource::Unresolved
            && !unresolved_components.contains(&item.component)
        {
            unresolved_components.push(item.component.clone());
        }

        let line_cost = item.quantity * resolution.rate;
        total_cost += line_cost;

        if let Some(ref mut map) = breakdown {
            *map.entry(item.component.clone()).or_insert(Decimal::ZERO) += line_cost;
        }
    }

    UnitCost {
        total_cost,
        breakdown,
        unresolved_components,
    }
}

/// Input for a standalone unit-cost request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitCostInput {
    pub product_id: String,
    pub bom: Vec<BomLineItem>,
    pub rates: Vec<CostDriverRate>,
    /// Region to price in; defaults to the product's own region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default = "default_true")]
    pub breakdown: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitCostOutput {
    pub product_id: String,
    /// False when no BOM line references the product
    pub found: bool,
    pub region: String,
    #[serde(flatten)]
    pub cost: UnitCost,
}

/// Price one product against the given rate set, wrapped in the standard
/// envelope. Unresolved components become warnings.
pub fn unit_cost_report(input: &UnitCostInput) -> ComputationOutput<UnitCostOutput> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let first_line = input.bom.iter().find(|l| l.product_id == input.product_id);
    if first_line.is_none() {
        warnings.push(format!(
            "Product '{}' has no BOM lines; unit cost is zero",
            input.product_id
        ));
    }

    let region = input
        .region
        .clone()
        .or_else(|| first_line.map(|l| l.region.clone()))
        .unwrap_or_else(|| DEFAULT_REGION.to_string());

    let table = RateTable::from_records(&input.rates);
    let cost = calculate_unit_cost(
        &input.product_id,
        &input.bom,
        &table,
        &region,
        input.breakdown,
    );

    for component in &cost.unresolved_components {
        warnings.push(format!(
            "No rate for '{component}' in region '{region}' or '{DEFAULT_REGION}'; priced at zero"
        ));
    }

    let output = UnitCostOutput {
        product_id: input.product_id.clone(),
        found: first_line.is_some(),
        region: region.clone(),
        cost,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "BOM Unit Cost (region rate with Default fallback)",
        &serde_json::json!({
            "region": region,
            "rate_pairs": table.len(),
            "breakdown": input.breakdown,
        }),
        warnings,
        elapsed,
        output,
    )
}
