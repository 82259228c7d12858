use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::costing::{calculate_unit_cost, RateTable};
use crate::portfolio::products::unique_products;
use crate::types::*;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for portfolio health analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthInput {
    pub bom: Vec<BomLineItem>,
    pub rates: Vec<CostDriverRate>,
}

/// Current profitability of one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductHealth {
    pub product_id: String,
    pub product_name: String,
    pub region: String,
    pub selling_price: Money,
    pub unit_cost: Money,
    /// selling_price - unit_cost
    pub margin_amount: Money,
    /// margin_amount / selling_price * 100; zero when price <= 0
    pub margin_pct: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthOutput {
    /// Ranked most profitable first (descending margin %)
    pub products: Vec<ProductHealth>,
}

impl HealthOutput {
    /// The `n` highest-margin products.
    pub fn stars(&self, n: usize) -> Vec<ProductHealth> {
        self.products.iter().take(n).cloned().collect()
    }

    /// The `n` lowest-margin products, worst first.
    pub fn at_risk(&self, n: usize) -> Vec<ProductHealth> {
        let mut ascending = self.products.clone();
        ascending.sort_by(|a, b| a.margin_pct.cmp(&b.margin_pct));
        ascending.truncate(n);
        ascending
    }
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

/// Margin of every distinct product at current rates, ranked by margin %.
///
/// Products priced at or below zero report a 0% margin. Components with no
/// resolvable rate are priced at zero and reported as warnings.
pub fn analyze_portfolio_health(input: &HealthInput) -> ComputationOutput<HealthOutput> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let products = unique_products(&input.bom);
    let rates = RateTable::from_records(&input.rates);
    debug!(
        products = products.len(),
        rate_pairs = rates.len(),
        "analyzing portfolio health"
    );

    let mut health = Vec::with_capacity(products.len());
    for product in &products {
        let cost = calculate_unit_cost(
            &product.product_id,
            &input.bom,
            &rates,
            &product.region,
            false,
        );
        for component in &cost.unresolved_components {
            warnings.push(unresolved_warning(product, component));
        }

        let margin_amount = product.current_selling_price - cost.total_cost;
        let margin_pct = if product.current_selling_price > Decimal::ZERO {
            margin_amount / product.current_selling_price * Decimal::ONE_HUNDRED
        } else {
            warnings.push(format!(
                "Product '{}' has non-positive selling price; margin % reported as 0",
                product.product_id
            ));
            Decimal::ZERO
        };

        health.push(ProductHealth {
            product_id: product.product_id.clone(),
            product_name: product.product_name.clone(),
            region: product.region.clone(),
            selling_price: product.current_selling_price,
            unit_cost: cost.total_cost,
            margin_amount,
            margin_pct,
        });
    }

    // sort_by is stable: equal margins keep BOM order
    health.sort_by(|a, b| b.margin_pct.cmp(&a.margin_pct));

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Portfolio Health (current unit-cost margins)",
        &serde_json::json!({
            "num_products": products.len(),
            "num_rate_rows": input.rates.len(),
            "ranking": "margin_pct descending",
        }),
        warnings,
        elapsed,
        HealthOutput { products: health },
    )
}

pub(crate) fn unresolved_warning(product: &Product, component: &str) -> String {
    format!(
        "Product '{}': no rate for '{}' in region '{}' or '{}'; priced at zero",
        product.product_id, component, product.region, DEFAULT_REGION
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(product: &str, component: &str, qty: Decimal, price: Decimal) -> BomLineItem {
        BomLineItem {
            product_id: product.into(),
            product_name: format!("Product {product}"),
            component: component.into(),
            quantity: qty,
            unit: "unit".into(),
            region: "Texas".into(),
            annual_volume: dec!(1000),
            current_selling_price: price,
        }
    }

    fn rate(driver: &str, region: &str, value: Decimal) -> CostDriverRate {
        CostDriverRate {
            cost_driver: driver.into(),
            region: region.into(),
            rate: value,
            per_unit: "unit".into(),
            feasibility: dec!(5),
        }
    }

    fn sample_input() -> HealthInput {
        HealthInput {
            bom: vec![
                // P1: cost 9, price 10 => 10%
                line("P1", "Labor", dec!(10), dec!(10)),
                line("P1", "Steel", dec!(2), dec!(10)),
                // P2: cost 4, price 20 => 80%
                line("P2", "Steel", dec!(2), dec!(20)),
                // P3: cost 5, price 10 => 50%
                line("P3", "Labor", dec!(10), dec!(10)),
            ],
            rates: vec![
                rate("Labor", "Texas", dec!(0.5)),
                rate("Steel", "Texas", dec!(2.0)),
            ],
        }
    }

    #[test]
    fn test_margins() {
        let out = analyze_portfolio_health(&sample_input());
        let p1 = out
            .result
            .products
            .iter()
            .find(|p| p.product_id == "P1")
            .unwrap();
        assert_eq!(p1.unit_cost, dec!(9));
        assert_eq!(p1.margin_amount, dec!(1));
        assert_eq!(p1.margin_pct, dec!(10));
    }

    #[test]
    fn test_ranked_descending() {
        let out = analyze_portfolio_health(&sample_input());
        let ids: Vec<&str> = out
            .result
            .products
            .iter()
            .map(|p| p.product_id.as_str())
            .collect();
        assert_eq!(ids, vec!["P2", "P3", "P1"]);
        for pair in out.result.products.windows(2) {
            assert!(pair[0].margin_pct >= pair[1].margin_pct);
        }
    }

    #[test]
    fn test_zero_price_gives_zero_pct() {
        let input = HealthInput {
            bom: vec![line("P1", "Steel", dec!(1), dec!(0))],
            rates: vec![rate("Steel", "Texas", dec!(2))],
        };
        let out = analyze_portfolio_health(&input);
        let p = &out.result.products[0];
        assert_eq!(p.margin_pct, Decimal::ZERO);
        assert_eq!(p.margin_amount, dec!(-2));
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_equal_margins_keep_encounter_order() {
        let input = HealthInput {
            bom: vec![
                line("B", "Steel", dec!(1), dec!(4)),
                line("A", "Steel", dec!(1), dec!(4)),
                line("C", "Steel", dec!(1), dec!(8)),
            ],
            rates: vec![rate("Steel", "Texas", dec!(2))],
        };
        let out = analyze_portfolio_health(&input);
        let ids: Vec<&str> = out
            .result
            .products
            .iter()
            .map(|p| p.product_id.as_str())
            .collect();
        assert_eq!(ids, vec!["C", "B", "A"]);
    }

    #[test]
    fn test_stars_and_at_risk() {
        let out = analyze_portfolio_health(&sample_input());
        let stars = out.result.stars(2);
        assert_eq!(stars.len(), 2);
        assert_eq!(stars[0].product_id, "P2");

        let at_risk = out.result.at_risk(2);
        assert_eq!(at_risk[0].product_id, "P1");
        assert_eq!(at_risk[1].product_id, "P3");

        assert_eq!(out.result.at_risk(10).len(), 3);
    }

    #[test]
    fn test_missing_rate_warns() {
        let input = HealthInput {
            bom: vec![line("P1", "Copper", dec!(3), dec!(10))],
            rates: vec![],
        };
        let out = analyze_portfolio_health(&input);
        assert_eq!(out.result.products[0].margin_pct, dec!(100));
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("Copper"));
    }

    #[test]
    fn test_empty_portfolio() {
        let input = HealthInput {
            bom: vec![],
            rates: vec![],
        };
        let out = analyze_portfolio_health(&input);
        assert!(out.result.products.is_empty());
    }
}
