use cost_copilot_core::costing::{calculate_unit_cost, RateSource, RateTable};
use cost_copilot_core::{BomLineItem, CostDriverRate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Unit cost tests
// ===========================================================================

fn bom_line(product: &str, component: &str, quantity: Decimal, region: &str) -> BomLineItem {
    BomLineItem {
        product_id: product.into(),
        product_name: format!("{product} assembly"),
        component: component.into(),
        quantity,
        unit: "unit".into(),
        region: region.into(),
        annual_volume: dec!(5000),
        current_selling_price: dec!(30),
    }
}

fn driver_rate(driver: &str, region: &str, rate: Decimal) -> CostDriverRate {
    CostDriverRate {
        cost_driver: driver.into(),
        region: region.into(),
        rate,
        per_unit: "unit".into(),
        feasibility: dec!(6),
    }
}

fn sample_bom() -> Vec<BomLineItem> {
    vec![
        bom_line("P1", "Labor", dec!(10), "Texas"),
        bom_line("P1", "Steel", dec!(2), "Texas"),
        bom_line("P2", "Plastic", dec!(1.25), "Ohio"),
        bom_line("P2", "Machine Time", dec!(0.4), "Ohio"),
        bom_line("P2", "Cardboard", dec!(1), "Ohio"),
    ]
}

fn sample_rates() -> Vec<CostDriverRate> {
    vec![
        driver_rate("Labor", "Texas", dec!(0.5)),
        driver_rate("Steel", "Texas", dec!(2.0)),
        driver_rate("Plastic", "Ohio", dec!(3.2)),
        driver_rate("Plastic", "Default", dec!(2.9)),
        driver_rate("Machine Time", "Default", dec!(45)),
    ]
}

#[test]
fn test_p1_texas_reference_case() {
    let table = RateTable::from_records(&sample_rates());
    let cost = calculate_unit_cost("P1", &sample_bom(), &table, "Texas", true);

    assert_eq!(cost.total_cost, dec!(9.0));
    let breakdown = cost.breakdown.expect("breakdown requested");
    assert_eq!(breakdown.get("Labor"), Some(&dec!(5.0)));
    assert_eq!(breakdown.get("Steel"), Some(&dec!(4.0)));
}

#[test]
fn test_total_equals_sum_of_quantity_times_rate() {
    let bom = sample_bom();
    let rates = sample_rates();
    let table = RateTable::from_records(&rates);

    for product in ["P1", "P2"] {
        let region = &bom.iter().find(|l| l.product_id == product).unwrap().region;
        let expected: Decimal = bom
            .iter()
            .filter(|l| l.product_id == product)
            .map(|l| l.quantity * table.resolve(&l.component, region))
            .sum();
        let cost = calculate_unit_cost(product, &bom, &table, region, false);
        assert_eq!(cost.total_cost, expected);
        assert!(cost.total_cost >= Decimal::ZERO);
    }
}

#[test]
fn test_breakdown_modes_agree() {
    let bom = sample_bom();
    let table = RateTable::from_records(&sample_rates());
    for (product, region) in [("P1", "Texas"), ("P2", "Ohio"), ("P2", "Texas")] {
        let with = calculate_unit_cost(product, &bom, &table, region, true);
        let without = calculate_unit_cost(product, &bom, &table, region, false);
        assert_eq!(with.total_cost, without.total_cost);
        let summed: Decimal = with.breakdown.unwrap().values().copied().sum();
        assert_eq!(summed, with.total_cost);
        assert!(without.breakdown.is_none());
    }
}

#[test]
fn test_p2_mixes_specific_default_and_missing_rates() {
    let table = RateTable::from_records(&sample_rates());
    let cost = calculate_unit_cost("P2", &sample_bom(), &table, "Ohio", true);

    // Plastic Ohio 1.25 * 3.2 = 4.0, Machine Time Default 0.4 * 45 = 18, Cardboard 0
    assert_eq!(cost.total_cost, dec!(22.0));
    let breakdown = cost.breakdown.unwrap();
    assert_eq!(breakdown["Cardboard"], Decimal::ZERO);
    assert_eq!(cost.unresolved_components, vec!["Cardboard".to_string()]);
}

#[test]
fn test_default_rate_not_zero_when_region_missing() {
    let table = RateTable::from_records(&sample_rates());
    let resolution = table.resolve_detailed("Plastic", "Nevada");
    assert_eq!(resolution.rate, dec!(2.9));
    assert_eq!(resolution.source, RateSource::Default);
}

#[test]
fn test_floor_is_exactly_zero() {
    let table = RateTable::from_records(&sample_rates());
    assert_eq!(table.resolve("Cardboard", "Ohio"), Decimal::ZERO);
    assert_eq!(table.resolve("Labor", "Ohio"), Decimal::ZERO);
}

#[test]
fn test_unknown_product() {
    let table = RateTable::from_records(&sample_rates());
    let cost = calculate_unit_cost("P404", &sample_bom(), &table, "Texas", true);
    assert_eq!(cost.total_cost, Decimal::ZERO);
    assert!(cost.breakdown.unwrap().is_empty());
    assert!(cost.unresolved_components.is_empty());
}

#[test]
fn test_zero_quantity_line_costs_nothing() {
    let bom = vec![bom_line("P1", "Steel", Decimal::ZERO, "Texas")];
    let table = RateTable::from_records(&sample_rates());
    let cost = calculate_unit_cost("P1", &bom, &table, "Texas", true);
    assert_eq!(cost.total_cost, Decimal::ZERO);
    assert_eq!(cost.breakdown.unwrap()["Steel"], Decimal::ZERO);
}
