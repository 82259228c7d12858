use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::{CostDriverRate, Rate, Scenario, DEFAULT_REGION};

/// How a `(component, region)` lookup was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateSource {
    /// The product's own region carries a rate
    Specific,
    /// Fell back to the `Default` region
    Default,
    /// Neither exists; rate is zero
    Unresolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateResolution {
    pub rate: Rate,
    pub source: RateSource,
}

/// Immutable `(cost driver, region) -> rate` lookup built once per
/// calculation pass.
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    // driver -> region -> rate, so lookups borrow instead of allocating keys
    rates: HashMap<String, HashMap<String, Rate>>,
}

impl RateTable {
    /// Build the table. `(driver, region)` pairs are assumed unique; on a
    /// duplicate the last row wins.
    pub fn from_records(records: &[CostDriverRate]) -> Self {
        let mut rates: HashMap<String, HashMap<String, Rate>> = HashMap::new();
        for r in records {
            rates
                .entry(r.cost_driver.clone())
                .or_default()
                .insert(r.region.clone(), r.rate);
        }
        RateTable { rates }
    }

    /// Build the table with `scenario` applied to a copy of the records.
    pub fn with_scenario(records: &[CostDriverRate], scenario: &Scenario) -> Self {
        Self::from_records(&apply_scenario(records, scenario))
    }

    pub fn get(&self, driver: &str, region: &str) -> Option<Rate> {
        self.rates
            .get(driver)
            .and_then(|regions| regions.get(region))
            .copied()
    }

    /// Specific region, then `Default`, then zero.
    pub fn resolve(&self, component: &str, region: &str) -> Rate {
        self.resolve_detailed(component, region).rate
    }

    pub fn resolve_detailed(&self, component: &str, region: &str) -> RateResolution {
        if let Some(rate) = self.get(component, region) {
            return RateResolution {
                rate,
                source: RateSource::Specific,
            };
        }
        if let Some(rate) = self.get(component, DEFAULT_REGION) {
            return RateResolution {
                rate,
                source: RateSource::Default,
            };
        }
        RateResolution {
            rate: Decimal::ZERO,
            source: RateSource::Unresolved,
        }
    }

    pub fn len(&self) -> usize {
        self.rates.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Copy of `records` with every row of `scenario.driver` scaled, in all
/// regions. The input is left untouched.
pub fn apply_scenario(records: &[CostDriverRate], scenario: &Scenario) -> Vec<CostDriverRate> {
    let multiplier = scenario.multiplier();
    records
        .iter()
        .map(|r| {
            let mut row = r.clone();
            if row.cost_driver == scenario.driver {
                row.rate *= multiplier;
            }
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn rate(driver: &str, region: &str, value: Decimal) -> CostDriverRate {
        CostDriverRate {
            cost_driver: driver.into(),
            region: region.into(),
            rate: value,
            per_unit: "unit".into(),
            feasibility: dec!(5),
        }
    }

    fn sample_rates() -> Vec<CostDriverRate> {
        vec![
            rate("Steel", "Texas", dec!(2.0)),
            rate("Steel", "Default", dec!(1.8)),
            rate("Steel", "Ohio", dec!(2.2)),
            rate("Labor", "Texas", dec!(0.5)),
            rate("Plastic", "Default", dec!(3.1)),
        ]
    }

    #[test]
    fn test_specific_region_preferred() {
        let table = RateTable::from_records(&sample_rates());
        let r = table.resolve_detailed("Steel", "Texas");
        assert_eq!(r.rate, dec!(2.0));
        assert_eq!(r.source, RateSource::Specific);
    }

    #[test]
    fn test_default_region_fallback() {
        let table = RateTable::from_records(&sample_rates());
        let r = table.resolve_detailed("Plastic", "Texas");
        assert_eq!(r.rate, dec!(3.1));
        assert_eq!(r.source, RateSource::Default);
        assert_eq!(table.resolve("Steel", "Nevada"), dec!(1.8));
    }

    #[test]
    fn test_unresolved_is_zero() {
        let table = RateTable::from_records(&sample_rates());
        let r = table.resolve_detailed("Labor", "Ohio");
        assert_eq!(r.rate, Decimal::ZERO);
        assert_eq!(r.source, RateSource::Unresolved);
        assert_eq!(table.resolve("Copper", "Texas"), Decimal::ZERO);
    }

    #[test]
    fn test_empty_table() {
        let table = RateTable::from_records(&[]);
        assert!(table.is_empty());
        assert_eq!(table.resolve("Steel", "Texas"), Decimal::ZERO);
    }

    #[test]
    fn test_len_counts_pairs() {
        let table = RateTable::from_records(&sample_rates());
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn test_scenario_scales_every_region() {
        let records = sample_rates();
        let scenario = Scenario::new("Steel", dec!(10));
        let table = RateTable::with_scenario(&records, &scenario);

        assert_eq!(table.resolve("Steel", "Texas"), dec!(2.2));
        assert_eq!(table.resolve("Steel", "Ohio"), dec!(2.42));
        assert_eq!(table.resolve("Steel", "Default"), dec!(1.98));
        // other drivers untouched
        assert_eq!(table.resolve("Labor", "Texas"), dec!(0.5));
    }

    #[test]
    fn test_apply_scenario_does_not_mutate_input() {
        let records = sample_rates();
        let perturbed = apply_scenario(&records, &Scenario::new("Steel", dec!(50)));
        assert_eq!(records[0].rate, dec!(2.0));
        assert_eq!(perturbed[0].rate, dec!(3.0));
        assert_eq!(perturbed.len(), records.len());
    }
}
