use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::CostDriverRate;

/// Drivers sharing the highest feasibility score across the rate set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityTie {
    pub feasibility: Decimal,
    /// Distinct driver names in first-seen order
    pub drivers: Vec<String>,
}

/// Collect every distinct driver whose feasibility equals the maximum.
/// `None` for an empty rate set.
pub fn highest_feasibility_drivers(rates: &[CostDriverRate]) -> Option<FeasibilityTie> {
    let max = rates.iter().map(|r| r.feasibility).max()?;

    let mut drivers: Vec<String> = Vec::new();
    for r in rates.iter().filter(|r| r.feasibility == max) {
        if !drivers.contains(&r.cost_driver) {
            drivers.push(r.cost_driver.clone());
        }
    }

    Some(FeasibilityTie {
        feasibility: max,
        drivers,
    })
}

/// Pick one of the highest-feasibility drivers uniformly at random.
///
/// The random source is supplied by the caller; seed it for reproducible
/// picks.
pub fn select_lever<R: Rng + ?Sized>(rates: &[CostDriverRate], rng: &mut R) -> Option<String> {
    let tie = highest_feasibility_drivers(rates)?;
    tie.drivers.choose(rng).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rust_decimal_macros::dec;
    use std::collections::HashSet;

    fn rate(driver: &str, region: &str, feasibility: Decimal) -> CostDriverRate {
        CostDriverRate {
            cost_driver: driver.into(),
            region: region.into(),
            rate: dec!(1),
            per_unit: "unit".into(),
            feasibility,
        }
    }

    fn tied_rates() -> Vec<CostDriverRate> {
        vec![
            rate("Steel", "Texas", dec!(7)),
            rate("Steel", "Default", dec!(7)),
            rate("Labor", "Texas", dec!(9)),
            rate("Plastic", "Default", dec!(9)),
            rate("Machine Time", "Texas", dec!(9)),
            rate("Cardboard", "Default", dec!(3)),
        ]
    }

    #[test]
    fn test_tied_set() {
        let tie = highest_feasibility_drivers(&tied_rates()).unwrap();
        assert_eq!(tie.feasibility, dec!(9));
        assert_eq!(tie.drivers, vec!["Labor", "Plastic", "Machine Time"]);
    }

    #[test]
    fn test_duplicate_driver_rows_counted_once() {
        let rates = vec![
            rate("Labor", "Texas", dec!(8)),
            rate("Labor", "Ohio", dec!(8)),
            rate("Steel", "Texas", dec!(8)),
        ];
        let tie = highest_feasibility_drivers(&rates).unwrap();
        assert_eq!(tie.drivers, vec!["Labor", "Steel"]);
    }

    #[test]
    fn test_empty_rates_has_no_lever() {
        assert!(highest_feasibility_drivers(&[]).is_none());
        let mut rng = StdRng::seed_from_u64(1);
        assert!(select_lever(&[], &mut rng).is_none());
    }

    #[test]
    fn test_single_max_is_deterministic() {
        let rates = vec![rate("Labor", "Texas", dec!(9)), rate("Steel", "Texas", dec!(2))];
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            assert_eq!(select_lever(&rates, &mut rng).as_deref(), Some("Labor"));
        }
    }

    #[test]
    fn test_pick_always_in_tied_set() {
        let rates = tied_rates();
        let tied: HashSet<&str> = ["Labor", "Plastic", "Machine Time"].into_iter().collect();
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen: HashSet<String> = HashSet::new();

        for _ in 0..500 {
            let pick = select_lever(&rates, &mut rng).unwrap();
            assert!(tied.contains(pick.as_str()), "unexpected lever {pick}");
            seen.insert(pick);
        }
        // uniform over three members: all appear in 500 draws
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_same_seed_same_pick() {
        let rates = tied_rates();
        let a = select_lever(&rates, &mut StdRng::seed_from_u64(99));
        let b = select_lever(&rates, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }
}
