pub mod rates;
pub mod unit_cost;

pub use rates::{RateSource, RateTable};
pub use unit_cost::{calculate_unit_cost, UnitCost};
