use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Cost per unit of a cost driver (e.g. $/kg, $/hour).
pub type Rate = Decimal;

/// Quantity of a component consumed per unit of product.
pub type Quantity = Decimal;

/// Percentages expressed as percentage points (15 = 15%).
pub type Percent = Decimal;

/// Region used when a product's own region has no rate for a driver.
pub const DEFAULT_REGION: &str = "Default";

/// One line of a product's bill of materials.
///
/// Product metadata (name, region, volume, price) is repeated on every
/// line of the same product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomLineItem {
    #[serde(alias = "ProductID")]
    pub product_id: String,
    #[serde(alias = "ProductName")]
    pub product_name: String,
    #[serde(alias = "Component")]
    pub component: String,
    #[serde(alias = "Quantity")]
    pub quantity: Quantity,
    #[serde(alias = "Unit")]
    pub unit: String,
    #[serde(alias = "Region")]
    pub region: String,
    #[serde(alias = "AnnualVolume")]
    pub annual_volume: Decimal,
    #[serde(alias = "CurrentSellingPrice")]
    pub current_selling_price: Money,
}

/// Region-specific unit rate for a cost driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostDriverRate {
    #[serde(alias = "CostDriver")]
    pub cost_driver: String,
    #[serde(alias = "Region")]
    pub region: String,
    #[serde(alias = "Rate")]
    pub rate: Rate,
    #[serde(alias = "Per_Unit")]
    pub per_unit: String,
    /// How operationally easy it is to move this cost
    #[serde(alias = "Feasibility")]
    pub feasibility: Decimal,
}

/// A product as seen by the portfolio passes, taken from its first BOM line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,
    pub product_name: String,
    pub region: String,
    pub annual_volume: Decimal,
    pub current_selling_price: Money,
}

impl From<&BomLineItem> for Product {
    fn from(line: &BomLineItem) -> Self {
        Product {
            product_id: line.product_id.clone(),
            product_name: line.product_name.clone(),
            region: line.region.clone(),
            annual_volume: line.annual_volume,
            current_selling_price: line.current_selling_price,
        }
    }
}

/// A single-driver what-if: scale every region's rate for `driver`
/// by `1 + change_pct / 100`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub driver: String,
    pub change_pct: Percent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Scenario {
    pub fn new(driver: impl Into<String>, change_pct: Percent) -> Self {
        Scenario {
            driver: driver.into(),
            change_pct,
            description: None,
        }
    }

    /// Rate multiplier applied to the targeted driver.
    pub fn multiplier(&self) -> Decimal {
        Decimal::ONE + self.change_pct / Decimal::ONE_HUNDRED
    }

    /// User-supplied description, or a generated one such as
    /// "15% increase in all Steel costs".
    pub fn description(&self) -> String {
        if let Some(ref d) = self.description {
            if !d.trim().is_empty() {
                return d.clone();
            }
        }
        let direction = if self.change_pct < Decimal::ZERO {
            "decrease"
        } else {
            "increase"
        };
        format!(
            "{}% {} in all {} costs",
            self.change_pct.abs().normalize(),
            direction,
            self.driver
        )
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_scenario_multiplier() {
        assert_eq!(Scenario::new("Steel", dec!(15)).multiplier(), dec!(1.15));
        assert_eq!(Scenario::new("Steel", dec!(-50)).multiplier(), dec!(0.5));
        assert_eq!(Scenario::new("Steel", dec!(0)).multiplier(), Decimal::ONE);
    }

    #[test]
    fn test_generated_description() {
        assert_eq!(
            Scenario::new("Steel", dec!(15)).description(),
            "15% increase in all Steel costs"
        );
        assert_eq!(
            Scenario::new("Labor", dec!(-7.50)).description(),
            "7.5% decrease in all Labor costs"
        );
    }

    #[test]
    fn test_explicit_description_wins() {
        let mut s = Scenario::new("Steel", dec!(15));
        s.description = Some("Tariff shock".into());
        assert_eq!(s.description(), "Tariff shock");

        s.description = Some("   ".into());
        assert_eq!(s.description(), "15% increase in all Steel costs");
    }

    #[test]
    fn test_bom_line_accepts_csv_column_names() {
        let json = serde_json::json!({
            "ProductID": "P1",
            "ProductName": "Widget",
            "Component": "Steel",
            "Quantity": "2",
            "Unit": "kg",
            "Region": "Texas",
            "AnnualVolume": "1000",
            "CurrentSellingPrice": "25.00",
        });
        let line: BomLineItem = serde_json::from_value(json).unwrap();
        assert_eq!(line.product_id, "P1");
        assert_eq!(line.quantity, dec!(2));
        assert_eq!(line.current_selling_price, dec!(25.00));
    }
}
