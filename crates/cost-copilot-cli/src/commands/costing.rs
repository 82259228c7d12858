use clap::Args;
use serde_json::Value;

use cost_copilot_core::costing::unit_cost::{unit_cost_report, UnitCostInput};

use super::{Context, DataArgs};

/// Arguments for a single product's unit cost
#[derive(Args)]
pub struct UnitCostArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Product to price
    #[arg(long)]
    pub product: String,

    /// Price in this region instead of the product's own
    #[arg(long)]
    pub region: Option<String>,

    /// Include the per-component cost breakdown
    #[arg(long)]
    pub breakdown: bool,
}

pub fn run_unit_cost(
    args: UnitCostArgs,
    ctx: &mut Context,
) -> Result<Value, Box<dyn std::error::Error>> {
    let dataset = ctx.dataset(&args.data)?;
    let uc_input = UnitCostInput {
        product_id: args.product,
        bom: dataset.bom.clone(),
        rates: dataset.rates.clone(),
        region: args.region,
        breakdown: args.breakdown,
    };
    Ok(serde_json::to_value(unit_cost_report(&uc_input))?)
}
