use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use cost_copilot_core::portfolio::{simulate_scenario, SimulationInput};
use cost_copilot_core::Scenario;

use super::{resolve_driver, Context, DataArgs};

/// Arguments for a company-wide cost scenario
#[derive(Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Cost driver to change (defaults to Semiconductors, else the first driver)
    #[arg(long)]
    pub driver: Option<String>,

    /// Change in the driver's rate, in percent (e.g. 15 or -10)
    #[arg(long, default_value = "15", allow_hyphen_values = true)]
    pub change_pct: Decimal,

    /// Free-text scenario label
    #[arg(long)]
    pub description: Option<String>,
}

pub fn run_simulate(
    args: SimulateArgs,
    ctx: &mut Context,
) -> Result<Value, Box<dyn std::error::Error>> {
    let dataset = ctx.dataset(&args.data)?;
    let driver = resolve_driver(args.driver.as_deref(), &dataset)?;

    let sim_input = SimulationInput {
        bom: dataset.bom.clone(),
        rates: dataset.rates.clone(),
        scenario: Scenario {
            driver,
            change_pct: args.change_pct,
            description: args.description,
        },
    };
    let result = simulate_scenario(&sim_input)?;
    Ok(serde_json::to_value(result)?)
}
