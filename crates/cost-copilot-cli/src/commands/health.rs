use clap::Args;
use serde_json::Value;

use cost_copilot_core::portfolio::{analyze_portfolio_health, HealthInput};

use super::{Context, DataArgs};

/// Arguments for portfolio health
#[derive(Args)]
pub struct HealthArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Also list the N healthiest ("stars") and N weakest ("at_risk") products
    #[arg(long)]
    pub top: Option<usize>,
}

pub fn run_health(
    args: HealthArgs,
    ctx: &mut Context,
) -> Result<Value, Box<dyn std::error::Error>> {
    let dataset = ctx.dataset(&args.data)?;
    let health_input = HealthInput {
        bom: dataset.bom.clone(),
        rates: dataset.rates.clone(),
    };
    let result = analyze_portfolio_health(&health_input);

    let mut value = serde_json::to_value(&result)?;
    if let Some(n) = args.top {
        if let Some(map) = value.get_mut("result").and_then(Value::as_object_mut) {
            map.insert("stars".into(), serde_json::to_value(result.result.stars(n))?);
            map.insert("at_risk".into(), serde_json::to_value(result.result.at_risk(n))?);
        }
    }
    Ok(value)
}
