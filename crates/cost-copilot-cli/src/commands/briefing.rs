use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Instant;

use cost_copilot_core::portfolio::{simulate_scenario, ProductImpact, SimulationInput};
use cost_copilot_core::report::chat_client::ChatCompletionsClient;
use cost_copilot_core::report::{generate_briefing, BriefingRequest};
use cost_copilot_core::{with_metadata, Money, Scenario};

use super::{make_rng, resolve_driver, Context, DataArgs};

const NARRATIVE_UNAVAILABLE: &str =
    "AI briefing could not be generated; figures are shown without it";

/// Arguments for a narrative scenario briefing
#[derive(Args)]
pub struct BriefingArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Cost driver to change (defaults to Semiconductors, else the first driver)
    #[arg(long)]
    pub driver: Option<String>,

    /// Change in the driver's rate, in percent
    #[arg(long, default_value = "15", allow_hyphen_values = true)]
    pub change_pct: Decimal,

    /// Free-text scenario label
    #[arg(long)]
    pub description: Option<String>,

    /// Most impacted products to include (defaults to [report] top_n)
    #[arg(long)]
    pub top: Option<usize>,

    /// Seed for the feasibility tie-break
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the prompts instead of calling the model
    #[arg(long)]
    pub dry_run: bool,

    /// API key for the chat-completions endpoint
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct BriefingOutput {
    scenario_description: String,
    total_baseline_profit: Money,
    total_scenario_profit: Money,
    total_pnl_impact: Money,
    top_products: Vec<ProductImpact>,
    feasibility_lever: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_prompt: Option<String>,
    narrative: Option<String>,
}

pub fn run_briefing(
    args: BriefingArgs,
    ctx: &mut Context,
) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let dataset = ctx.dataset(&args.data)?;
    let driver = resolve_driver(args.driver.as_deref(), &dataset)?;
    let top_n = args.top.unwrap_or(ctx.config.report.top_n);

    let sim_input = SimulationInput {
        bom: dataset.bom.clone(),
        rates: dataset.rates.clone(),
        scenario: Scenario {
            driver,
            change_pct: args.change_pct,
            description: args.description,
        },
    };
    let simulation = simulate_scenario(&sim_input)?;
    let mut warnings = simulation.warnings.clone();

    let mut rng = make_rng(args.seed);
    let request = BriefingRequest::build(&simulation.result, &dataset.rates, top_n, &mut rng);

    let (system_prompt, user_prompt, narrative) = if args.dry_run {
        (
            Some(request.system_prompt().to_string()),
            Some(request.user_prompt()),
            None,
        )
    } else {
        let api_key = args.api_key.unwrap_or_default();
        let client = ChatCompletionsClient::new(ctx.config.narrative.clone(), api_key);
        let narrative = generate_briefing(&client, &request);
        if narrative.is_none() {
            warnings.push(NARRATIVE_UNAVAILABLE.to_string());
        }
        (None, None, narrative)
    };

    let output = BriefingOutput {
        scenario_description: request.scenario_description.clone(),
        total_baseline_profit: request.baseline_profit,
        total_scenario_profit: request.scenario_profit,
        total_pnl_impact: simulation.result.total_pnl_impact,
        top_products: request.top_products.clone(),
        feasibility_lever: request.feasibility_lever.clone(),
        system_prompt,
        user_prompt,
        narrative,
    };

    let assumptions = json!({
        "scenario": sim_input.scenario,
        "top_n": top_n,
        "seed": args.seed,
        "model": ctx.config.narrative.model,
        "dry_run": args.dry_run,
    });
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(serde_json::to_value(with_metadata(
        "Scenario simulation condensed into a strategic briefing for a chat model",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))?)
}
