use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use cost_copilot_core::costing::{calculate_unit_cost, RateTable};
use cost_copilot_core::levers::{
    evaluate_play, highest_feasibility_drivers, playbook_components, playbook_for, select_lever,
    FeasibilityTie, Play, PlayEvaluation, PlayEvaluationInput,
};

use super::{make_rng, Context, DataArgs};

const DEFAULT_IMPROVEMENT_PCT: Decimal = Decimal::from_parts(5, 0, 0, false, 0);
const DEFAULT_PROJECT_COST: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Arguments for the cost driver catalogue
#[derive(Args)]
pub struct DriversArgs {
    #[command(flatten)]
    pub data: DataArgs,
}

/// Arguments for the feasibility lever pick
#[derive(Args)]
pub struct LeverArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Seed for the tie-break, for reproducible picks
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Arguments for a component improvement playbook
#[derive(Args)]
pub struct PlaybookArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Product whose component cost the plays are sized against
    #[arg(long)]
    pub product: String,

    /// Component to improve (Machine Time, Labor, Plastic, Cardboard, Steel)
    #[arg(long)]
    pub component: String,

    /// Expected improvement in percent, 0 to 100. Repeat once per play in
    /// catalogue order; plays without a value use 5
    #[arg(long)]
    pub improvement_pct: Vec<Decimal>,

    /// One-off project cost. Repeat once per play in catalogue order;
    /// plays without a value use 10000
    #[arg(long)]
    pub project_cost: Vec<Decimal>,
}

#[derive(Debug, Serialize)]
struct DriversOutput {
    drivers: Vec<String>,
    default_driver: Option<String>,
    highest_feasibility: Option<FeasibilityTie>,
}

#[derive(Debug, Serialize)]
struct LeverOutput {
    selected_lever: Option<String>,
    #[serde(flatten)]
    tie: Option<FeasibilityTie>,
    seed: Option<u64>,
}

#[derive(Debug, Serialize)]
struct PlayResult {
    #[serde(flatten)]
    play: Play,
    evaluation: PlayEvaluation,
}

#[derive(Debug, Serialize)]
struct PlaybookOutput {
    product_id: String,
    component: String,
    base_cost_per_unit: Decimal,
    annual_volume: Decimal,
    plays: Vec<PlayResult>,
}

pub fn run_drivers(
    args: DriversArgs,
    ctx: &mut Context,
) -> Result<Value, Box<dyn std::error::Error>> {
    let dataset = ctx.dataset(&args.data)?;
    let output = DriversOutput {
        drivers: dataset.cost_drivers(),
        default_driver: dataset.default_driver(),
        highest_feasibility: highest_feasibility_drivers(&dataset.rates),
    };
    Ok(serde_json::to_value(output)?)
}

pub fn run_lever(
    args: LeverArgs,
    ctx: &mut Context,
) -> Result<Value, Box<dyn std::error::Error>> {
    let dataset = ctx.dataset(&args.data)?;
    let mut rng = make_rng(args.seed);
    let output = LeverOutput {
        selected_lever: select_lever(&dataset.rates, &mut rng),
        tie: highest_feasibility_drivers(&dataset.rates),
        seed: args.seed,
    };
    Ok(serde_json::to_value(output)?)
}

pub fn run_playbook(
    args: PlaybookArgs,
    ctx: &mut Context,
) -> Result<Value, Box<dyn std::error::Error>> {
    let playbook = playbook_for(&args.component).ok_or_else(|| {
        format!(
            "No playbook available for '{}'. Available: {}",
            args.component,
            playbook_components().join(", ")
        )
    })?;

    let dataset = ctx.dataset(&args.data)?;
    let line = dataset
        .bom
        .iter()
        .find(|l| l.product_id == args.product)
        .ok_or_else(|| format!("Product '{}' not found in BOM", args.product))?;

    let table = RateTable::from_records(&dataset.rates);
    let cost = calculate_unit_cost(&args.product, &dataset.bom, &table, &line.region, true);
    let base_cost_per_unit = cost
        .breakdown
        .as_ref()
        .and_then(|b| b.get(&args.component))
        .copied()
        .ok_or_else(|| {
            format!(
                "Product '{}' has no '{}' component",
                args.product, args.component
            )
        })?;

    let mut plays = Vec::with_capacity(playbook.plays.len());
    for (i, play) in playbook.plays.into_iter().enumerate() {
        let sizing = play_input(&args, i, base_cost_per_unit, line.annual_volume);
        let evaluation = evaluate_play(&sizing)
            .map_err(|e| format!("Play '{}': {}", play.name, e))?
            .result;
        plays.push(PlayResult { play, evaluation });
    }

    let output = PlaybookOutput {
        product_id: args.product.clone(),
        component: playbook.component,
        base_cost_per_unit,
        annual_volume: line.annual_volume,
        plays,
    };
    Ok(serde_json::to_value(output)?)
}

/// Sizing for the play at `index`, falling back to the defaults for plays
/// the command line gave no value for.
fn play_input(
    args: &PlaybookArgs,
    index: usize,
    base_cost_per_unit: Decimal,
    annual_volume: Decimal,
) -> PlayEvaluationInput {
    PlayEvaluationInput {
        base_cost_per_unit,
        annual_volume,
        improvement_pct: args
            .improvement_pct
            .get(index)
            .copied()
            .unwrap_or(DEFAULT_IMPROVEMENT_PCT),
        project_cost: args
            .project_cost
            .get(index)
            .copied()
            .unwrap_or(DEFAULT_PROJECT_COST),
    }
}
