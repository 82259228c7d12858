use napi::Result as NapiResult;
use napi_derive::napi;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use cost_copilot_core::levers::FeasibilityTie;
use cost_copilot_core::CostDriverRate;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Costing and portfolio
// ---------------------------------------------------------------------------

#[napi]
pub fn unit_cost(input_json: String) -> NapiResult<String> {
    let input: cost_copilot_core::costing::unit_cost::UnitCostInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = cost_copilot_core::costing::unit_cost::unit_cost_report(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn portfolio_health(input_json: String) -> NapiResult<String> {
    let input: cost_copilot_core::portfolio::HealthInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = cost_copilot_core::portfolio::analyze_portfolio_health(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn simulate_scenario(input_json: String) -> NapiResult<String> {
    let input: cost_copilot_core::portfolio::SimulationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        cost_copilot_core::portfolio::simulate_scenario(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Levers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct LeverInput {
    rates: Vec<CostDriverRate>,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Serialize)]
struct LeverOutput {
    selected_lever: Option<String>,
    highest_feasibility: Option<FeasibilityTie>,
}

#[napi]
pub fn select_lever(input_json: String) -> NapiResult<String> {
    let input: LeverInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let mut rng = match input.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let output = LeverOutput {
        selected_lever: cost_copilot_core::levers::select_lever(&input.rates, &mut rng),
        highest_feasibility: cost_copilot_core::levers::highest_feasibility_drivers(&input.rates),
    };
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn evaluate_play(input_json: String) -> NapiResult<String> {
    let input: cost_copilot_core::levers::PlayEvaluationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = cost_copilot_core::levers::evaluate_play(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Plays for a component as JSON, or `null` when none are catalogued.
#[napi]
pub fn playbook(component: String) -> NapiResult<String> {
    let output = cost_copilot_core::levers::playbook_for(&component);
    serde_json::to_string(&output).map_err(to_napi_error)
}
