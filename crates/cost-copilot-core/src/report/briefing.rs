use rand::Rng;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::levers::select_lever;
use crate::portfolio::{ProductImpact, SimulationOutput};
use crate::types::*;
use crate::CostCopilotResult;

const SYSTEM_PROMPT: &str = "You are a senior management consultant briefing the CEO. \
Your analysis must be sharp and go beyond first-order effects. \
Use markdown for all formatting and aim for a high-leverage, non-obvious recommendation.";

/// Everything the narrative generator is told about one scenario run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BriefingRequest {
    pub scenario_description: String,
    pub baseline_profit: Money,
    pub scenario_profit: Money,
    /// Most negatively affected products, worst first
    pub top_products: Vec<ProductImpact>,
    /// Driver with the highest operational feasibility (random among ties)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feasibility_lever: Option<String>,
    pub rates: Vec<CostDriverRate>,
}

impl BriefingRequest {
    pub fn build<R: Rng + ?Sized>(
        simulation: &SimulationOutput,
        rates: &[CostDriverRate],
        top_n: usize,
        rng: &mut R,
    ) -> Self {
        BriefingRequest {
            scenario_description: simulation.scenario_description.clone(),
            baseline_profit: simulation.total_baseline_profit,
            scenario_profit: simulation.total_scenario_profit,
            top_products: simulation.most_impacted(top_n),
            feasibility_lever: select_lever(rates, rng),
            rates: rates.to_vec(),
        }
    }

    pub fn system_prompt(&self) -> &'static str {
        SYSTEM_PROMPT
    }

    pub fn user_prompt(&self) -> String {
        let mut prompt = String::new();
        prompt.push_str("**Analysis Request:**\n");
        prompt.push_str(&format!(
            "Provide a strategic briefing on the following scenario: \"{}\".\n\n",
            self.scenario_description
        ));
        prompt.push_str("**Key Data Points:**\n");
        prompt.push_str(&format!(
            "- Baseline Annual Gross Profit: {}\n",
            format_currency(self.baseline_profit)
        ));
        prompt.push_str(&format!(
            "- Scenario Annual Gross Profit: {}\n",
            format_currency(self.scenario_profit)
        ));
        prompt.push_str(&format!(
            "- Top {} Most Financially Affected Products:\n",
            self.top_products.len()
        ));
        prompt.push_str(&self.products_table());
        match self.feasibility_lever {
            Some(ref lever) => prompt.push_str(&format!(
                "- Internal Feasibility Data Hint: our data suggests that **'{lever}'** \
                 is the cost area with the highest operational feasibility for change.\n"
            )),
            None => prompt.push_str("- Internal Feasibility Data Hint: none available.\n"),
        }
        prompt.push_str(
            "\n**Structure your briefing in three parts:**\n\
             ### 1. The Bottom Line\n\
             Concisely state the total financial impact.\n\
             ### 2. The Core Problem\n\
             Analyze whether the impact is concentrated in the products listed above.\n\
             ### 3. Strategic Recommendation: The Non-Obvious Path\n\
             Provide your top recommendation, connecting the immediate problem to a \
             systemic, feasible solution.\n",
        );
        prompt
    }

    fn products_table(&self) -> String {
        let mut table =
            String::from("  | Product | Total Profit Change ($) | Per Unit Profit Change ($) |\n");
        table.push_str("  |---|---|---|\n");
        for p in &self.top_products {
            table.push_str(&format!(
                "  | {} | {} | {} |\n",
                p.product_name,
                format_currency(p.pnl_impact),
                format_currency(p.per_unit_impact)
            ));
        }
        table
    }
}

/// Produces free-form narrative text for a briefing request.
pub trait NarrativeGenerator {
    fn generate(&self, request: &BriefingRequest) -> CostCopilotResult<String>;
}

/// Run the generator, logging and swallowing failures so the rest of the
/// analysis can still be reported.
pub fn generate_briefing<G: NarrativeGenerator + ?Sized>(
    generator: &G,
    request: &BriefingRequest,
) -> Option<String> {
    match generator.generate(request) {
        Ok(text) => {
            info!(chars = text.len(), "narrative briefing generated");
            Some(text)
        }
        Err(e) => {
            warn!(error = %e, "narrative briefing unavailable");
            None
        }
    }
}

/// `$1,234.56` style, two decimals, `-` before the symbol for negatives.
pub fn format_currency(value: Money) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded < Decimal::ZERO;
    let text = format!("{:.2}", rounded.abs());
    let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}.{}", if negative { "-" } else { "" }, grouped, frac)
}
