pub mod briefing;
pub mod costing;
pub mod health;
pub mod levers;
pub mod simulate;

use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use cost_copilot_core::data::{DataSource, Dataset, DatasetCache};

use crate::config::CopilotConfig;
use crate::input;

/// Where a command reads its BOM and cost driver rates from.
///
/// Precedence: `--input`, then `--bom`/`--rates`, then piped stdin, then
/// the `[data]` section of the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct DataArgs {
    /// BOM CSV file (ProductID, ProductName, Component, Quantity, ...)
    #[arg(long)]
    pub bom: Option<PathBuf>,

    /// Cost driver CSV file (CostDriver, Region, Rate, Per_Unit, Feasibility)
    #[arg(long)]
    pub rates: Option<PathBuf>,

    /// JSON dataset file: { "bom": [...], "rates": [...] }
    #[arg(long)]
    pub input: Option<String>,
}

/// State shared by every command in one invocation.
pub struct Context {
    pub config: CopilotConfig,
    cache: DatasetCache,
}

impl Context {
    pub fn new(config: CopilotConfig) -> Self {
        Context {
            config,
            cache: DatasetCache::new(),
        }
    }

    pub fn dataset(&mut self, args: &DataArgs) -> Result<Arc<Dataset>, Box<dyn std::error::Error>> {
        if let Some(ref path) = args.input {
            debug!(path = %path, "reading JSON dataset");
            return Ok(Arc::new(input::file::read_dataset(path)?));
        }

        if args.bom.is_none() && args.rates.is_none() {
            if let Some(dataset) = input::stdin::read_stdin_dataset()? {
                debug!("read dataset from stdin");
                return Ok(Arc::new(dataset));
            }
        }

        let source = self.data_source(args);
        debug!(
            bom = %source.bom_path.display(),
            rates = %source.rates_path.display(),
            "reading CSV dataset"
        );
        Ok(self.cache.get(&source)?)
    }

    fn data_source(&self, args: &DataArgs) -> DataSource {
        let defaults = &self.config.data;
        DataSource {
            bom_path: args.bom.clone().unwrap_or_else(|| defaults.bom_path.clone()),
            rates_path: args
                .rates
                .clone()
                .unwrap_or_else(|| defaults.rates_path.clone()),
        }
    }
}

/// Seeded when reproducibility is requested, OS entropy otherwise.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

/// The requested driver, or the catalogue default.
pub fn resolve_driver(
    requested: Option<&str>,
    dataset: &Dataset,
) -> Result<String, Box<dyn std::error::Error>> {
    match requested {
        Some(d) => Ok(d.to_string()),
        None => dataset
            .default_driver()
            .ok_or_else(|| "No cost drivers in dataset; pass --driver".into()),
    }
}
