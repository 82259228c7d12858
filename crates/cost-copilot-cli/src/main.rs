mod commands;
mod config;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::briefing::BriefingArgs;
use commands::costing::UnitCostArgs;
use commands::health::HealthArgs;
use commands::levers::{DriversArgs, LeverArgs, PlaybookArgs};
use commands::simulate::SimulateArgs;
use commands::Context;
use config::CopilotConfig;

/// Manufacturing cost co-pilot
#[derive(Parser)]
#[command(
    name = "copilot",
    version,
    about = "BOM unit costing, portfolio health and cost scenario analysis",
    long_about = "Prices products from their bills of materials and regional cost driver \
                  rates with decimal precision. Ranks portfolio margins, simulates \
                  company-wide cost changes, suggests the most feasible cost lever and \
                  sizes improvement plays."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// TOML config file (defaults to ./copilot.toml when present)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank every product by gross margin
    Health(HealthArgs),
    /// Simulate a percentage change in one cost driver across the portfolio
    Simulate(SimulateArgs),
    /// Unit cost of one product, optionally per component
    UnitCost(UnitCostArgs),
    /// List cost drivers and the highest-feasibility set
    Drivers(DriversArgs),
    /// Pick the cost lever with the highest feasibility
    Lever(LeverArgs),
    /// Size the improvement plays for one product component
    Playbook(PlaybookArgs),
    /// Scenario briefing from a chat-completions model
    Briefing(BriefingArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = match CopilotConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };
    let mut ctx = Context::new(config);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Health(args) => commands::health::run_health(args, &mut ctx),
        Commands::Simulate(args) => commands::simulate::run_simulate(args, &mut ctx),
        Commands::UnitCost(args) => commands::costing::run_unit_cost(args, &mut ctx),
        Commands::Drivers(args) => commands::levers::run_drivers(args, &mut ctx),
        Commands::Lever(args) => commands::levers::run_lever(args, &mut ctx),
        Commands::Playbook(args) => commands::levers::run_playbook(args, &mut ctx),
        Commands::Briefing(args) => commands::briefing::run_briefing(args, &mut ctx),
        Commands::Version => {
            println!("copilot {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
