pub mod health;
pub mod products;
pub mod simulation;

pub use health::{analyze_portfolio_health, HealthInput, HealthOutput, ProductHealth};
pub use simulation::{simulate_scenario, ProductImpact, SimulationInput, SimulationOutput};
