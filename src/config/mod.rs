pub mod simulation_config;

pub use simulation_config::SimulationConfig;
