//! Harvester-ant foraging: an agent simulation driven by a stochastic
//! recruitment controller, with a finite and periodically replenished food supply.

pub mod config;
pub mod error;
pub mod meanfield;
pub mod simulation;
pub mod telemetry;

pub use config::SimulationConfig;
pub use error::{ConfigError, HistoryError, LoadError};
pub use simulation::Simulation;
pub use telemetry::{ForagingOutcome, RunHistory, RunReport, TelemetrySink};
