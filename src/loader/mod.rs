//! File loaders: stone configuration and simulation scenarios

pub mod config;
pub mod scenario;

pub use config::{ConfigHandle, StoneSettings, StoneTable, StonesConfig};
pub use scenario::{EntitySpec, Scenario, MAX_SCENARIO_SECS, ScenarioLoader, TimedAction, TimedDirective};
