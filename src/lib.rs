//! Ability Stones - cooldown-gated item abilities for a block game server
//!
//! Players right-click a stone item to trigger its ability. Each
//! (player, stone) pair has its own cooldown, charged only when the ability
//! actually did something. The game server is reached through
//! [`host::AbilityHost`]; [`sim::SimulatedWorld`] is an in-memory host used by
//! the tests and the `stones` binary.

pub mod abilities;
pub mod activation;
pub mod cooldown;
pub mod core;
pub mod error;
pub mod host;
pub mod listener;
pub mod loader;
pub mod logging;
pub mod plugin;
pub mod sim;
pub mod stones;
pub mod tasks;

pub use activation::{ActivationCoordinator, ActivationResult};
pub use error::{Result, StoneError};
pub use plugin::AbilityStones;
