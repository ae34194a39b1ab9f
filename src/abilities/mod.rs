//! Ability handlers and the catalog that maps stones to them
//!
//! Each stone has exactly one handler. A handler reports its cooldown from the
//! live configuration and performs its effect through an [`AbilityHost`],
//! returning whether the effect actually applied.

pub mod animations;
pub mod catalog;
pub mod chain_lightning;
pub mod dash_forward;
pub mod fire_burst;
pub mod heal_wave;
pub mod shadow_curse;
pub mod stone_shield;

pub use catalog::AbilityCatalog;
pub use chain_lightning::ChainLightning;
pub use dash_forward::DashForward;
pub use fire_burst::FireBurst;
pub use heal_wave::HealWave;
pub use shadow_curse::ShadowCurse;
pub use stone_shield::StoneShield;

use crate::core::{AbilityName, EntityId, PlayerId, StoneType};
use crate::host::AbilityHost;
use std::time::Duration;

/// One ability's activation capability
///
/// `declared_cooldown` is called after every successful activation, so a
/// configuration reload takes effect on the next charge.
pub trait AbilityHandler: Send + Sync {
    fn stone_type(&self) -> StoneType;

    fn name(&self) -> AbilityName;

    fn declared_cooldown(&self) -> Duration;

    /// Perform the effect for `player`
    ///
    /// Returns `false` when nothing happened (for example no targets in
    /// range); the caller then charges no cooldown.
    fn try_activate(&self, host: &mut dyn AbilityHost, player: PlayerId) -> bool;
}

/// Nearby living entities, nearest first (ties broken by id)
pub(crate) fn nearest_living(host: &dyn AbilityHost, player: PlayerId, range: f64) -> Vec<EntityId> {
    let Some(origin) = host.position(player) else {
        return Vec::new();
    };
    let mut found: Vec<(f64, EntityId)> = host
        .nearby_living(player, range)
        .into_iter()
        .filter_map(|id| host.position(id).map(|pos| (pos.distance_squared(origin), id)))
        .collect();
    found.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    found.into_iter().map(|(_, id)| id).collect()
}
