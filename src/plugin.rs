//! The Ability Stones service
//!
//! Owns the shared configuration, the activation coordinator and the stone
//! manager. A host adapter forwards interact events, joins/quits and reloads
//! here. Multi-threaded hosts keep the whole service behind one `Mutex`.

use crate::abilities::AbilityCatalog;
use crate::activation::{ActivationCoordinator, ActivationResult};
use crate::core::{ItemStack, PlayerId, StoneType};
use crate::host::AbilityHost;
use crate::listener::{self, InteractEvent, InteractOutcome};
use crate::loader::{ConfigHandle, StonesConfig};
use crate::stones::StoneManager;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct AbilityStones {
    config: ConfigHandle,
    coordinator: ActivationCoordinator,
    stones: StoneManager,
}

impl AbilityStones {
    /// Service with the six built-in abilities
    pub fn new(config: StonesConfig) -> Self {
        let config = ConfigHandle::new(config);
        let catalog = AbilityCatalog::with_default_abilities(&config);
        Self::with_catalog(config, catalog)
    }

    pub fn with_catalog(config: ConfigHandle, catalog: AbilityCatalog) -> Self {
        tracing::info!(abilities = catalog.len(), "ability stones enabled");
        AbilityStones {
            stones: StoneManager::new(config.clone()),
            coordinator: ActivationCoordinator::new(catalog),
            config,
        }
    }

    pub fn on_player_interact(
        &mut self,
        host: &mut dyn AbilityHost,
        event: &mut InteractEvent,
        now: Instant,
    ) -> InteractOutcome {
        listener::on_player_interact(&mut self.coordinator, &self.stones, host, event, now)
    }

    /// Trigger an ability directly, bypassing item checks
    pub fn activate(
        &mut self,
        host: &mut dyn AbilityHost,
        player: PlayerId,
        stone: StoneType,
        now: Instant,
    ) -> ActivationResult {
        self.coordinator.attempt_activate(host, player, stone, now)
    }

    pub fn give_stone(&self, stone: StoneType) -> ItemStack {
        self.stones.create_stone(stone)
    }

    /// Swap in a new configuration
    ///
    /// Later activations charge the new cooldowns; running cooldowns keep
    /// their expiry.
    pub fn reload(&mut self, config: StonesConfig) {
        self.config.replace(config);
        tracing::info!("configuration reloaded");
    }

    pub fn player_quit(&mut self, player: PlayerId) {
        if self.coordinator.forget_player(player) {
            tracing::debug!(%player, "dropped cooldowns for departing player");
        }
    }

    pub fn remaining_cooldown(&self, player: PlayerId, stone: StoneType, now: Instant) -> Duration {
        self.coordinator.remaining_cooldown(player, stone, now)
    }

    /// Drop expired cooldown entries
    pub fn compact(&mut self, now: Instant) -> usize {
        let removed = self.coordinator.sweep(now);
        if removed > 0 {
            tracing::debug!(removed, "swept expired cooldowns");
        }
        removed
    }

    pub fn config(&self) -> &ConfigHandle {
        &self.config
    }

    pub fn stones(&self) -> &StoneManager {
        &self.stones
    }

    pub fn coordinator(&self) -> &ActivationCoordinator {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut ActivationCoordinator {
        &mut self.coordinator
    }
}

impl Default for AbilityStones {
    fn default() -> Self {
        Self::new(StonesConfig::default())
    }
}
