//! Chain Lightning: strike the three nearest enemies

use super::{nearest_living, AbilityHandler};
use crate::core::{AbilityName, ChatMessage, EntityId, PlayerId, StoneType, TextColor};
use crate::host::AbilityHost;
use crate::loader::ConfigHandle;
use smallvec::SmallVec;
use std::time::Duration;

const RANGE: f64 = 6.0;
const MAX_TARGETS: usize = 3;
const DAMAGE: f64 = 6.0;

pub struct ChainLightning {
    config: ConfigHandle,
}

impl ChainLightning {
    pub fn new(config: ConfigHandle) -> Self {
        ChainLightning { config }
    }
}

impl AbilityHandler for ChainLightning {
    fn stone_type(&self) -> StoneType {
        StoneType::Lightning
    }

    fn name(&self) -> AbilityName {
        self.config.read(|c| c.ability_name(StoneType::Lightning))
    }

    fn declared_cooldown(&self) -> Duration {
        self.config.cooldown(StoneType::Lightning)
    }

    fn try_activate(&self, host: &mut dyn AbilityHost, player: PlayerId) -> bool {
        if host.position(player).is_none() {
            return false;
        }

        let targets: SmallVec<[EntityId; MAX_TARGETS]> = nearest_living(&*host, player, RANGE)
            .into_iter()
            .take(MAX_TARGETS)
            .collect();
        if targets.is_empty() {
            host.send_message(player, ChatMessage::new(TextColor::Red, "No enemies nearby!"));
            return false;
        }

        for &target in &targets {
            if let Some(at) = host.position(target) {
                host.strike_lightning_effect(at);
            }
            host.damage(target, DAMAGE, Some(player));
        }

        host.send_message(
            player,
            ChatMessage::new(
                TextColor::Yellow,
                format!("Chain Lightning struck {} enemies!", targets.len()),
            ),
        );
        true
    }
}
