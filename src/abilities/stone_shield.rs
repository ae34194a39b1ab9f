//! Stone Shield: resistance for the caster, knockback for everyone close by

use super::animations::ShieldOrbit;
use super::AbilityHandler;
use crate::core::{
    AbilityName, ChatMessage, EffectKind, PlayerId, StatusEffect, StoneType, TextColor,
};
use crate::host::AbilityHost;
use crate::loader::ConfigHandle;
use std::time::Duration;

const KNOCKBACK_RANGE: f64 = 3.0;
const KNOCKBACK_FORCE: f64 = 0.8;
const KNOCKBACK_Y: f64 = 0.3;
const RESISTANCE_TICKS: u32 = 100;
const RESISTANCE_AMPLIFIER: u8 = 2;

pub struct StoneShield {
    config: ConfigHandle,
}

impl StoneShield {
    pub fn new(config: ConfigHandle) -> Self {
        StoneShield { config }
    }
}

impl AbilityHandler for StoneShield {
    fn stone_type(&self) -> StoneType {
        StoneType::Earth
    }

    fn name(&self) -> AbilityName {
        self.config.read(|c| c.ability_name(StoneType::Earth))
    }

    fn declared_cooldown(&self) -> Duration {
        self.config.cooldown(StoneType::Earth)
    }

    fn try_activate(&self, host: &mut dyn AbilityHost, player: PlayerId) -> bool {
        let Some(origin) = host.position(player) else {
            return false;
        };

        host.add_effect(
            player,
            StatusEffect::new(EffectKind::Resistance, RESISTANCE_TICKS, RESISTANCE_AMPLIFIER),
        );

        for target in host.nearby_living(player, KNOCKBACK_RANGE) {
            let Some(pos) = host.position(target) else {
                continue;
            };
            let push = (pos - origin).normalize() * KNOCKBACK_FORCE;
            host.set_velocity(target, push.with_y(KNOCKBACK_Y));
        }

        host.schedule(Box::new(ShieldOrbit::new(player)));
        host.send_message(player, ChatMessage::new(TextColor::Green, "Stone Shield activated!"));
        true
    }
}
