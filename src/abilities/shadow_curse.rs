//! Shadow Curse: blind and slow everything close by

use super::animations::CurseSpikes;
use super::AbilityHandler;
use crate::core::{
    AbilityName, ChatMessage, EffectKind, PlayerId, StatusEffect, StoneType, TextColor,
};
use crate::host::AbilityHost;
use crate::loader::ConfigHandle;
use std::time::Duration;

const RANGE: f64 = 4.0;
const EFFECT_TICKS: u32 = 60;
const EFFECT_AMPLIFIER: u8 = 1;

pub struct ShadowCurse {
    config: ConfigHandle,
}

impl ShadowCurse {
    pub fn new(config: ConfigHandle) -> Self {
        ShadowCurse { config }
    }
}

impl AbilityHandler for ShadowCurse {
    fn stone_type(&self) -> StoneType {
        StoneType::Darkness
    }

    fn name(&self) -> AbilityName {
        self.config.read(|c| c.ability_name(StoneType::Darkness))
    }

    fn declared_cooldown(&self) -> Duration {
        self.config.cooldown(StoneType::Darkness)
    }

    fn try_activate(&self, host: &mut dyn AbilityHost, player: PlayerId) -> bool {
        if host.position(player).is_none() {
            return false;
        }

        let targets = host.nearby_living(player, RANGE);
        if targets.is_empty() {
            host.send_message(player, ChatMessage::new(TextColor::Red, "No enemies nearby!"));
            return false;
        }

        for &target in &targets {
            host.add_effect(
                target,
                StatusEffect::new(EffectKind::Blindness, EFFECT_TICKS, EFFECT_AMPLIFIER),
            );
            host.add_effect(
                target,
                StatusEffect::new(EffectKind::Slowness, EFFECT_TICKS, EFFECT_AMPLIFIER),
            );
        }

        host.schedule(Box::new(CurseSpikes::new(player)));
        host.send_message(
            player,
            ChatMessage::new(
                TextColor::DarkPurple,
                format!("Shadow Curse affected {} enemies!", targets.len()),
            ),
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EntityId, Vec3};
    use crate::loader::StonesConfig;
    use crate::sim::SimulatedWorld;

    #[test]
    fn test_curses_everyone_in_range() {
        let mut world = SimulatedWorld::new();
        let alice = EntityId::new(1);
        let bob = EntityId::new(2);
        let zombie = EntityId::new(10);
        world.spawn_player(alice, "Alice", Vec3::new(0.0, 64.0, 0.0));
        world.spawn_player(bob, "Bob", Vec3::new(0.0, 64.0, 4.0));
        world.spawn_mob(zombie, "Zombie", Vec3::new(-2.0, 65.0, 0.0), 20.0);

        let curse = ShadowCurse::new(ConfigHandle::new(StonesConfig::default()));
        assert!(curse.try_activate(&mut world, alice));

        let blind = StatusEffect::new(EffectKind::Blindness, 60, 1);
        assert!(world.effects(bob).contains(&blind));
        assert!(world.effects(zombie).contains(&blind));
        assert!(world.effects(alice).is_empty());
        assert_eq!(
            world.last_message(alice).unwrap().text,
            "Shadow Curse affected 2 enemies!"
        );
        assert_eq!(world.scheduled_tasks(), 1);
    }

    #[test]
    fn test_declines_when_alone() {
        let mut world = SimulatedWorld::new();
        let alice = EntityId::new(1);
        world.spawn_player(alice, "Alice", Vec3::new(0.0, 64.0, 0.0));

        let curse = ShadowCurse::new(ConfigHandle::new(StonesConfig::default()));
        assert!(!curse.try_activate(&mut world, alice));
        assert_eq!(world.scheduled_tasks(), 0);
    }
}
