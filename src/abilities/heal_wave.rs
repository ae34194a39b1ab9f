//! Heal Wave: heal the caster and nearby players, with regeneration

use super::animations::HealRing;
use super::AbilityHandler;
use crate::core::{
    AbilityName, ChatMessage, EffectKind, EntityId, PlayerId, StatusEffect, StoneType, TextColor,
};
use crate::host::AbilityHost;
use crate::loader::ConfigHandle;
use std::time::Duration;

const HEAL_AMOUNT: f64 = 4.0;
const RANGE: f64 = 5.0;
const REGEN_TICKS: u32 = 100;
const REGEN_AMPLIFIER: u8 = 1;

pub struct HealWave {
    config: ConfigHandle,
}

impl HealWave {
    pub fn new(config: ConfigHandle) -> Self {
        HealWave { config }
    }

    fn heal(host: &mut dyn AbilityHost, target: EntityId) {
        if let Some(health) = host.health(target) {
            host.set_health(target, (health.current + HEAL_AMOUNT).min(health.max));
        }
        host.add_effect(
            target,
            StatusEffect::new(EffectKind::Regeneration, REGEN_TICKS, REGEN_AMPLIFIER),
        );
    }
}

impl AbilityHandler for HealWave {
    fn stone_type(&self) -> StoneType {
        StoneType::Water
    }

    fn name(&self) -> AbilityName {
        self.config.read(|c| c.ability_name(StoneType::Water))
    }

    fn declared_cooldown(&self) -> Duration {
        self.config.cooldown(StoneType::Water)
    }

    fn try_activate(&self, host: &mut dyn AbilityHost, player: PlayerId) -> bool {
        if host.position(player).is_none() {
            return false;
        }

        Self::heal(host, player);

        let healer = host
            .display_name(player)
            .unwrap_or_else(|| player.to_string());
        let allies: Vec<EntityId> = host
            .nearby_living(player, RANGE)
            .into_iter()
            .filter(|id| host.is_player(*id))
            .collect();
        for ally in allies {
            Self::heal(host, ally);
            host.send_message(
                ally,
                ChatMessage::new(TextColor::Aqua, format!("{healer} healed you!")),
            );
        }

        host.schedule(Box::new(HealRing::new(player)));
        host.send_message(player, ChatMessage::new(TextColor::Aqua, "Heal Wave activated!"));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Vec3;
    use crate::loader::StonesConfig;
    use crate::sim::SimulatedWorld;

    #[test]
    fn test_heals_caster_and_nearby_players_only() {
        let mut world = SimulatedWorld::new();
        let alice = EntityId::new(1);
        let bob = EntityId::new(2);
        let carol = EntityId::new(3);
        let zombie = EntityId::new(10);
        world.spawn_player(alice, "Alice", Vec3::new(0.0, 64.0, 0.0));
        world.spawn_player(bob, "Bob", Vec3::new(3.0, 64.0, 0.0));
        world.spawn_player(carol, "Carol", Vec3::new(20.0, 64.0, 0.0));
        world.spawn_mob(zombie, "Zombie", Vec3::new(1.0, 64.0, 0.0), 20.0);
        for id in [alice, bob, carol, zombie] {
            world.set_current_health(id, 10.0);
        }

        let heal = HealWave::new(ConfigHandle::new(StonesConfig::default()));
        assert!(heal.try_activate(&mut world, alice));

        assert_eq!(world.health(alice).unwrap().current, 14.0);
        assert_eq!(world.health(bob).unwrap().current, 14.0);
        assert_eq!(world.health(carol).unwrap().current, 10.0);
        assert_eq!(world.health(zombie).unwrap().current, 10.0);

        assert_eq!(world.last_message(bob).unwrap().text, "Alice healed you!");
        assert_eq!(world.last_message(alice).unwrap().text, "Heal Wave activated!");
        assert!(world
            .effects(bob)
            .contains(&StatusEffect::new(EffectKind::Regeneration, 100, 1)));
    }

    #[test]
    fn test_heal_is_capped_at_max_health() {
        let mut world = SimulatedWorld::new();
        let alice = EntityId::new(1);
        world.spawn_player(alice, "Alice", Vec3::new(0.0, 64.0, 0.0));
        world.set_current_health(alice, 18.5);

        let heal = HealWave::new(ConfigHandle::new(StonesConfig::default()));
        assert!(heal.try_activate(&mut world, alice));
        assert_eq!(world.health(alice).unwrap().current, 20.0);
    }
}
