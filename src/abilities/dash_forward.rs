//! Dash Forward: launch the caster along the view direction

use super::animations::DashTrail;
use super::AbilityHandler;
use crate::core::{
    AbilityName, ChatMessage, EffectKind, PlayerId, StatusEffect, StoneType, TextColor,
};
use crate::host::AbilityHost;
use crate::loader::ConfigHandle;
use std::time::Duration;

const DASH_MULTIPLIER: f64 = 2.0;
const Y_OFFSET: f64 = 0.3;
const SPEED_TICKS: u32 = 40;
const SPEED_AMPLIFIER: u8 = 1;

pub struct DashForward {
    config: ConfigHandle,
}

impl DashForward {
    pub fn new(config: ConfigHandle) -> Self {
        DashForward { config }
    }
}

impl AbilityHandler for DashForward {
    fn stone_type(&self) -> StoneType {
        StoneType::Air
    }

    fn name(&self) -> AbilityName {
        self.config.read(|c| c.ability_name(StoneType::Air))
    }

    fn declared_cooldown(&self) -> Duration {
        self.config.cooldown(StoneType::Air)
    }

    fn try_activate(&self, host: &mut dyn AbilityHost, player: PlayerId) -> bool {
        let Some(facing) = host.facing(player) else {
            return false;
        };

        let velocity = facing.normalize().with_y(Y_OFFSET) * DASH_MULTIPLIER;
        host.set_velocity(player, velocity);
        host.add_effect(
            player,
            StatusEffect::new(EffectKind::Speed, SPEED_TICKS, SPEED_AMPLIFIER),
        );

        host.schedule(Box::new(DashTrail::new(player)));
        host.send_message(player, ChatMessage::new(TextColor::White, "Dash Forward activated!"));
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
    fn test_dash_sets_velocity_and_moves_player() {
        let mut world = SimulatedWorld::new();
        let alice = EntityId::new(1);
        world.spawn_player(alice, "Alice", Vec3::new(0.0, 64.0, 0.0));
        world.set_facing(alice, Vec3::new(1.0, 0.0, 0.0));

        let dash = DashForward::new(ConfigHandle::new(StonesConfig::default()));
        assert!(dash.try_activate(&mut world, alice));
        assert_eq!(world.velocity(alice), Some(Vec3::new(2.0, 0.6, 0.0)));
        assert!(world
            .effects(alice)
            .contains(&StatusEffect::new(EffectKind::Speed, 40, 1)));

        world.tick();
        assert!(world.position(alice).unwrap().x > 1.9);
    }
}
