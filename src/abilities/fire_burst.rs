//! Fire Burst: launch an exploding fireball along the view direction

use super::animations::FireballFlight;
use super::AbilityHandler;
use crate::core::{AbilityName, ChatMessage, PlayerId, StoneType, TextColor};
use crate::host::AbilityHost;
use crate::loader::ConfigHandle;
use std::time::Duration;

pub struct FireBurst {
    config: ConfigHandle,
}

impl FireBurst {
    pub fn new(config: ConfigHandle) -> Self {
        FireBurst { config }
    }
}

impl AbilityHandler for FireBurst {
    fn stone_type(&self) -> StoneType {
        StoneType::Fire
    }

    fn name(&self) -> AbilityName {
        self.config.read(|c| c.ability_name(StoneType::Fire))
    }

    fn declared_cooldown(&self) -> Duration {
        self.config.cooldown(StoneType::Fire)
    }

    fn try_activate(&self, host: &mut dyn AbilityHost, player: PlayerId) -> bool {
        let (Some(eye), Some(facing)) = (host.eye_position(player), host.facing(player)) else {
            return false;
        };

        host.schedule(Box::new(FireballFlight::new(eye, facing)));
        host.send_message(player, ChatMessage::new(TextColor::Red, "Fire Burst activated!"));
        true
    }
}
