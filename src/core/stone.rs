//! Stone types
//!
//! The closed set of ability stones. Every per-stone default (display name,
//! lore, ability name, cooldown) lives here; configuration overrides them.

use crate::StoneError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoneType {
    Fire,
    Water,
    Earth,
    Air,
    Lightning,
    Darkness,
}

impl StoneType {
    /// All stone types in catalog order
    pub const ALL: [StoneType; 6] = [
        StoneType::Fire,
        StoneType::Water,
        StoneType::Earth,
        StoneType::Air,
        StoneType::Lightning,
        StoneType::Darkness,
    ];

    /// Lowercase key used in configuration and scenarios
    pub fn key(&self) -> &'static str {
        match self {
            StoneType::Fire => "fire",
            StoneType::Water => "water",
            StoneType::Earth => "earth",
            StoneType::Air => "air",
            StoneType::Lightning => "lightning",
            StoneType::Darkness => "darkness",
        }
    }

    /// Uppercase tag stored on stone items
    pub fn tag(&self) -> &'static str {
        match self {
            StoneType::Fire => "FIRE",
            StoneType::Water => "WATER",
            StoneType::Earth => "EARTH",
            StoneType::Air => "AIR",
            StoneType::Lightning => "LIGHTNING",
            StoneType::Darkness => "DARKNESS",
        }
    }

    /// Exact inverse of [`StoneType::tag`]
    pub fn from_tag(tag: &str) -> Option<StoneType> {
        StoneType::ALL.into_iter().find(|stone| stone.tag() == tag)
    }

    pub fn default_display_name(&self) -> &'static str {
        match self {
            StoneType::Fire => "&c&lFire Stone",
            StoneType::Water => "&b&lWater Stone",
            StoneType::Earth => "&a&lEarth Stone",
            StoneType::Air => "&f&lAir Stone",
            StoneType::Lightning => "&e&lLightning Stone",
            StoneType::Darkness => "&5&lDarkness Stone",
        }
    }

    pub fn default_ability_name(&self) -> &'static str {
        match self {
            StoneType::Fire => "Fire Burst",
            StoneType::Water => "Heal Wave",
            StoneType::Earth => "Stone Shield",
            StoneType::Air => "Dash Forward",
            StoneType::Lightning => "Chain Lightning",
            StoneType::Darkness => "Shadow Curse",
        }
    }

    pub fn default_cooldown(&self) -> Duration {
        Duration::from_secs(self.default_cooldown_secs() as u64)
    }

    pub(crate) fn default_cooldown_secs(&self) -> i64 {
        match self {
            StoneType::Fire => 10,
            StoneType::Water => 12,
            StoneType::Earth => 15,
            StoneType::Air => 8,
            StoneType::Lightning => 12,
            StoneType::Darkness => 15,
        }
    }

    pub fn default_lore(&self) -> [&'static str; 5] {
        match self {
            StoneType::Fire => [
                "&7Ability: &eFire Burst",
                "&7Shoot a fireball that explodes",
                "&7on impact",
                "",
                "&eCooldown: 10s",
            ],
            StoneType::Water => [
                "&7Ability: &eHeal Wave",
                "&7Heal yourself and nearby allies",
                "&7and apply Regen II for 5s",
                "",
                "&eCooldown: 12s",
            ],
            StoneType::Earth => [
                "&7Ability: &eStone Shield",
                "&7Gain Resistance III for 5s",
                "&7and knockback nearby enemies",
                "",
                "&eCooldown: 15s",
            ],
            StoneType::Air => [
                "&7Ability: &eDash Forward",
                "&7Quickly dash forward 5-7 blocks",
                "&7with Speed II and particles",
                "",
                "&eCooldown: 8s",
            ],
            StoneType::Lightning => [
                "&7Ability: &eChain Lightning",
                "&7Strike 3 nearest enemies within",
                "&76 blocks with lightning",
                "",
                "&eCooldown: 12s",
            ],
            StoneType::Darkness => [
                "&7Ability: &eShadow Curse",
                "&7Apply Blindness II and Slowness II",
                "&7to nearby enemies for 3s",
                "",
                "&eCooldown: 15s",
            ],
        }
    }
}

impl fmt::Display for StoneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for StoneType {
    type Err = StoneError;

    /// Case-insensitive: "fire", "FIRE" and "Fire" all parse
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StoneType::ALL
            .into_iter()
            .find(|stone| stone.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| StoneError::UnknownStoneType(s.to_string()))
    }
}
