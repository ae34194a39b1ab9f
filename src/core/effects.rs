//! Status effects and particle kinds applied by abilities

use serde::{Deserialize, Serialize};

/// Kinds of timed status effect (potion effects in host terms)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    Regeneration,
    Resistance,
    Speed,
    Blindness,
    Slowness,
}

/// A timed status effect
///
/// `amplifier` is zero-based, so Regeneration II has amplifier 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: EffectKind,
    /// Duration in server ticks (20 per second)
    pub duration_ticks: u32,
    pub amplifier: u8,
}

impl StatusEffect {
    pub fn new(kind: EffectKind, duration_ticks: u32, amplifier: u8) -> Self {
        StatusEffect {
            kind,
            duration_ticks,
            amplifier,
        }
    }
}

/// Particle kinds the abilities spawn
///
/// Purely visual; hosts are free to render them however they like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Particle {
    Flame,
    Smoke,
    Lava,
    Explosion,
    Dust,
    Bubble,
    BlockCrumble,
    SweepAttack,
    Crit,
}
