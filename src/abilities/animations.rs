//! Per-tick follow-up tasks started by abilities
//!
//! Each task follows its own elapsed-tick count and positional state. Only the
//! fireball has a gameplay consequence (its explosion); the rest are visual.

use crate::core::{EntityId, Particle, PlayerId, Vec3};
use crate::host::AbilityHost;
use crate::tasks::{RepeatingTask, TaskControl};

/// Points on a horizontal circle around `center`, `count` evenly spaced
/// starting at `start_deg`
fn ring(center: Vec3, radius: f64, start_deg: f64, count: u32) -> impl Iterator<Item = Vec3> {
    let step = 360.0 / count as f64;
    (0..count).map(move |i| {
        let radians = (start_deg + step * i as f64).to_radians();
        Vec3::new(
            center.x + radians.cos() * radius,
            center.y,
            center.z + radians.sin() * radius,
        )
    })
}

pub struct FireballFlight {
    position: Vec3,
    direction: Vec3,
}

impl FireballFlight {
    pub const SPEED: f64 = 0.5;
    pub const MAX_TICKS: u32 = 100;
    pub const EXPLOSION_POWER: f32 = 3.0;

    pub fn new(start: Vec3, direction: Vec3) -> Self {
        FireballFlight {
            position: start,
            direction: direction.normalize(),
        }
    }

    fn explode(&self, host: &mut dyn AbilityHost) {
        host.create_explosion(self.position, Self::EXPLOSION_POWER, false, false);
        host.spawn_particles(Particle::Explosion, self.position, 5);
        host.spawn_particles(Particle::Flame, self.position, 50);
    }
}

impl RepeatingTask for FireballFlight {
    fn name(&self) -> &'static str {
        "fireball"
    }

    fn run(&mut self, host: &mut dyn AbilityHost, elapsed: u32) -> TaskControl {
        if elapsed >= Self::MAX_TICKS || host.is_solid(self.position) {
            self.explode(host);
            return TaskControl::Finished;
        }

        self.position += self.direction * Self::SPEED;
        host.spawn_particles(Particle::Flame, self.position, 10);
        host.spawn_particles(Particle::Smoke, self.position, 5);
        host.spawn_particles(Particle::Lava, self.position, 2);
        TaskControl::Continue
    }
}

/// Expanding ring around the healer
pub struct HealRing {
    player: PlayerId,
    radius: f64,
}

impl HealRing {
    pub const TICKS: u32 = 30;
    pub const MAX_RADIUS: f64 = 6.0;

    pub fn new(player: PlayerId) -> Self {
        HealRing { player, radius: 0.0 }
    }
}

impl RepeatingTask for HealRing {
    fn name(&self) -> &'static str {
        "heal_ring"
    }

    fn run(&mut self, host: &mut dyn AbilityHost, elapsed: u32) -> TaskControl {
        if self.radius > Self::MAX_RADIUS || elapsed >= Self::TICKS {
            return TaskControl::Finished;
        }
        let Some(center) = host.position(self.player) else {
            return TaskControl::Finished;
        };

        let center = center + Vec3::new(0.0, 0.1, 0.0);
        for point in ring(center, self.radius, 0.0, 72) {
            host.spawn_particles(Particle::Dust, point, 2);
            host.spawn_particles(Particle::Bubble, point, 1);
        }
        self.radius += 0.2;
        TaskControl::Continue
    }
}

/// Three stones orbiting the shielded player
pub struct ShieldOrbit {
    player: PlayerId,
    angle: f64,
}

impl ShieldOrbit {
    pub const TICKS: u32 = 100;

    pub fn new(player: PlayerId) -> Self {
        ShieldOrbit { player, angle: 0.0 }
    }
}

impl RepeatingTask for ShieldOrbit {
    fn name(&self) -> &'static str {
        "shield_orbit"
    }

    fn run(&mut self, host: &mut dyn AbilityHost, elapsed: u32) -> TaskControl {
        if elapsed >= Self::TICKS {
            return TaskControl::Finished;
        }
        let Some(center) = host.position(self.player) else {
            return TaskControl::Finished;
        };

        let center = center + Vec3::new(0.0, 0.5, 0.0);
        for point in ring(center, 1.5, self.angle, 3) {
            host.spawn_particles(Particle::BlockCrumble, point, 1);
        }
        self.angle += 5.0;
        TaskControl::Continue
    }
}

/// Spinning slashes that follow a dashing player
pub struct DashTrail {
    player: PlayerId,
    angle: f64,
}

impl DashTrail {
    pub const TICKS: u32 = 40;

    pub fn new(player: PlayerId) -> Self {
        DashTrail { player, angle: 0.0 }
    }
}

impl RepeatingTask for DashTrail {
    fn name(&self) -> &'static str {
        "dash_trail"
    }

    fn run(&mut self, host: &mut dyn AbilityHost, elapsed: u32) -> TaskControl {
        if elapsed >= Self::TICKS {
            return TaskControl::Finished;
        }
        let Some(center) = host.position(self.player) else {
            return TaskControl::Finished;
        };

        let center = center + Vec3::new(0.0, 1.0, 0.0);
        for point in ring(center, 0.8, self.angle, 3) {
            host.spawn_particles(Particle::SweepAttack, point, 1);
            host.spawn_particles(Particle::Crit, point, 2);
        }
        self.angle += 30.0;
        TaskControl::Continue
    }
}

/// Dark spikes falling around the caster
///
/// Redraws every other tick.
pub struct CurseSpikes {
    caster: EntityId,
}

impl CurseSpikes {
    pub const TICKS: u32 = 60;
    const SPIKES: u32 = 8;
    const HEIGHT: f64 = 3.0;

    pub fn new(caster: EntityId) -> Self {
        CurseSpikes { caster }
    }
}

impl RepeatingTask for CurseSpikes {
    fn name(&self) -> &'static str {
        "curse_spikes"
    }

    fn run(&mut self, host: &mut dyn AbilityHost, elapsed: u32) -> TaskControl {
        if elapsed >= Self::TICKS * 2 {
            return TaskControl::Finished;
        }
        if elapsed % 2 == 1 {
            return TaskControl::Continue;
        }
        let Some(center) = host.position(self.caster) else {
            return TaskControl::Finished;
        };

        let top = center + Vec3::new(0.0, Self::HEIGHT, 0.0);
        let radius = 1.0 + (elapsed / 2 % 4) as f64;
        for spike in ring(top, radius, elapsed as f64 * 7.0, Self::SPIKES) {
            let mut y = 0.0;
            while y < Self::HEIGHT {
                host.spawn_particles(Particle::Dust, spike - Vec3::new(0.0, y, 0.0), 1);
                y += 0.2;
            }
        }
        TaskControl::Continue
    }
}
