//! In-memory host for tests and the `stones` binary
//!
//! [`SimulatedWorld`] implements [`AbilityHost`] over a flat world: living
//! entities with position, facing, velocity, health and status effects, a set
//! of solid blocks, and a task scheduler stepped at 20 ticks per second.
//! Everything the abilities emit (messages, particles, explosions, lightning)
//! is recorded for inspection.

pub mod runner;

pub use runner::{ScenarioReport, ScenarioRunner, TimelineEntry};

use crate::core::{
    BlockPos, ChatMessage, EntityId, EntityName, EntityStore, Particle, PlayerId, StatusEffect,
    Vec3,
};
use crate::host::{AbilityHost, Health};
use crate::tasks::{RepeatingTask, TaskId, TaskScheduler};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

pub const TICKS_PER_SECOND: u32 = 20;

/// Height of a player's eyes above their feet
pub const EYE_HEIGHT: f64 = 1.62;

/// Fraction of velocity kept after each tick
const FRICTION: f64 = 0.91;

pub const DEFAULT_MAX_HEALTH: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LivingKind {
    Player,
    Mob,
}

#[derive(Debug, Clone, Serialize)]
pub struct LivingEntity {
    pub kind: LivingKind,
    pub name: EntityName,
    pub position: Vec3,
    pub facing: Vec3,
    pub velocity: Vec3,
    pub health: f64,
    pub max_health: f64,
    pub effects: Vec<StatusEffect>,
}

impl LivingEntity {
    fn new(kind: LivingKind, name: EntityName, position: Vec3, max_health: f64) -> Self {
        LivingEntity {
            kind,
            name,
            position,
            facing: Vec3::new(0.0, 0.0, 1.0),
            velocity: Vec3::ZERO,
            health: max_health,
            max_health,
            effects: Vec::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Explosion {
    pub at: Vec3,
    pub power: f32,
    pub set_fire: bool,
    pub break_blocks: bool,
    pub tick: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DamageEvent {
    pub target: EntityId,
    pub amount: f64,
    pub source: Option<EntityId>,
    pub tick: u64,
}

#[derive(Default)]
pub struct SimulatedWorld {
    entities: EntityStore<LivingEntity>,
    solids: FxHashSet<BlockPos>,
    scheduler: TaskScheduler,
    current_tick: u64,
    messages: Vec<(PlayerId, ChatMessage)>,
    particles: FxHashMap<Particle, u64>,
    explosions: Vec<Explosion>,
    lightning: Vec<Vec3>,
    damage: Vec<DamageEvent>,
}

impl SimulatedWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn_player(&mut self, id: PlayerId, name: impl Into<EntityName>, position: Vec3) {
        let entity = LivingEntity::new(LivingKind::Player, name.into(), position, DEFAULT_MAX_HEALTH);
        if self.entities.insert(id, entity).is_some() {
            tracing::warn!(entity = %id, "replaced existing entity with player");
        }
    }

    pub fn spawn_mob(
        &mut self,
        id: EntityId,
        name: impl Into<EntityName>,
        position: Vec3,
        max_health: f64,
    ) {
        let entity = LivingEntity::new(LivingKind::Mob, name.into(), position, max_health);
        if self.entities.insert(id, entity).is_some() {
            tracing::warn!(entity = %id, "replaced existing entity with mob");
        }
    }

    pub fn remove_entity(&mut self, id: EntityId) -> bool {
        self.entities.remove(id).is_some()
    }

    pub fn entity(&self, id: EntityId) -> Option<&LivingEntity> {
        self.entities.get(id)
    }

    /// Entities ordered by id
    pub fn entities(&self) -> Vec<(EntityId, &LivingEntity)> {
        let mut all: Vec<_> = self.entities.iter().map(|(id, e)| (*id, e)).collect();
        all.sort_by_key(|(id, _)| *id);
        all
    }

    pub fn set_facing(&mut self, id: EntityId, facing: Vec3) {
        if let Some(entity) = self.entities.get_mut(id) {
            entity.facing = facing.normalize();
        }
    }

    /// Set current health without touching max health
    pub fn set_current_health(&mut self, id: EntityId, health: f64) {
        if let Some(entity) = self.entities.get_mut(id) {
            entity.health = health.clamp(0.0, entity.max_health);
        }
    }

    pub fn add_solid(&mut self, block: BlockPos) {
        self.solids.insert(block);
    }

    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    pub fn velocity(&self, id: EntityId) -> Option<Vec3> {
        self.entities.get(id).map(|e| e.velocity)
    }

    pub fn effects(&self, id: EntityId) -> &[StatusEffect] {
        self.entities
            .get(id)
            .map(|e| e.effects.as_slice())
            .unwrap_or(&[])
    }

    /// Every message sent so far, in order
    pub fn messages(&self) -> &[(PlayerId, ChatMessage)] {
        &self.messages
    }

    pub fn messages_for(&self, player: PlayerId) -> impl Iterator<Item = &ChatMessage> {
        self.messages
            .iter()
            .filter(move |(to, _)| *to == player)
            .map(|(_, message)| message)
    }

    pub fn last_message(&self, player: PlayerId) -> Option<&ChatMessage> {
        self.messages_for(player).last()
    }

    pub fn particle_count(&self, particle: Particle) -> u64 {
        self.particles.get(&particle).copied().unwrap_or(0)
    }

    /// Particle totals by kind, ordered by kind
    pub fn particle_totals(&self) -> Vec<(Particle, u64)> {
        let mut totals: Vec<_> = self.particles.iter().map(|(p, n)| (*p, *n)).collect();
        totals.sort();
        totals
    }

    pub fn explosions(&self) -> &[Explosion] {
        &self.explosions
    }

    pub fn lightning_strikes(&self) -> &[Vec3] {
        &self.lightning
    }

    pub fn damage_events(&self) -> &[DamageEvent] {
        &self.damage
    }

    pub fn scheduled_tasks(&self) -> usize {
        self.scheduler.len()
    }

    /// Advance one tick: run scheduled tasks, then move entities and age
    /// their effects
    pub fn tick(&mut self) {
        let mut batch = self.scheduler.take_due();
        batch.run(self, |world| &mut world.scheduler);
        self.scheduler.restore(batch);

        for (_, entity) in self.entities.iter_mut() {
            entity.position += entity.velocity;
            entity.velocity = entity.velocity * FRICTION;
            entity.effects.retain_mut(|effect| {
                effect.duration_ticks = effect.duration_ticks.saturating_sub(1);
                effect.duration_ticks > 0
            });
        }
        self.current_tick += 1;
    }

    pub fn advance(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.tick();
        }
    }
}

impl AbilityHost for SimulatedWorld {
    fn position(&self, entity: EntityId) -> Option<Vec3> {
        self.entities.get(entity).map(|e| e.position)
    }

    fn eye_position(&self, entity: EntityId) -> Option<Vec3> {
        self.position(entity)
            .map(|pos| pos + Vec3::new(0.0, EYE_HEIGHT, 0.0))
    }

    fn facing(&self, entity: EntityId) -> Option<Vec3> {
        self.entities.get(entity).map(|e| e.facing)
    }

    fn nearby_living(&self, center: EntityId, range: f64) -> Vec<EntityId> {
        let Some(origin) = self.position(center) else {
            return Vec::new();
        };
        let mut found: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|(id, e)| **id != center && e.is_alive() && origin.within_cube(e.position, range))
            .map(|(id, _)| *id)
            .collect();
        found.sort();
        found
    }

    fn is_player(&self, entity: EntityId) -> bool {
        self.entities
            .get(entity)
            .is_some_and(|e| e.kind == LivingKind::Player)
    }

    fn display_name(&self, entity: EntityId) -> Option<String> {
        self.entities.get(entity).map(|e| e.name.to_string())
    }

    fn health(&self, entity: EntityId) -> Option<Health> {
        self.entities.get(entity).map(|e| Health {
            current: e.health,
            max: e.max_health,
        })
    }

    fn set_health(&mut self, entity: EntityId, health: f64) {
        self.set_current_health(entity, health);
    }

    fn damage(&mut self, target: EntityId, amount: f64, source: Option<EntityId>) {
        let Some(entity) = self.entities.get_mut(target) else {
            return;
        };
        entity.health = (entity.health - amount).max(0.0);
        if !entity.is_alive() {
            tracing::debug!(entity = %target, name = %entity.name, "entity died");
        }
        self.damage.push(DamageEvent {
            target,
            amount,
            source,
            tick: self.current_tick,
        });
    }

    /// A new effect replaces any running effect of the same kind
    fn add_effect(&mut self, target: EntityId, effect: StatusEffect) {
        if let Some(entity) = self.entities.get_mut(target) {
            entity.effects.retain(|e| e.kind != effect.kind);
            entity.effects.push(effect);
        }
    }

    fn set_velocity(&mut self, entity: EntityId, velocity: Vec3) {
        if let Some(entity) = self.entities.get_mut(entity) {
            entity.velocity = velocity;
        }
    }

    fn strike_lightning_effect(&mut self, at: Vec3) {
        self.lightning.push(at);
    }

    fn create_explosion(&mut self, at: Vec3, power: f32, set_fire: bool, break_blocks: bool) {
        tracing::debug!(x = at.x, y = at.y, z = at.z, power, "explosion");
        self.explosions.push(Explosion {
            at,
            power,
            set_fire,
            break_blocks,
            tick: self.current_tick,
        });
    }

    fn is_solid(&self, at: Vec3) -> bool {
        self.solids.contains(&at.block())
    }

    fn spawn_particles(&mut self, particle: Particle, _at: Vec3, count: u32) {
        *self.particles.entry(particle).or_insert(0) += u64::from(count);
    }

    fn send_message(&mut self, player: PlayerId, message: ChatMessage) {
        if !self.is_player(player) {
            return;
        }
        tracing::trace!(player = %player, text = %message.text, "chat");
        self.messages.push((player, message));
    }

    fn schedule(&mut self, task: Box<dyn RepeatingTask>) -> TaskId {
        let id = self.scheduler.schedule(task);
        tracing::trace!(task = %id, "scheduled");
        id
    }

    fn cancel(&mut self, task: TaskId) -> bool {
        self.scheduler.cancel(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::TaskControl;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_nearby_living_uses_cube_and_skips_dead() {
        let mut world = SimulatedWorld::new();
        let alice = EntityId::new(1);
        world.spawn_player(alice, "Alice", Vec3::new(0.0, 64.0, 0.0));
        world.spawn_mob(EntityId::new(2), "Zombie", Vec3::new(3.0, 64.0, 3.0), 20.0);
        world.spawn_mob(EntityId::new(3), "Zombie", Vec3::new(3.5, 64.0, 0.0), 20.0);
        world.spawn_mob(EntityId::new(4), "Husk", Vec3::new(1.0, 64.0, 0.0), 20.0);
        world.set_current_health(EntityId::new(4), 0.0);

        assert_eq!(world.nearby_living(alice, 3.0), vec![EntityId::new(2)]);
        assert!(world.nearby_living(EntityId::new(99), 3.0).is_empty());
    }

    #[test]
    fn test_tick_applies_friction_and_ages_effects() {
        let mut world = SimulatedWorld::new();
        let alice = EntityId::new(1);
        world.spawn_player(alice, "Alice", Vec3::ZERO);
        world.set_velocity(alice, Vec3::new(1.0, 0.0, 0.0));
        world.add_effect(alice, StatusEffect::new(crate::core::EffectKind::Speed, 2, 0));

        world.tick();
        assert_eq!(world.position(alice), Some(Vec3::new(1.0, 0.0, 0.0)));
        assert!((world.velocity(alice).unwrap().x - FRICTION).abs() < 1e-12);
        assert_eq!(world.effects(alice).len(), 1);

        world.tick();
        assert!(world.effects(alice).is_empty());
        assert_eq!(world.current_tick(), 2);
    }

    #[test]
    fn test_messages_only_reach_players() {
        let mut world = SimulatedWorld::new();
        world.spawn_player(EntityId::new(1), "Alice", Vec3::ZERO);
        world.spawn_mob(EntityId::new(2), "Zombie", Vec3::ZERO, 20.0);

        world.send_message(EntityId::new(1), ChatMessage::new(crate::core::TextColor::Red, "hi"));
        world.send_message(EntityId::new(2), ChatMessage::new(crate::core::TextColor::Red, "hi"));
        assert_eq!(world.messages().len(), 1);
    }

    struct CancelOther {
        other: Option<TaskId>,
    }

    impl RepeatingTask for CancelOther {
        fn name(&self) -> &'static str {
            "cancel_other"
        }

        fn run(&mut self, host: &mut dyn AbilityHost, _elapsed: u32) -> TaskControl {
            if let Some(other) = self.other.take() {
                assert!(host.cancel(other));
            }
            TaskControl::Continue
        }
    }

    struct Forever;

    impl RepeatingTask for Forever {
        fn name(&self) -> &'static str {
            "forever"
        }

        fn run(&mut self, _host: &mut dyn AbilityHost, _elapsed: u32) -> TaskControl {
            TaskControl::Continue
        }
    }

    #[test]
    fn test_task_can_cancel_another_mid_tick() {
        let mut world = SimulatedWorld::new();
        let forever = world.scheduler.schedule(Box::new(Forever));
        world.schedule(Box::new(CancelOther {
            other: Some(forever),
        }));
        assert_eq!(world.scheduled_tasks(), 2);

        world.tick();
        assert_eq!(world.scheduled_tasks(), 1);
    }

    struct CancelLater {
        target: Arc<Mutex<Option<TaskId>>>,
    }

    impl RepeatingTask for CancelLater {
        fn name(&self) -> &'static str {
            "cancel_later"
        }

        fn run(&mut self, host: &mut dyn AbilityHost, _elapsed: u32) -> TaskControl {
            if let Some(target) = self.target.lock().unwrap().take() {
                assert!(host.cancel(target));
            }
            TaskControl::Continue
        }
    }

    struct Counter {
        runs: Arc<AtomicU32>,
    }

    impl RepeatingTask for Counter {
        fn name(&self) -> &'static str {
            "counter"
        }

        fn run(&mut self, _host: &mut dyn AbilityHost, _elapsed: u32) -> TaskControl {
            self.runs.fetch_add(1, Ordering::SeqCst);
            TaskControl::Continue
        }
    }

    #[test]
    fn test_task_cancelled_earlier_in_tick_does_not_run() {
        let mut world = SimulatedWorld::new();
        let target = Arc::new(Mutex::new(None));
        let runs = Arc::new(AtomicU32::new(0));
        world.schedule(Box::new(CancelLater {
            target: Arc::clone(&target),
        }));
        let counter = world.schedule(Box::new(Counter { runs: Arc::clone(&runs) }));
        *target.lock().unwrap() = Some(counter);

        world.tick();
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert_eq!(world.scheduled_tasks(), 1);

        world.tick();
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }
}
