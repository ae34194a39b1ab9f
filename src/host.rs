//! Host engine interface
//!
//! Ability handlers never talk to a game server directly. Everything they can
//! observe or change goes through [`AbilityHost`], which a server adapter (or
//! [`crate::sim::SimulatedWorld`] in tests and the CLI) implements.

use crate::core::{ChatMessage, EntityId, Particle, PlayerId, StatusEffect, Vec3};
use crate::tasks::{RepeatingTask, TaskId};

/// Health of a living entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    pub current: f64,
    pub max: f64,
}

pub trait AbilityHost {
    /// Feet position of a living entity
    fn position(&self, entity: EntityId) -> Option<Vec3>;

    /// Eye position of a living entity
    fn eye_position(&self, entity: EntityId) -> Option<Vec3>;

    /// Unit view direction of a living entity
    fn facing(&self, entity: EntityId) -> Option<Vec3>;

    /// Living entities inside the cube of half-extent `range` around
    /// `center`, excluding `center` itself
    fn nearby_living(&self, center: EntityId, range: f64) -> Vec<EntityId>;

    fn is_player(&self, entity: EntityId) -> bool;

    fn display_name(&self, entity: EntityId) -> Option<String>;

    fn health(&self, entity: EntityId) -> Option<Health>;

    fn set_health(&mut self, entity: EntityId, health: f64);

    fn damage(&mut self, target: EntityId, amount: f64, source: Option<EntityId>);

    fn add_effect(&mut self, target: EntityId, effect: StatusEffect);

    fn set_velocity(&mut self, entity: EntityId, velocity: Vec3);

    /// Purely visual lightning strike
    fn strike_lightning_effect(&mut self, at: Vec3);

    fn create_explosion(&mut self, at: Vec3, power: f32, set_fire: bool, break_blocks: bool);

    fn is_solid(&self, at: Vec3) -> bool;

    fn spawn_particles(&mut self, particle: Particle, at: Vec3, count: u32);

    fn send_message(&mut self, player: PlayerId, message: ChatMessage);

    /// Schedule `task` to run once per tick, starting on the next tick
    fn schedule(&mut self, task: Box<dyn RepeatingTask>) -> TaskId;

    fn cancel(&mut self, task: TaskId) -> bool;
}
