//! Scenario runner
//!
//! Plays a [`Scenario`] against an [`AbilityStones`] service and a fresh
//! [`SimulatedWorld`]. Scenario seconds map to ticks at 20 per second and to
//! instants offset from the moment the runner was created, so cooldown maths
//! sees exactly the scenario's timestamps.

use super::{Explosion, LivingKind, SimulatedWorld, DEFAULT_MAX_HEALTH, TICKS_PER_SECOND};
use crate::core::{EntityId, Particle, PlayerId, StoneType, TextColor, Vec3};
use crate::listener::{InteractAction, InteractEvent, InteractOutcome};
use crate::loader::{Scenario, StonesConfig, TimedAction, TimedDirective, MAX_SCENARIO_SECS};
use crate::plugin::AbilityStones;
use serde::Serialize;
use std::fmt;
use std::time::{Duration, Instant};

/// Upper bound on ticks spent letting follow-up tasks finish after the
/// last directive
const MAX_DRAIN_TICKS: u64 = 30 * TICKS_PER_SECOND as u64;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TimelineEvent {
    Interact {
        player: PlayerId,
        action: InteractAction,
        stone: StoneType,
        outcome: InteractOutcome,
    },
    CooldownChanged {
        stone: StoneType,
        seconds: i64,
    },
    Quit {
        player: PlayerId,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineEntry {
    pub line: usize,
    pub at_secs: f64,
    pub tick: u64,
    #[serde(flatten)]
    pub event: TimelineEvent,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntityReport {
    pub id: EntityId,
    pub name: String,
    pub kind: LivingKind,
    pub health: f64,
    pub max_health: f64,
    pub position: Vec3,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageReport {
    pub player: PlayerId,
    pub color: TextColor,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticleCount {
    pub particle: Particle,
    pub count: u64,
}

/// Everything a scenario run produced
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub timeline: Vec<TimelineEntry>,
    pub final_tick: u64,
    pub entities: Vec<EntityReport>,
    pub messages: Vec<MessageReport>,
    pub explosions: Vec<Explosion>,
    pub lightning_strikes: usize,
    pub particles: Vec<ParticleCount>,
    pub active_cooldowns: usize,
}

impl ScenarioReport {
    /// Outcomes of the interact directives, in order
    pub fn interact_outcomes(&self) -> Vec<InteractOutcome> {
        self.timeline
            .iter()
            .filter_map(|entry| match entry.event {
                TimelineEvent::Interact { outcome, .. } => Some(outcome),
                _ => None,
            })
            .collect()
    }
}

pub struct ScenarioRunner {
    plugin: AbilityStones,
    world: SimulatedWorld,
    start: Instant,
}

impl ScenarioRunner {
    /// Build the world described by the scenario's setup lines
    pub fn new(config: StonesConfig, scenario: &Scenario) -> Self {
        let mut world = SimulatedWorld::new();
        for spec in &scenario.entities {
            match spec.kind {
                LivingKind::Player => {
                    world.spawn_player(spec.id, spec.name.clone(), spec.position);
                    if let Some(hp) = spec.health {
                        world.set_current_health(spec.id, hp);
                    }
                }
                LivingKind::Mob => {
                    let max = spec.health.unwrap_or(DEFAULT_MAX_HEALTH);
                    world.spawn_mob(spec.id, spec.name.clone(), spec.position, max);
                }
            }
            if let Some(facing) = spec.facing {
                world.set_facing(spec.id, facing);
            }
        }
        for block in &scenario.solids {
            world.add_solid(*block);
        }

        ScenarioRunner {
            plugin: AbilityStones::new(config),
            world,
            start: Instant::now(),
        }
    }

    pub fn world(&self) -> &SimulatedWorld {
        &self.world
    }

    pub fn plugin(&self) -> &AbilityStones {
        &self.plugin
    }

    pub fn run(&mut self, scenario: &Scenario) -> ScenarioReport {
        let timeline: Vec<TimelineEntry> = scenario
            .timeline
            .iter()
            .map(|directive| self.step(directive))
            .collect();

        let mut drained = 0;
        while self.world.scheduled_tasks() > 0 && drained < MAX_DRAIN_TICKS {
            self.world.tick();
            drained += 1;
        }
        if self.world.scheduled_tasks() > 0 {
            tracing::warn!(remaining = self.world.scheduled_tasks(), "tasks still running at end of scenario");
        }

        let now = self.start + self.elapsed();
        self.report(timeline, now)
    }

    fn elapsed(&self) -> Duration {
        Duration::from_millis(self.world.current_tick() * 1000 / TICKS_PER_SECOND as u64)
    }

    fn step(&mut self, directive: &TimedDirective) -> TimelineEntry {
        // Hand-built scenarios skip the loader's checks
        let at = Duration::try_from_secs_f64(directive.at_secs.min(MAX_SCENARIO_SECS)).unwrap_or_default();
        let target_tick = (at.as_secs_f64() * TICKS_PER_SECOND as f64).round() as u64;
        let behind = target_tick.saturating_sub(self.world.current_tick());
        self.world.advance(behind);
        let now = self.start + at;

        let event = match directive.action {
            TimedAction::Interact {
                player,
                action,
                stone,
            } => {
                let item = self.plugin.give_stone(stone);
                let mut event = InteractEvent::new(player, action, Some(item));
                let outcome = self.plugin.on_player_interact(&mut self.world, &mut event, now);
                tracing::info!(line = directive.line, %player, %stone, ?outcome, "interact");
                TimelineEvent::Interact {
                    player,
                    action,
                    stone,
                    outcome,
                }
            }
            TimedAction::SetCooldown { stone, seconds } => {
                let mut config = self.plugin.config().snapshot();
                config.settings_mut(stone).cooldown = Some(seconds);
                self.plugin.reload(config);
                TimelineEvent::CooldownChanged { stone, seconds }
            }
            TimedAction::Quit(player) => {
                self.plugin.player_quit(player);
                self.world.remove_entity(player);
                TimelineEvent::Quit { player }
            }
        };

        TimelineEntry {
            line: directive.line,
            at_secs: directive.at_secs,
            tick: self.world.current_tick(),
            event,
        }
    }

    fn report(&mut self, timeline: Vec<TimelineEntry>, now: Instant) -> ScenarioReport {
        let entities = self
            .world
            .entities()
            .into_iter()
            .map(|(id, e)| EntityReport {
                id,
                name: e.name.to_string(),
                kind: e.kind,
                health: e.health,
                max_health: e.max_health,
                position: e.position,
            })
            .collect();
        let messages = self
            .world
            .messages()
            .iter()
            .map(|(player, m)| MessageReport {
                player: *player,
                color: m.color,
                text: m.text.clone(),
            })
            .collect();
        let particles = self
            .world
            .particle_totals()
            .into_iter()
            .map(|(particle, count)| ParticleCount { particle, count })
            .collect();

        self.plugin.compact(now);
        ScenarioReport {
            timeline,
            final_tick: self.world.current_tick(),
            entities,
            messages,
            explosions: self.world.explosions().to_vec(),
            lightning_strikes: self.world.lightning_strikes().len(),
            particles,
            active_cooldowns: self.plugin.coordinator().cooldowns().len(),
        }
    }
}

impl fmt::Display for TimelineEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:>7.2}s tick {:>5}] line {:>3}: ", self.at_secs, self.tick, self.line)?;
        match &self.event {
            TimelineEvent::Interact {
                player,
                action,
                stone,
                outcome,
            } => {
                let action = if action.is_right_click() { "right-click" } else { "left-click" };
                write!(f, "player {player} {action} {stone} -> ")?;
                match outcome {
                    InteractOutcome::Ignored => write!(f, "ignored"),
                    InteractOutcome::Handled(result) => write!(f, "{result}"),
                }
            }
            TimelineEvent::CooldownChanged { stone, seconds } => {
                write!(f, "{stone} cooldown set to {seconds}s")
            }
            TimelineEvent::Quit { player } => write!(f, "player {player} quit"),
        }
    }
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Timeline:")?;
        for entry in &self.timeline {
            writeln!(f, "  {entry}")?;
        }

        writeln!(f, "\nMessages:")?;
        for message in &self.messages {
            writeln!(f, "  -> {}: {}", message.player, message.text)?;
        }

        writeln!(f, "\nEntities:")?;
        for e in &self.entities {
            writeln!(
                f,
                "  {:>4} {:<12} {:<6} {:>5.1}/{:<5.1} HP at ({:.2}, {:.2}, {:.2})",
                e.id,
                e.name,
                match e.kind {
                    LivingKind::Player => "player",
                    LivingKind::Mob => "mob",
                },
                e.health,
                e.max_health,
                e.position.x,
                e.position.y,
                e.position.z
            )?;
        }

        writeln!(f, "\nExplosions: {}", self.explosions.len())?;
        writeln!(f, "Lightning strikes: {}", self.lightning_strikes)?;
        let particles: u64 = self.particles.iter().map(|p| p.count).sum();
        writeln!(f, "Particles spawned: {particles}")?;
        writeln!(f, "Active cooldowns: {}", self.active_cooldowns)?;
        write!(f, "Finished at tick {}", self.final_tick)
    }
}
