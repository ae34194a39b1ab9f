//! Cooldown-gated ability activation
//!
//! [`ActivationCoordinator::attempt_activate`] is the single entry point that
//! decides whether an ability runs:
//!
//! 1. an unexpired cooldown short-circuits with the time left,
//! 2. an ability without a handler is reported, never charged,
//! 3. a handler that declines leaves everything as it was,
//! 4. a handler that succeeds starts a cooldown of exactly its declared
//!    length, read at that moment.

use crate::abilities::AbilityCatalog;
use crate::cooldown::CooldownTable;
use crate::core::{PlayerId, StoneType};
use crate::host::AbilityHost;
use serde::Serialize;
use std::fmt;
use std::time::{Duration, Instant};

/// Outcome of one activation attempt
///
/// None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum ActivationResult {
    OnCooldown {
        #[serde(with = "millis")]
        remaining: Duration,
    },
    HandlerMissing,
    HandlerDeclinedOrNoEffect,
    Activated,
}

impl ActivationResult {
    pub fn is_activated(&self) -> bool {
        matches!(self, ActivationResult::Activated)
    }
}

impl fmt::Display for ActivationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivationResult::OnCooldown { remaining } => {
                write!(f, "on cooldown ({:.1}s left)", remaining.as_secs_f64())
            }
            ActivationResult::HandlerMissing => write!(f, "no handler"),
            ActivationResult::HandlerDeclinedOrNoEffect => write!(f, "declined"),
            ActivationResult::Activated => write!(f, "activated"),
        }
    }
}

/// Whole milliseconds, saturating at `u64::MAX`
fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

mod millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(super::saturating_millis(*duration))
    }
}

/// Cooldown table plus handler catalog
#[derive(Debug, Default)]
pub struct ActivationCoordinator {
    cooldowns: CooldownTable,
    catalog: AbilityCatalog,
}

impl ActivationCoordinator {
    pub fn new(catalog: AbilityCatalog) -> Self {
        ActivationCoordinator {
            cooldowns: CooldownTable::new(),
            catalog,
        }
    }

    pub fn attempt_activate(
        &mut self,
        host: &mut dyn AbilityHost,
        player: PlayerId,
        stone: StoneType,
        now: Instant,
    ) -> ActivationResult {
        if self.cooldowns.is_on_cooldown(player, stone, now) {
            let remaining = self.cooldowns.remaining_cooldown(player, stone, now);
            tracing::debug!(%player, %stone, remaining_ms = saturating_millis(remaining), "on cooldown");
            return ActivationResult::OnCooldown { remaining };
        }

        let Some(handler) = self.catalog.handler_for(stone) else {
            return ActivationResult::HandlerMissing;
        };

        if !handler.try_activate(host, player) {
            tracing::debug!(%player, %stone, "handler declined");
            return ActivationResult::HandlerDeclinedOrNoEffect;
        }

        let cooldown = handler.declared_cooldown();
        self.cooldowns.set_cooldown(player, stone, cooldown, now);
        tracing::debug!(
            %player,
            %stone,
            ability = %handler.name(),
            cooldown_secs = cooldown.as_secs_f64(),
            "activated"
        );
        ActivationResult::Activated
    }

    pub fn cooldowns(&self) -> &CooldownTable {
        &self.cooldowns
    }

    pub fn catalog(&self) -> &AbilityCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut AbilityCatalog {
        &mut self.catalog
    }

    pub fn remaining_cooldown(&self, player: PlayerId, stone: StoneType, now: Instant) -> Duration {
        self.cooldowns.remaining_cooldown(player, stone, now)
    }

    /// Drop every cooldown for a player who left
    pub fn forget_player(&mut self, player: PlayerId) -> bool {
        self.cooldowns.forget_player(player)
    }

    /// Remove expired cooldowns, returning how many were dropped
    pub fn sweep(&mut self, now: Instant) -> usize {
        self.cooldowns.sweep_expired(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::AbilityHandler;
    use crate::core::{AbilityName, EntityId, Vec3};
    use crate::sim::SimulatedWorld;
    use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
    use std::sync::Arc;

    /// Handler with a scripted answer that counts its invocations
    struct Scripted {
        stone: StoneType,
        cooldown_ms: Arc<AtomicU64>,
        succeed: Arc<AtomicBool>,
        calls: Arc<AtomicU32>,
    }

    struct Controls {
        cooldown_ms: Arc<AtomicU64>,
        succeed: Arc<AtomicBool>,
        calls: Arc<AtomicU32>,
    }

    impl Controls {
        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    fn scripted(stone: StoneType, cooldown: Duration, succeed: bool) -> (Box<Scripted>, Controls) {
        let cooldown_ms = Arc::new(AtomicU64::new(cooldown.as_millis() as u64));
        let succeed = Arc::new(AtomicBool::new(succeed));
        let calls = Arc::new(AtomicU32::new(0));
        let handler = Scripted {
            stone,
            cooldown_ms: cooldown_ms.clone(),
            succeed: succeed.clone(),
            calls: calls.clone(),
        };
        (
            Box::new(handler),
            Controls {
                cooldown_ms,
                succeed,
                calls,
            },
        )
    }

    impl AbilityHandler for Scripted {
        fn stone_type(&self) -> StoneType {
            self.stone
        }

        fn name(&self) -> AbilityName {
            AbilityName::new("Scripted")
        }

        fn declared_cooldown(&self) -> Duration {
            Duration::from_millis(self.cooldown_ms.load(Ordering::SeqCst))
        }

        fn try_activate(&self, _host: &mut dyn AbilityHost, _player: PlayerId) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.succeed.load(Ordering::SeqCst)
        }
    }

    fn coordinator_with(handler: Box<Scripted>) -> ActivationCoordinator {
        let mut catalog = AbilityCatalog::new();
        catalog.register(handler);
        ActivationCoordinator::new(catalog)
    }

    fn world() -> SimulatedWorld {
        let mut world = SimulatedWorld::new();
        world.spawn_player(EntityId::new(1), "P1", Vec3::ZERO);
        world.spawn_player(EntityId::new(2), "P2", Vec3::ZERO);
        world
    }

    #[test]
    fn test_fire_cooldown_cycle() {
        let p1 = EntityId::new(1);
        let (handler, controls) = scripted(StoneType::Fire, Duration::from_secs(10), true);
        let mut coordinator = coordinator_with(handler);
        let mut world = world();
        let t0 = Instant::now();

        assert_eq!(
            coordinator.attempt_activate(&mut world, p1, StoneType::Fire, t0),
            ActivationResult::Activated
        );
        assert_eq!(
            coordinator.cooldowns().expiry(p1, StoneType::Fire),
            Some(t0 + Duration::from_secs(10))
        );

        assert_eq!(
            coordinator.attempt_activate(&mut world, p1, StoneType::Fire, t0 + Duration::from_secs(5)),
            ActivationResult::OnCooldown {
                remaining: Duration::from_secs(5)
            }
        );
        assert_eq!(controls.calls(), 1);

        assert_eq!(
            coordinator.attempt_activate(&mut world, p1, StoneType::Fire, t0 + Duration::from_secs(10)),
            ActivationResult::Activated
        );
        assert_eq!(controls.calls(), 2);
    }

    #[test]
    fn test_decline_charges_nothing_and_allows_immediate_retry() {
        let p2 = EntityId::new(2);
        let (handler, controls) = scripted(StoneType::Lightning, Duration::from_secs(12), false);
        let mut coordinator = coordinator_with(handler);
        let mut world = world();
        let t0 = Instant::now();

        assert_eq!(
            coordinator.attempt_activate(&mut world, p2, StoneType::Lightning, t0),
            ActivationResult::HandlerDeclinedOrNoEffect
        );
        assert!(coordinator.cooldowns().is_empty());

        assert_eq!(
            coordinator.attempt_activate(
                &mut world,
                p2,
                StoneType::Lightning,
                t0 + Duration::from_millis(1)
            ),
            ActivationResult::HandlerDeclinedOrNoEffect
        );
        assert_eq!(controls.calls(), 2);

        controls.succeed.store(true, Ordering::SeqCst);
        let t2 = t0 + Duration::from_millis(2);
        assert!(coordinator
            .attempt_activate(&mut world, p2, StoneType::Lightning, t2)
            .is_activated());
        assert_eq!(
            coordinator.cooldowns().expiry(p2, StoneType::Lightning),
            Some(t2 + Duration::from_secs(12))
        );
    }

    #[test]
    fn test_declined_attempt_keeps_prior_entries() {
        let p1 = EntityId::new(1);
        let (fire, _) = scripted(StoneType::Fire, Duration::from_secs(10), true);
        let (air, _) = scripted(StoneType::Air, Duration::from_secs(8), false);
        let mut coordinator = coordinator_with(fire);
        coordinator.catalog_mut().register(air);
        let mut world = world();
        let t0 = Instant::now();

        coordinator.attempt_activate(&mut world, p1, StoneType::Fire, t0);
        let before = coordinator.cooldowns().expiry(p1, StoneType::Fire);

        assert_eq!(
            coordinator.attempt_activate(&mut world, p1, StoneType::Air, t0),
            ActivationResult::HandlerDeclinedOrNoEffect
        );
        assert_eq!(coordinator.cooldowns().expiry(p1, StoneType::Fire), before);
        assert_eq!(coordinator.cooldowns().expiry(p1, StoneType::Air), None);
        assert_eq!(coordinator.cooldowns().len(), 1);
    }

    #[test]
    fn test_missing_handler_is_idempotent() {
        let p1 = EntityId::new(1);
        let mut coordinator = ActivationCoordinator::new(AbilityCatalog::new());
        let mut world = world();
        let t0 = Instant::now();

        for _ in 0..3 {
            assert_eq!(
                coordinator.attempt_activate(&mut world, p1, StoneType::Darkness, t0),
                ActivationResult::HandlerMissing
            );
        }
        assert!(coordinator.cooldowns().is_empty());
    }

    #[test]
    fn test_cooldown_is_checked_before_handler_lookup() {
        let p1 = EntityId::new(1);
        let (handler, controls) = scripted(StoneType::Water, Duration::from_secs(12), true);
        let mut coordinator = coordinator_with(handler);
        let mut world = world();
        let t0 = Instant::now();

        coordinator.attempt_activate(&mut world, p1, StoneType::Water, t0);
        coordinator.catalog_mut().unregister(StoneType::Water);

        let result = coordinator.attempt_activate(&mut world, p1, StoneType::Water, t0 + Duration::from_secs(1));
        assert_eq!(
            result,
            ActivationResult::OnCooldown {
                remaining: Duration::from_secs(11)
            }
        );
        assert_eq!(controls.calls(), 1);
    }

    #[test]
    fn test_cooldowns_are_per_player() {
        let (handler, _) = scripted(StoneType::Fire, Duration::from_secs(10), true);
        let mut coordinator = coordinator_with(handler);
        let mut world = world();
        let t0 = Instant::now();

        assert!(coordinator
            .attempt_activate(&mut world, EntityId::new(1), StoneType::Fire, t0)
            .is_activated());
        assert!(coordinator
            .attempt_activate(&mut world, EntityId::new(2), StoneType::Fire, t0)
            .is_activated());
    }

    #[test]
    fn test_declared_cooldown_is_read_at_activation() {
        let p1 = EntityId::new(1);
        let (handler, controls) = scripted(StoneType::Earth, Duration::from_secs(15), true);
        let mut coordinator = coordinator_with(handler);
        let mut world = world();
        let t0 = Instant::now();

        coordinator.attempt_activate(&mut world, p1, StoneType::Earth, t0);
        controls.cooldown_ms.store(3_000, Ordering::SeqCst);

        // The running cooldown keeps its original expiry
        assert_eq!(
            coordinator.cooldowns().expiry(p1, StoneType::Earth),
            Some(t0 + Duration::from_secs(15))
        );

        let t1 = t0 + Duration::from_secs(15);
        assert!(coordinator
            .attempt_activate(&mut world, p1, StoneType::Earth, t1)
            .is_activated());
        assert_eq!(
            coordinator.cooldowns().expiry(p1, StoneType::Earth),
            Some(t1 + Duration::from_secs(3))
        );
    }

    #[test]
    fn test_zero_cooldown_never_blocks() {
        let p1 = EntityId::new(1);
        let (handler, controls) = scripted(StoneType::Air, Duration::ZERO, true);
        let mut coordinator = coordinator_with(handler);
        let mut world = world();
        let t0 = Instant::now();

        for _ in 0..3 {
            assert!(coordinator
                .attempt_activate(&mut world, p1, StoneType::Air, t0)
                .is_activated());
        }
        assert_eq!(controls.calls(), 3);
    }

    #[test]
    fn test_result_serializes_remaining_as_millis() {
        let json = serde_json::to_string(&ActivationResult::OnCooldown {
            remaining: Duration::from_millis(4500),
        })
        .unwrap();
        assert_eq!(json, r#"{"outcome":"on_cooldown","remaining":4500}"#);
    }

    #[test]
    fn test_millis_saturate_on_huge_durations() {
        assert_eq!(saturating_millis(Duration::from_millis(4500)), 4500);
        assert_eq!(saturating_millis(Duration::MAX), u64::MAX);

        let json = serde_json::to_value(ActivationResult::OnCooldown {
            remaining: Duration::MAX,
        })
        .unwrap();
        assert_eq!(json["remaining"], u64::MAX);
    }
}
