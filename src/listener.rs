//! Player interaction handling
//!
//! Turns a raw interact event into an activation attempt: only a right click
//! holding an ability stone counts, and such an event is always cancelled so
//! the host does not also place or use the item.

use crate::activation::{ActivationCoordinator, ActivationResult};
use crate::core::{ChatMessage, ItemStack, PlayerId, TextColor};
use crate::host::AbilityHost;
use crate::stones::StoneManager;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractAction {
    RightClickAir,
    RightClickBlock,
    LeftClickAir,
    LeftClickBlock,
    /// Stepping on a pressure plate and similar
    Physical,
}

impl InteractAction {
    pub fn is_right_click(&self) -> bool {
        matches!(self, InteractAction::RightClickAir | InteractAction::RightClickBlock)
    }
}

#[derive(Debug, Clone)]
pub struct InteractEvent {
    pub player: PlayerId,
    pub action: InteractAction,
    pub item: Option<ItemStack>,
    cancelled: bool,
}

impl InteractEvent {
    pub fn new(player: PlayerId, action: InteractAction, item: Option<ItemStack>) -> Self {
        InteractEvent {
            player,
            action,
            item,
            cancelled: false,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "result")]
pub enum InteractOutcome {
    /// Not a stone activation; the event was left alone
    Ignored,
    Handled(ActivationResult),
}

/// Chat line shown when a stone is still cooling down
pub fn cooldown_message(remaining: Duration) -> ChatMessage {
    ChatMessage::new(
        TextColor::Red,
        format!("Ability on cooldown! {:.1}s remaining", remaining.as_secs_f64()),
    )
}

pub fn on_player_interact(
    coordinator: &mut ActivationCoordinator,
    stones: &StoneManager,
    host: &mut dyn AbilityHost,
    event: &mut InteractEvent,
    now: Instant,
) -> InteractOutcome {
    if !event.action.is_right_click() {
        return InteractOutcome::Ignored;
    }
    let Some(stone) = event.item.as_ref().and_then(|item| stones.stone_type_of(item)) else {
        return InteractOutcome::Ignored;
    };

    event.set_cancelled(true);
    let result = coordinator.attempt_activate(host, event.player, stone, now);
    match result {
        ActivationResult::OnCooldown { remaining } => {
            host.send_message(event.player, cooldown_message(remaining));
        }
        ActivationResult::HandlerMissing => {
            tracing::warn!(player = %event.player, %stone, "no ability registered for stone");
        }
        ActivationResult::HandlerDeclinedOrNoEffect | ActivationResult::Activated => {}
    }
    InteractOutcome::Handled(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::AbilityCatalog;
    use crate::core::{EntityId, Material, StoneType, Vec3};
    use crate::loader::{ConfigHandle, StonesConfig};
    use crate::sim::SimulatedWorld;

    struct Fixture {
        coordinator: ActivationCoordinator,
        stones: StoneManager,
        world: SimulatedWorld,
    }

    fn fixture() -> Fixture {
        let config = ConfigHandle::new(StonesConfig::default());
        let mut world = SimulatedWorld::new();
        world.spawn_player(EntityId::new(1), "Alice", Vec3::new(0.0, 64.0, 0.0));
        Fixture {
            coordinator: ActivationCoordinator::new(AbilityCatalog::with_default_abilities(&config)),
            stones: StoneManager::new(config),
            world,
        }
    }

    #[test]
    fn test_left_click_is_ignored() {
        let mut f = fixture();
        let item = f.stones.create_stone(StoneType::Air);
        let mut event = InteractEvent::new(EntityId::new(1), InteractAction::LeftClickAir, Some(item));

        let outcome = on_player_interact(&mut f.coordinator, &f.stones, &mut f.world, &mut event, Instant::now());
        assert_eq!(outcome, InteractOutcome::Ignored);
        assert!(!event.is_cancelled());
    }

    #[test]
    fn test_non_stone_items_are_ignored() {
        let mut f = fixture();
        let now = Instant::now();
        for item in [None, Some(ItemStack::new(Material::emerald()))] {
            let mut event = InteractEvent::new(EntityId::new(1), InteractAction::RightClickBlock, item);
            let outcome = on_player_interact(&mut f.coordinator, &f.stones, &mut f.world, &mut event, now);
            assert_eq!(outcome, InteractOutcome::Ignored);
            assert!(!event.is_cancelled());
        }
    }

    #[test]
    fn test_second_click_reports_cooldown() {
        let mut f = fixture();
        let alice = EntityId::new(1);
        let t0 = Instant::now();

        let item = f.stones.create_stone(StoneType::Air);
        let mut event = InteractEvent::new(alice, InteractAction::RightClickAir, Some(item.clone()));
        let outcome = on_player_interact(&mut f.coordinator, &f.stones, &mut f.world, &mut event, t0);
        assert_eq!(outcome, InteractOutcome::Handled(ActivationResult::Activated));
        assert!(event.is_cancelled());

        let mut event = InteractEvent::new(alice, InteractAction::RightClickAir, Some(item));
        let later = t0 + Duration::from_millis(2_700);
        on_player_interact(&mut f.coordinator, &f.stones, &mut f.world, &mut event, later);
        let message = f.world.last_message(alice).unwrap();
        assert_eq!(message.text, "Ability on cooldown! 5.3s remaining");
        assert_eq!(message.color, TextColor::Red);
    }

    #[test]
    fn test_missing_handler_sends_nothing() {
        let mut f = fixture();
        f.coordinator.catalog_mut().unregister(StoneType::Fire);
        let item = f.stones.create_stone(StoneType::Fire);
        let mut event = InteractEvent::new(EntityId::new(1), InteractAction::RightClickAir, Some(item));

        let outcome = on_player_interact(&mut f.coordinator, &f.stones, &mut f.world, &mut event, Instant::now());
        assert_eq!(outcome, InteractOutcome::Handled(ActivationResult::HandlerMissing));
        assert!(event.is_cancelled());
        assert!(f.world.messages().is_empty());
    }

    #[test]
    fn test_cooldown_message_rounds_to_one_decimal() {
        assert_eq!(
            cooldown_message(Duration::from_millis(9_960)).text,
            "Ability on cooldown! 10.0s remaining"
        );
        assert_eq!(
            cooldown_message(Duration::from_millis(60)).text,
            "Ability on cooldown! 0.1s remaining"
        );
    }
}
