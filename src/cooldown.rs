//! Per-player, per-stone cooldown expiry table
//!
//! An entry maps `(player, stone)` to the instant its cooldown ends. Presence
//! with `expiry > now` is the only notion of "on cooldown"; expired entries are
//! logically absent and are removed lazily by [`CooldownTable::is_on_cooldown`].
//!
//! Nothing here can fail: absence reads as `false` / zero.

use crate::core::{PlayerId, StoneType};
use rustc_hash::FxHashMap;
use std::time::{Duration, Instant};

/// Upper bound applied when `now + duration` would overflow `Instant`
const MAX_COOLDOWN: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

#[derive(Debug, Clone, Default)]
pub struct CooldownTable {
    entries: FxHashMap<PlayerId, FxHashMap<StoneType, Instant>>,
}

impl CooldownTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff `player` has an unexpired cooldown for `stone`
    ///
    /// An expired entry is removed before returning `false`, and so is the
    /// player's row once it becomes empty.
    pub fn is_on_cooldown(&mut self, player: PlayerId, stone: StoneType, now: Instant) -> bool {
        let Some(row) = self.entries.get_mut(&player) else {
            return false;
        };
        let Some(&expiry) = row.get(&stone) else {
            return false;
        };

        if expiry > now {
            return true;
        }

        row.remove(&stone);
        if row.is_empty() {
            self.entries.remove(&player);
        }
        false
    }

    /// Time left until `player` may use `stone` again, zero if none
    ///
    /// Read-only: never removes stale entries, so it is safe to call from
    /// display code.
    pub fn remaining_cooldown(&self, player: PlayerId, stone: StoneType, now: Instant) -> Duration {
        self.expiry(player, stone)
            .map(|expiry| expiry.saturating_duration_since(now))
            .unwrap_or(Duration::ZERO)
    }

    /// Overwrite the expiry for `(player, stone)` with `now + duration`
    ///
    /// A zero duration stores an entry that is already expired at `now`.
    pub fn set_cooldown(&mut self, player: PlayerId, stone: StoneType, duration: Duration, now: Instant) {
        let expiry = now
            .checked_add(duration)
            .or_else(|| now.checked_add(MAX_COOLDOWN))
            .unwrap_or(now);
        self.entries.entry(player).or_default().insert(stone, expiry);
    }

    /// Stored expiry, expired or not
    pub fn expiry(&self, player: PlayerId, stone: StoneType) -> Option<Instant> {
        self.entries.get(&player).and_then(|row| row.get(&stone)).copied()
    }

    /// Drop every entry for a player (session end). Returns whether any existed.
    pub fn forget_player(&mut self, player: PlayerId) -> bool {
        self.entries.remove(&player).is_some()
    }

    /// Remove all entries with `expiry <= now`, returning how many went
    pub fn sweep_expired(&mut self, now: Instant) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, row| {
            let before = row.len();
            row.retain(|_, expiry| *expiry > now);
            removed += before - row.len();
            !row.is_empty()
        });
        removed
    }

    /// Number of stored entries, including expired ones not yet swept
    pub fn len(&self) -> usize {
        self.entries.values().map(FxHashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
