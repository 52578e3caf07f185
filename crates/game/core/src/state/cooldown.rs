use std::collections::BTreeMap;

use crate::env::ItemHandle;

use super::Tick;

/// Per-definition use cooldowns.
///
/// Cooldowns are keyed by item definition, so every stack of a potion shares
/// one timer.
#[derive(Clone, Debug, Default)]
pub struct CooldownTracker {
    ready_at: BTreeMap<ItemHandle, Tick>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tick at which `handle` can be used again, if it is still cooling down.
    pub fn ready_at(&self, handle: ItemHandle, now: Tick) -> Option<Tick> {
        self.ready_at
            .get(&handle)
            .copied()
            .filter(|ready_at| *ready_at > now)
    }

    pub fn is_ready(&self, handle: ItemHandle, now: Tick) -> bool {
        self.ready_at(handle, now).is_none()
    }

    /// Starts a cooldown of `ticks` from `now`. Zero-length cooldowns are not
    /// tracked.
    pub fn start(&mut self, handle: ItemHandle, now: Tick, ticks: u64) {
        if ticks == 0 {
            return;
        }
        self.ready_at.insert(handle, now + ticks);
    }

    /// Forgets cooldowns that have expired at `now`.
    pub fn prune(&mut self, now: Tick) {
        self.ready_at.retain(|_, ready_at| *ready_at > now);
    }

    pub fn active(&self) -> usize {
        self.ready_at.len()
    }
}
