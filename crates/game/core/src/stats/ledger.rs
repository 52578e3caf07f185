//! Reference [`StatSink`] that keeps one bonus stack per stat.

use std::collections::BTreeMap;

use crate::env::StatSink;

use super::bonus::{BonusStack, StatBounds};
use super::{StatKind, StatModifier};

/// In-memory character sheet fed by equipment and set tiers.
///
/// Hosts that keep their own stat model implement [`StatSink`] directly; the
/// ledger is what the CLI and the tests use.
#[derive(Clone, Debug, Default)]
pub struct StatLedger {
    stacks: BTreeMap<StatKind, BonusStack>,
}

impl StatLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Final value of `stat` for the given base, clamped to the stat's bounds.
    pub fn value(&self, stat: StatKind, base: i32) -> i32 {
        let bounds = Self::bounds(stat);
        match self.stacks.get(&stat) {
            Some(stack) => stack.apply(base, bounds.min, bounds.max),
            None => base.clamp(bounds.min, bounds.max),
        }
    }

    /// Number of live modifiers on `stat`.
    pub fn modifier_count(&self, stat: StatKind) -> usize {
        self.stacks.get(&stat).map_or(0, BonusStack::len)
    }

    /// Returns true when nothing is currently applied.
    pub fn is_empty(&self) -> bool {
        self.stacks.values().all(BonusStack::is_empty)
    }

    fn bounds(stat: StatKind) -> StatBounds {
        match stat {
            StatKind::MaxHealth | StatKind::MaxMana | StatKind::MaxStamina => StatBounds::RESOURCE,
            StatKind::CritChance => StatBounds::PERCENT,
            StatKind::MoveSpeed => StatBounds::UNCLAMPED,
            _ => StatBounds::RATING,
        }
    }
}

impl StatSink for StatLedger {
    fn apply(&mut self, modifier: &StatModifier) {
        self.stacks
            .entry(modifier.stat)
            .or_default()
            .add(modifier.bonus);
    }

    fn remove(&mut self, modifier: &StatModifier) {
        let removed = self
            .stacks
            .get_mut(&modifier.stat)
            .is_some_and(|stack| stack.remove(&modifier.bonus));
        if !removed {
            tracing::warn!(
                stat = %modifier.stat,
                bonus = ?modifier.bonus,
                "removing a stat modifier that was never applied"
            );
        }
    }
}
