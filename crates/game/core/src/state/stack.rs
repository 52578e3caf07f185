//! Item stacks and the stacking math that moves units between them.
//!
//! A stack is a quantity of identical items with one durability value per
//! unit. The unit count is the length of that durability list, so the two can
//! never disagree. The tail of the list is the most recently added unit and
//! also the active one: fills, splits, removals and wear all work on the tail.

use std::sync::Arc;

use crate::env::{ItemDefinition, ItemHandle};

use super::StackError;

/// Result of filling one stack from another.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FillResult {
    /// Units moved out of the source.
    pub consumed: u32,
    /// Units left in the source. Zero means the source is now empty and should
    /// be destroyed by its owner.
    pub remainder: u32,
}

impl FillResult {
    pub fn is_complete(&self) -> bool {
        self.remainder == 0
    }
}

/// What a single point of wear did to a stack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DurabilityOutcome {
    /// The item does not wear.
    Unaffected,
    /// The active unit lost durability and survived.
    Worn { remaining: f32 },
    /// The active unit broke; the next unit is now active.
    UnitBroken { remaining_units: u32 },
    /// The last unit broke; the stack is empty.
    Depleted,
}

/// A quantity of one item definition held in the inventory.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemStack {
    definition: Arc<ItemDefinition>,
    durability: Vec<f32>,
    weight: f32,
    equipped: bool,
}

impl ItemStack {
    /// Builds a stack from per-unit durability values (one entry per unit).
    pub fn new(definition: Arc<ItemDefinition>, durability: Vec<f32>) -> Result<Self, StackError> {
        let count = durability.len() as u32;
        if count == 0 || count > definition.max_stack {
            return Err(StackError::InvalidCount {
                item: definition.handle,
                count,
                max: definition.max_stack,
            });
        }
        let mut stack = Self {
            definition,
            durability,
            weight: 0.0,
            equipped: false,
        };
        stack.recompute_weight();
        Ok(stack)
    }

    /// Builds a stack of `count` fresh units.
    pub fn fresh(definition: Arc<ItemDefinition>, count: u32) -> Result<Self, StackError> {
        let durability = vec![definition.max_durability; count as usize];
        Self::new(definition, durability)
    }

    pub fn definition(&self) -> &Arc<ItemDefinition> {
        &self.definition
    }

    pub fn handle(&self) -> ItemHandle {
        self.definition.handle
    }

    pub fn count(&self) -> u32 {
        self.durability.len() as u32
    }

    pub fn max_stack(&self) -> u32 {
        self.definition.max_stack
    }

    /// Units that can still be added before the stack is full.
    pub fn room(&self) -> u32 {
        self.max_stack().saturating_sub(self.count())
    }

    pub fn is_full(&self) -> bool {
        self.room() == 0
    }

    pub fn is_empty(&self) -> bool {
        self.durability.is_empty()
    }

    /// Per-unit durability values, oldest first.
    pub fn durability(&self) -> &[f32] {
        &self.durability
    }

    /// Durability of the unit that wears next.
    pub fn active_durability(&self) -> Option<f32> {
        self.durability.last().copied()
    }

    /// Cached `count × unit_weight`.
    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn is_equipped(&self) -> bool {
        self.equipped
    }

    /// Sets the equipped flag. Returns false when the flag already had that value.
    pub(crate) fn set_equipped(&mut self, equipped: bool) -> bool {
        if self.equipped == equipped {
            return false;
        }
        self.equipped = equipped;
        true
    }

    /// Returns true if `other` holds the same item definition.
    pub fn can_merge(&self, other: &ItemStack) -> bool {
        self.handle() == other.handle()
    }

    /// Moves as many units as fit from the tail of `source` into `self`.
    ///
    /// Moved units keep their relative order, so the most recently added unit
    /// of the source becomes the most recent unit of the target.
    pub fn fill_from(&mut self, source: &mut ItemStack) -> Result<FillResult, StackError> {
        if !self.can_merge(source) {
            return Err(StackError::DefinitionMismatch {
                target_item: self.handle(),
                source_item: source.handle(),
            });
        }

        let moved = self.room().min(source.count());
        let units = source.take_units(moved);
        self.push_units(units);

        tracing::debug!(
            item = %self.handle(),
            moved,
            remainder = source.count(),
            "filled stack"
        );
        Ok(FillResult {
            consumed: moved,
            remainder: source.count(),
        })
    }

    /// Splits `max(1, floor(count × ratio))` units off the tail into a new
    /// stack, always leaving at least one unit behind.
    pub fn split(&mut self, ratio: f32) -> Result<ItemStack, StackError> {
        let count = self.count();
        if count <= 1 {
            return Err(StackError::TooSmallToSplit { count });
        }

        let moved = Self::split_quantity(count, ratio);
        let units = self.take_units(moved);
        let stack = Self {
            definition: Arc::clone(&self.definition),
            durability: units,
            weight: 0.0,
            equipped: false,
        }
        .with_weight();

        tracing::debug!(item = %self.handle(), moved, kept = self.count(), "split stack");
        Ok(stack)
    }

    /// Number of units a split of `count` moves at `ratio`.
    pub fn split_quantity(count: u32, ratio: f32) -> u32 {
        let ratio = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.5 };
        let wanted = (count as f32 * ratio).floor() as u32;
        wanted.max(1).min(count.saturating_sub(1))
    }

    /// Wears the active unit by `amount`.
    ///
    /// A unit at or below zero breaks and is removed; the previous unit in the
    /// list becomes active.
    pub fn consume_durability(&mut self, amount: f32) -> DurabilityOutcome {
        if !self.definition.wears() {
            return DurabilityOutcome::Unaffected;
        }
        let Some(active) = self.durability.last_mut() else {
            return DurabilityOutcome::Depleted;
        };

        *active -= amount;
        if *active > 0.0 {
            return DurabilityOutcome::Worn { remaining: *active };
        }

        self.durability.pop();
        self.recompute_weight();
        if self.durability.is_empty() {
            DurabilityOutcome::Depleted
        } else {
            DurabilityOutcome::UnitBroken {
                remaining_units: self.count(),
            }
        }
    }

    /// Removes up to `amount` units from the tail, returning their durability.
    pub(crate) fn take_units(&mut self, amount: u32) -> Vec<f32> {
        let keep = self.durability.len().saturating_sub(amount as usize);
        let units = self.durability.split_off(keep);
        self.recompute_weight();
        units
    }

    /// Appends units to the tail. Callers guarantee the result fits.
    pub(crate) fn push_units(&mut self, units: Vec<f32>) {
        debug_assert!(self.durability.len() + units.len() <= self.max_stack() as usize);
        self.durability.extend(units);
        self.recompute_weight();
    }

    /// Checks the stack invariants: count within `1..=max_stack` and the cached
    /// weight within `tolerance` of `count × unit_weight`.
    pub fn is_consistent(&self, tolerance: f32) -> bool {
        let count = self.count();
        let expected = count as f32 * self.definition.unit_weight;
        count <= self.max_stack() && (self.weight - expected).abs() <= tolerance
    }

    fn with_weight(mut self) -> Self {
        self.recompute_weight();
        self
    }

    fn recompute_weight(&mut self) {
        self.weight = self.count() as f32 * self.definition.unit_weight;
    }
}
