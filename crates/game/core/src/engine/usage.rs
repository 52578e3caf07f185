//! Using items from a slot: consumables and wear on equipped gear.

use std::sync::Arc;

use crate::env::{ItemHandle, Services};
use crate::state::{DurabilityOutcome, SlotId, StateError, Tick};

use super::{InventoryEngine, InventoryError};

/// Result of using the item in a slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UseOutcome {
    /// One unit of a consumable was used up.
    Consumed { item: ItemHandle, remaining: u32 },
    /// The item's cooldown has not expired.
    OnCooldown { ready_at: Tick },
    /// Equipped gear lost durability.
    Worn { remaining: f32 },
    /// The active unit of equipped gear broke; another unit took its place.
    UnitBroken { remaining_units: u32 },
    /// The last unit broke; the stack was unequipped and destroyed.
    Broken { item: ItemHandle },
    /// Nothing happens when this item is used from this slot.
    NotUsable,
}

impl InventoryEngine {
    /// Uses the item in `slot` at tick `now`.
    ///
    /// Consumables in storage use up their most recent unit and start the
    /// item's cooldown. Durable gear in an equipment slot wears by the
    /// configured amount per use; gear that breaks completely is unequipped
    /// before it is destroyed.
    ///
    /// # Errors
    ///
    /// Fails for stale or empty slots.
    pub fn use_item(
        &mut self,
        slot: SlotId,
        now: Tick,
        services: &mut Services<'_>,
    ) -> Result<UseOutcome, InventoryError> {
        let stack_id = self.inventory.occupant(slot)?;
        let in_equipment = self.inventory.slot(slot)?.is_equipment();
        let Some(definition) = self
            .inventory
            .stack(stack_id)
            .map(|stack| Arc::clone(stack.definition()))
        else {
            return Err(StateError::DanglingStack(slot).into());
        };

        self.cooldowns.prune(now);
        let consumable = definition.category.is_consumable() && !in_equipment;
        let wearable = in_equipment && definition.wears();
        if !consumable && !wearable {
            return Ok(UseOutcome::NotUsable);
        }
        if let Some(ready_at) = self.cooldowns.ready_at(definition.handle, now) {
            return Ok(UseOutcome::OnCooldown { ready_at });
        }
        self.cooldowns.start(definition.handle, now, definition.cooldown);

        if consumable {
            let remaining = match self.inventory.stack_mut(stack_id) {
                Some(stack) => {
                    stack.take_units(1);
                    stack.count()
                }
                None => 0,
            };
            if remaining == 0 {
                self.inventory.clear_slot(slot)?;
            }
            tracing::debug!(item = %definition.handle, remaining, "consumed item");
            return Ok(UseOutcome::Consumed {
                item: definition.handle,
                remaining,
            });
        }

        let wear = self.config.durability_per_use;
        let outcome = match self.inventory.stack_mut(stack_id) {
            Some(stack) => stack.consume_durability(wear),
            None => DurabilityOutcome::Unaffected,
        };
        Ok(match outcome {
            DurabilityOutcome::Unaffected => UseOutcome::NotUsable,
            DurabilityOutcome::Worn { remaining } => UseOutcome::Worn { remaining },
            DurabilityOutcome::UnitBroken { remaining_units } => {
                tracing::info!(item = %definition.handle, remaining_units, "equipped unit broke");
                UseOutcome::UnitBroken { remaining_units }
            }
            DurabilityOutcome::Depleted => {
                if let Some(stack) = self.inventory.stack_mut(stack_id) {
                    self.equipment
                        .unequip(stack, &mut *services.stats, &mut *services.traits);
                }
                self.inventory.clear_slot(slot)?;
                tracing::info!(item = %definition.handle, name = %definition.name, "equipment broke");
                UseOutcome::Broken {
                    item: definition.handle,
                }
            }
        })
    }
}
