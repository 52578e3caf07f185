//! Two-phase drag transfers.
//!
//! A press on an occupied slot detaches its stack and reserves the slot; the
//! release resolves to exactly one of place, swap, fill, drop or return. Every
//! check that can fail runs before the first mutation, so a failed release
//! always degrades to returning the stack to its origin.
//!
//! A stack dragged out of an equipment slot stays equipped while carried. Its
//! equip state only changes once it settles: equipped in an equipment slot,
//! unequipped anywhere else.
mod error;

pub use error::TransferError;

use crate::env::{ItemHandle, Services};
use crate::equipment::EquipmentResolver;
use crate::state::{InventoryState, SlotFilter, SlotId, StackId};

/// Where a drag was released.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReleaseTarget {
    /// Over an inventory slot.
    Slot(SlotId),
    /// Over the designated drop area outside the inventory.
    DropZone,
    /// Over nothing that accepts items.
    Nowhere,
}

/// How a release was resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferOutcome {
    /// The carried stack now occupies a previously empty slot.
    Placed { slot: SlotId },
    /// The carried stack and the occupant of `slot` traded places.
    Swapped { slot: SlotId, origin: SlotId },
    /// Units merged into the stack in `slot`; `remainder` units went back to
    /// the origin.
    Filled {
        slot: SlotId,
        moved: u32,
        remainder: u32,
    },
    /// The carried stack left the inventory through the spawner.
    Dropped { item: ItemHandle, quantity: u32 },
    /// The carried stack went back to its origin unchanged.
    Returned { slot: SlotId },
}

/// Drag state machine: `Idle → Dragging → Idle`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransferState {
    #[default]
    Idle,
    Dragging { origin: SlotId, carried: StackId },
}

impl TransferState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, TransferState::Dragging { .. })
    }

    pub fn carried(&self) -> Option<StackId> {
        match self {
            TransferState::Dragging { carried, .. } => Some(*carried),
            TransferState::Idle => None,
        }
    }

    pub fn origin(&self) -> Option<SlotId> {
        match self {
            TransferState::Dragging { origin, .. } => Some(*origin),
            TransferState::Idle => None,
        }
    }

    /// Press: picks up the stack in `origin`.
    ///
    /// # Errors
    ///
    /// Fails without mutation when a drag is already active or the slot is
    /// stale or empty.
    pub fn begin(
        &mut self,
        inventory: &mut InventoryState,
        origin: SlotId,
    ) -> Result<StackId, TransferError> {
        if let TransferState::Dragging { origin, .. } = *self {
            return Err(TransferError::AlreadyDragging { origin });
        }
        let carried = inventory.detach(origin)?;
        inventory.reserve(Some(origin));
        *self = TransferState::Dragging { origin, carried };
        tracing::debug!(slot = %origin, stack = %carried, "picked up stack");
        Ok(carried)
    }

    /// Release: resolves the gesture and returns to idle.
    ///
    /// # Errors
    ///
    /// Returns `TransferError::NotDragging` when no drag is active. Invalid or
    /// incompatible targets are not errors; they resolve to
    /// [`TransferOutcome::Returned`].
    pub fn release(
        &mut self,
        inventory: &mut InventoryState,
        equipment: &mut EquipmentResolver,
        target: ReleaseTarget,
        services: &mut Services<'_>,
    ) -> Result<TransferOutcome, TransferError> {
        let TransferState::Dragging { origin, carried } = std::mem::take(self) else {
            return Err(TransferError::NotDragging);
        };
        inventory.reserve(None);

        let outcome = match target {
            ReleaseTarget::Slot(slot) => {
                Self::release_on_slot(inventory, equipment, origin, carried, slot, services)
            }
            ReleaseTarget::DropZone => Self::drop(inventory, equipment, carried, services),
            ReleaseTarget::Nowhere => None,
        };

        Ok(match outcome {
            Some(outcome) => outcome,
            None => Self::restore(inventory, equipment, origin, carried, services),
        })
    }

    /// Puts a carried stack back where it came from. Used for an explicit
    /// return and before operations that cannot run mid-drag.
    pub fn cancel(
        &mut self,
        inventory: &mut InventoryState,
        equipment: &mut EquipmentResolver,
        services: &mut Services<'_>,
    ) -> Option<TransferOutcome> {
        let TransferState::Dragging { origin, carried } = std::mem::take(self) else {
            return None;
        };
        inventory.reserve(None);
        Some(Self::restore(inventory, equipment, origin, carried, services))
    }

    /// Resolves a release over a slot. `None` means fall back to return.
    fn release_on_slot(
        inventory: &mut InventoryState,
        equipment: &mut EquipmentResolver,
        origin: SlotId,
        carried: StackId,
        slot: SlotId,
        services: &mut Services<'_>,
    ) -> Option<TransferOutcome> {
        if slot == origin {
            return None;
        }
        let target = match inventory.slot(slot) {
            Ok(target) => target,
            Err(error) => {
                tracing::warn!(%error, "release over a stale slot");
                return None;
            }
        };
        let (handle, category) = inventory
            .stack(carried)
            .map(|stack| (stack.handle(), stack.definition().category))?;
        if !EquipmentResolver::is_compatible(target.kind(), category) {
            tracing::debug!(slot = %slot, %category, "incompatible release target");
            return None;
        }

        let Some(occupant) = target.stack() else {
            inventory.attach(slot, carried).ok()?;
            Self::settle(inventory, equipment, &[(carried, slot)], services);
            return Some(TransferOutcome::Placed { slot });
        };

        let can_fill = inventory
            .stack(occupant)
            .is_some_and(|stack| stack.handle() == handle && !stack.is_full());
        if can_fill {
            return Self::fill(inventory, equipment, origin, carried, slot, occupant, services);
        }

        // Swap: the occupant must be able to sit in the origin slot.
        inventory.check_placement(origin, occupant).ok()?;
        inventory.replace(slot, carried).ok()?;
        if let Err(error) = inventory.attach(origin, occupant) {
            tracing::warn!(%error, "swap could not seat the occupant");
            Self::rehome(inventory, equipment, origin, occupant, services);
        }
        Self::settle(
            inventory,
            equipment,
            &[(carried, slot), (occupant, origin)],
            services,
        );
        Some(TransferOutcome::Swapped { slot, origin })
    }

    fn fill(
        inventory: &mut InventoryState,
        equipment: &mut EquipmentResolver,
        origin: SlotId,
        carried: StackId,
        slot: SlotId,
        occupant: StackId,
        services: &mut Services<'_>,
    ) -> Option<TransferOutcome> {
        let (into, from) = inventory.pair_mut(occupant, carried)?;
        let result = into.fill_from(from).ok()?;

        if result.is_complete() {
            if let Some(stack) = inventory.stack_mut(carried) {
                equipment.unequip(stack, &mut *services.stats, &mut *services.traits);
            }
            inventory.destroy(carried);
        } else if inventory.attach(origin, carried).is_err() {
            Self::rehome(inventory, equipment, origin, carried, services);
        }

        Some(TransferOutcome::Filled {
            slot,
            moved: result.consumed,
            remainder: result.remainder,
        })
    }

    fn drop(
        inventory: &mut InventoryState,
        equipment: &mut EquipmentResolver,
        carried: StackId,
        services: &mut Services<'_>,
    ) -> Option<TransferOutcome> {
        let stack = inventory.stack_mut(carried)?;
        equipment.unequip(stack, &mut *services.stats, &mut *services.traits);
        let stack = inventory.destroy(carried)?;

        let quantity = stack.count();
        services
            .spawner
            .drop_into_world(stack.definition(), quantity, stack.durability());
        tracing::info!(item = %stack.handle(), quantity, "dropped stack into the world");
        Some(TransferOutcome::Dropped {
            item: stack.handle(),
            quantity,
        })
    }

    fn restore(
        inventory: &mut InventoryState,
        equipment: &mut EquipmentResolver,
        origin: SlotId,
        carried: StackId,
        services: &mut Services<'_>,
    ) -> TransferOutcome {
        match inventory.attach(origin, carried) {
            Ok(()) => TransferOutcome::Returned { slot: origin },
            Err(error) => {
                tracing::warn!(%error, "origin slot unavailable on return");
                Self::rehome(inventory, equipment, origin, carried, services)
            }
        }
    }

    /// Last resort for a stack whose origin is gone: first empty storage slot,
    /// otherwise the world.
    fn rehome(
        inventory: &mut InventoryState,
        equipment: &mut EquipmentResolver,
        origin: SlotId,
        carried: StackId,
        services: &mut Services<'_>,
    ) -> TransferOutcome {
        let category = inventory
            .stack(carried)
            .map(|stack| stack.definition().category);
        let free = category
            .and_then(|category| inventory.find_empty_slot(SlotFilter::STORAGE.accepting(category)));
        if let Some(slot) = free {
            if inventory.attach(slot, carried).is_ok() {
                Self::settle(inventory, equipment, &[(carried, slot)], services);
                return TransferOutcome::Placed { slot };
            }
        }
        Self::drop(inventory, equipment, carried, services)
            .unwrap_or(TransferOutcome::Returned { slot: origin })
    }

    /// Brings each stack's equip state in line with the slot it now occupies.
    /// All unequips run before any equip.
    fn settle(
        inventory: &mut InventoryState,
        equipment: &mut EquipmentResolver,
        placements: &[(StackId, SlotId)],
        services: &mut Services<'_>,
    ) {
        let wanted: Vec<(StackId, bool)> = placements
            .iter()
            .map(|&(stack, slot)| {
                let in_equipment = inventory.slot(slot).is_ok_and(|slot| slot.is_equipment());
                (stack, in_equipment)
            })
            .collect();

        for &(stack, in_equipment) in &wanted {
            if !in_equipment {
                if let Some(stack) = inventory.stack_mut(stack) {
                    equipment.unequip(stack, &mut *services.stats, &mut *services.traits);
                }
            }
        }
        for &(stack, in_equipment) in &wanted {
            if in_equipment {
                if let Some(stack) = inventory.stack_mut(stack) {
                    equipment.equip(stack, &mut *services.stats, &mut *services.traits);
                }
            }
        }
    }
}
