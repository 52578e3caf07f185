//! Inventory façade.
//!
//! The [`InventoryEngine`] owns the slot container, the drag state, the
//! equipment resolver (and through it the set bonus engine) and item
//! cooldowns. Every operation runs to completion within the call; hosts drive
//! it from their update loop and pass collaborators in through [`Services`].

mod errors;
mod usage;

pub use errors::InventoryError;
pub use usage::UseOutcome;

use std::sync::Arc;

use crate::bonus::{MechanicRegistry, SetBonusEngine, SetChange};
use crate::config::InventoryConfig;
use crate::env::{ArmorSetOracle, ItemCatalog, ItemHandle, Services, SetEffect, SetId};
use crate::equipment::EquipmentResolver;
use crate::state::{
    CooldownTracker, InventoryState, ItemStack, ResizeReport, Slot, SlotId, StateError,
};
use crate::transfer::{ReleaseTarget, TransferOutcome, TransferState};

/// Grid inventory with equipment slots and armor set bonuses.
#[derive(Debug)]
pub struct InventoryEngine {
    config: InventoryConfig,
    catalog: Arc<ItemCatalog>,
    inventory: InventoryState,
    transfer: TransferState,
    equipment: EquipmentResolver,
    cooldowns: CooldownTracker,
}

impl InventoryEngine {
    pub fn new(config: InventoryConfig, catalog: Arc<ItemCatalog>) -> Self {
        let inventory = InventoryState::new(&config);
        let sets: Arc<dyn ArmorSetOracle> = Arc::clone(&catalog) as Arc<dyn ArmorSetOracle>;
        let bonuses = SetBonusEngine::new(sets);
        Self {
            config,
            catalog,
            inventory,
            transfer: TransferState::Idle,
            equipment: EquipmentResolver::new(bonuses),
            cooldowns: CooldownTracker::new(),
        }
    }

    /// Replaces the mechanic registry used by set tiers.
    pub fn with_mechanics(mut self, mechanics: MechanicRegistry) -> Self {
        *self.equipment.bonuses_mut().mechanics_mut() = mechanics;
        self
    }

    pub fn mechanics_mut(&mut self) -> &mut MechanicRegistry {
        self.equipment.bonuses_mut().mechanics_mut()
    }

    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Arc<ItemCatalog> {
        &self.catalog
    }

    pub fn inventory(&self) -> &InventoryState {
        &self.inventory
    }

    pub fn bonuses(&self) -> &SetBonusEngine {
        self.equipment.bonuses()
    }

    // ===== item flow =====

    /// Adds `quantity` units of `item` to storage. Returns the units that did
    /// not fit.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::ItemNotFound` for unknown handles.
    pub fn add_item(
        &mut self,
        item: ItemHandle,
        quantity: u32,
        durability: &[f32],
    ) -> Result<u32, InventoryError> {
        let definition = self.catalog.item(item)?;
        Ok(self.inventory.add_item(&definition, quantity, durability))
    }

    /// Removes up to `amount` units of `item` from storage. Returns the units
    /// removed.
    pub fn remove_quantity(&mut self, item: ItemHandle, amount: u32) -> u32 {
        self.inventory.remove_quantity(item, amount)
    }

    // ===== drag gesture =====

    /// Picks up the stack in `slot`. Returns false (and logs why) if nothing
    /// was picked up.
    pub fn begin_drag(&mut self, slot: SlotId) -> bool {
        match self.transfer.begin(&mut self.inventory, slot) {
            Ok(_) => true,
            Err(error) => {
                tracing::warn!(slot = %slot, %error, "cannot start drag");
                false
            }
        }
    }

    /// Releases the carried stack over `target`.
    ///
    /// # Errors
    ///
    /// Returns `TransferError::NotDragging` when no drag is active.
    pub fn end_drag(
        &mut self,
        target: ReleaseTarget,
        services: &mut Services<'_>,
    ) -> Result<TransferOutcome, InventoryError> {
        let outcome =
            self.transfer
                .release(&mut self.inventory, &mut self.equipment, target, services)?;
        tracing::debug!(?target, ?outcome, "drag released");
        Ok(outcome)
    }

    /// Returns an active drag to its origin.
    pub fn cancel_drag(&mut self, services: &mut Services<'_>) -> Option<TransferOutcome> {
        self.transfer
            .cancel(&mut self.inventory, &mut self.equipment, services)
    }

    pub fn is_dragging(&self) -> bool {
        self.transfer.is_dragging()
    }

    /// Stack currently being dragged.
    pub fn carried(&self) -> Option<&ItemStack> {
        self.transfer
            .carried()
            .and_then(|stack| self.inventory.stack(stack))
    }

    // ===== single-slot actions =====

    /// Splits the stack in `slot` into the first empty storage slot. Returns
    /// false (inventory unchanged) for single units, empty or stale slots and
    /// full inventories.
    pub fn split_stack(&mut self, slot: SlotId) -> bool {
        match self.inventory.split_at(slot, self.config.split_ratio) {
            Ok(target) => {
                tracing::debug!(from = %slot, to = %target, "split stack");
                true
            }
            Err(error) => {
                tracing::debug!(slot = %slot, %error, "split refused");
                false
            }
        }
    }

    /// Moves a storage stack between the hotbar and the general region.
    /// Returns the units moved.
    ///
    /// # Errors
    ///
    /// Fails for stale, empty or equipment slots.
    pub fn quick_move(&mut self, slot: SlotId) -> Result<u32, InventoryError> {
        Ok(self.inventory.quick_move(slot)?)
    }

    // ===== layout =====

    /// Sets the number of storage slots. An active drag is returned first;
    /// stacks that no longer fit are dropped through the spawner.
    ///
    /// # Errors
    ///
    /// Rejects sizes below the hotbar or past the slot id range, without
    /// touching the inventory or the drag.
    pub fn resize(
        &mut self,
        storage: usize,
        services: &mut Services<'_>,
    ) -> Result<ResizeReport, InventoryError> {
        let hotbar = self.inventory.hotbar_len();
        if storage < hotbar {
            return Err(StateError::ResizeBelowFixedRegion {
                requested: storage,
                minimum: hotbar,
            }
            .into());
        }
        let maximum = InventoryConfig::MAX_SLOTS - self.inventory.equipment_len();
        if storage > maximum {
            return Err(StateError::ResizeTooLarge {
                requested: storage,
                maximum,
            }
            .into());
        }
        if let Some(outcome) = self.cancel_drag(services) {
            tracing::debug!(?outcome, "returned drag before resize");
        }
        Ok(self.inventory.resize(storage, &mut *services.spawner)?)
    }

    // ===== set bonuses =====

    /// Effects of the active tiers of `set`, in activation order.
    pub fn get_equipped_set_effects(&self, set: SetId) -> Vec<SetEffect> {
        self.equipment.bonuses().get_equipped_set_effects(set)
    }

    pub fn active_tiers(&self, set: SetId) -> Vec<usize> {
        self.equipment.bonuses().active_tiers(set)
    }

    pub fn equipped_count(&self, set: SetId) -> u32 {
        self.equipment.bonuses().equipped_count(set)
    }

    /// Set changes since the last drain, oldest first.
    ///
    /// Hosts should drain once per frame; past
    /// [`EquipmentResolver::MAX_PENDING_CHANGES`] the oldest undrained changes
    /// are discarded.
    pub fn drain_set_changes(&mut self) -> Vec<SetChange> {
        self.equipment.drain_set_changes()
    }

    // ===== queries =====

    pub fn slot(&self, slot: SlotId) -> Result<&Slot, InventoryError> {
        Ok(self.inventory.slot(slot)?)
    }

    pub fn stack(&self, slot: SlotId) -> Result<Option<&ItemStack>, InventoryError> {
        Ok(self.inventory.stack_at(slot)?)
    }

    /// Weight of everything held, including a carried stack.
    pub fn total_weight(&self) -> f32 {
        self.inventory.total_weight()
    }

    pub fn count_of(&self, item: ItemHandle) -> u32 {
        self.inventory.count_of(item)
    }

    pub fn has_at_least(&self, item: ItemHandle, quantity: u32) -> bool {
        self.inventory.has_at_least(item, quantity)
    }

    /// Returns true if `quantity` units of `item` would fit. Unknown items
    /// never fit.
    pub fn has_space_for(&self, item: ItemHandle, quantity: u32) -> bool {
        self.catalog
            .item(item)
            .is_ok_and(|definition| self.inventory.has_space_for(&definition, quantity))
    }

    /// Returns true if the carried weight exceeds the configured limit.
    pub fn is_overweight(&self) -> bool {
        self.config
            .max_carry_weight
            .is_some_and(|limit| self.total_weight() > limit + self.config.weight_tolerance)
    }

    /// Checks the stack and slot invariants, and that exactly the stacks in
    /// equipment slots are equipped. A carried stack keeps its equip state.
    pub fn is_consistent(&self) -> bool {
        if !self.inventory.is_consistent(self.config.weight_tolerance) {
            return false;
        }
        self.inventory.iter().all(|(_, slot)| {
            slot.stack()
                .and_then(|stack| self.inventory.stack(stack))
                .is_none_or(|stack| stack.is_equipped() == slot.is_equipment())
        })
    }
}
