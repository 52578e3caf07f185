//! The slot container.
//!
//! Slots are laid out as `[equipment][hotbar][general]`. Equipment slots carry
//! a category constraint; hotbar and general slots (together: storage) accept
//! anything. Every stack lives in the [`StackPool`]; slots hold handles.
//!
//! Bulk operations (`add_item`, `remove_quantity`, quantity queries) only look
//! at storage slots, so equipped gear is never auto-filled or consumed.

use std::ops::Range;
use std::sync::Arc;

use crate::config::InventoryConfig;
use crate::env::{ItemDefinition, ItemHandle, Spawner};

use super::{
    ItemStack, Slot, SlotFilter, SlotId, SlotRegion, SlotRegions, StackError, StackId, StackPool,
    StateError,
};

/// Summary of a storage resize.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResizeReport {
    pub previous_storage: usize,
    pub storage: usize,
    /// Units from removed slots that found room in the surviving slots.
    pub redistributed: u32,
    /// Stacks handed to the spawner because nothing could hold them.
    pub dropped: Vec<(ItemHandle, u32)>,
}

/// Ordered slot collection plus the arena owning its stacks.
#[derive(Clone, Debug)]
pub struct InventoryState {
    slots: Vec<Slot>,
    equipment_len: usize,
    hotbar_len: usize,
    pool: StackPool,
    /// Origin of an active drag. Automatic placement never targets it.
    reserved: Option<SlotId>,
}

impl InventoryState {
    pub fn new(config: &InventoryConfig) -> Self {
        let equipment_len = config.equipment.len().min(InventoryConfig::MAX_SLOTS);
        let hotbar_len = (config.hotbar_slots as usize)
            .min(InventoryConfig::MAX_SLOTS - equipment_len);
        let general_len = (config.general_slots as usize)
            .min(InventoryConfig::MAX_SLOTS - equipment_len - hotbar_len);

        let mut slots = Vec::with_capacity(equipment_len + hotbar_len + general_len);
        slots.extend(
            config
                .equipment
                .iter()
                .take(equipment_len)
                .map(|&category| Slot::equipment(category)),
        );
        slots.extend((0..hotbar_len).map(|_| Slot::common(SlotRegion::Hotbar)));
        slots.extend((0..general_len).map(|_| Slot::common(SlotRegion::General)));

        Self {
            slots,
            equipment_len,
            hotbar_len,
            pool: StackPool::new(),
            reserved: None,
        }
    }

    // ===== layout =====

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn equipment_len(&self) -> usize {
        self.equipment_len
    }

    pub fn hotbar_len(&self) -> usize {
        self.hotbar_len
    }

    pub fn general_len(&self) -> usize {
        self.storage_len() - self.hotbar_len
    }

    /// Number of storage (hotbar + general) slots.
    pub fn storage_len(&self) -> usize {
        self.slots.len() - self.equipment_len
    }

    pub fn equipment_ids(&self) -> impl Iterator<Item = SlotId> + use<> {
        Self::ids(0..self.equipment_len)
    }

    pub fn storage_ids(&self) -> impl Iterator<Item = SlotId> + use<> {
        Self::ids(self.equipment_len..self.slots.len())
    }

    fn ids(range: Range<usize>) -> impl Iterator<Item = SlotId> {
        range.map(|index| SlotId(index as u16))
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &Slot)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(index, slot)| (SlotId(index as u16), slot))
    }

    // ===== lookup =====

    /// Looks up a slot.
    ///
    /// # Errors
    ///
    /// Returns `StateError::InvalidSlotReference` for out-of-range ids.
    pub fn slot(&self, id: SlotId) -> Result<&Slot, StateError> {
        self.slots
            .get(id.index())
            .ok_or(StateError::InvalidSlotReference(id))
    }

    fn slot_mut(&mut self, id: SlotId) -> Result<&mut Slot, StateError> {
        self.slots
            .get_mut(id.index())
            .ok_or(StateError::InvalidSlotReference(id))
    }

    /// Handle of the stack in an occupied slot.
    pub fn occupant(&self, id: SlotId) -> Result<StackId, StateError> {
        self.slot(id)?.stack().ok_or(StateError::EmptySlot(id))
    }

    /// Stack held in a slot, if any.
    pub fn stack_at(&self, id: SlotId) -> Result<Option<&ItemStack>, StateError> {
        Ok(self.slot(id)?.stack().and_then(|stack| self.pool.get(stack)))
    }

    pub fn stack(&self, id: StackId) -> Option<&ItemStack> {
        self.pool.get(id)
    }

    pub(crate) fn stack_mut(&mut self, id: StackId) -> Option<&mut ItemStack> {
        self.pool.get_mut(id)
    }

    pub(crate) fn pair_mut(
        &mut self,
        a: StackId,
        b: StackId,
    ) -> Option<(&mut ItemStack, &mut ItemStack)> {
        self.pool.pair_mut(a, b)
    }

    pub fn pool(&self) -> &StackPool {
        &self.pool
    }

    /// Slot currently holding `stack`.
    pub fn locate(&self, stack: StackId) -> Option<SlotId> {
        self.iter()
            .find(|(_, slot)| slot.stack() == Some(stack))
            .map(|(id, _)| id)
    }

    pub fn reserved(&self) -> Option<SlotId> {
        self.reserved
    }

    pub(crate) fn reserve(&mut self, slot: Option<SlotId>) {
        self.reserved = slot;
    }

    // ===== searches =====

    /// First empty slot matching `filter`, skipping a reserved drag origin.
    pub fn find_empty_slot(&self, filter: SlotFilter) -> Option<SlotId> {
        self.iter()
            .find(|(id, slot)| {
                slot.is_empty() && Some(*id) != self.reserved && filter.matches(slot)
            })
            .map(|(id, _)| id)
    }

    /// First storage slot holding `handle` with spare room.
    pub fn find_stackable_slot(&self, handle: ItemHandle) -> Option<SlotId> {
        self.stackable_slots(handle, SlotFilter::STORAGE).next()
    }

    /// Stackable slot first, otherwise the first empty storage slot.
    pub fn find_first_available(&self, definition: &ItemDefinition) -> Option<SlotId> {
        self.find_stackable_slot(definition.handle).or_else(|| {
            self.find_empty_slot(SlotFilter::STORAGE.accepting(definition.category))
        })
    }

    fn stackable_slots(
        &self,
        handle: ItemHandle,
        filter: SlotFilter,
    ) -> impl Iterator<Item = SlotId> + '_ {
        self.iter()
            .filter(move |(_, slot)| filter.matches(slot))
            .filter(move |(_, slot)| {
                slot.stack()
                    .and_then(|stack| self.pool.get(stack))
                    .is_some_and(|stack| stack.handle() == handle && !stack.is_full())
            })
            .map(|(id, _)| id)
    }

    fn storage_stacks(&self) -> impl Iterator<Item = &ItemStack> {
        self.slots[self.equipment_len..]
            .iter()
            .filter_map(|slot| slot.stack())
            .filter_map(|stack| self.pool.get(stack))
    }

    // ===== bulk operations =====

    /// Adds `quantity` units of `definition`, returning the units that did
    /// not fit.
    ///
    /// Every partially filled stack of the item is topped up (in slot order)
    /// before any empty slot is used, and empty slots keep being used while
    /// units remain. `durability` supplies per-unit values; missing entries
    /// are fresh units and extra entries are ignored.
    pub fn add_item(
        &mut self,
        definition: &Arc<ItemDefinition>,
        quantity: u32,
        durability: &[f32],
    ) -> u32 {
        if quantity == 0 {
            return 0;
        }
        let accepted = self.capacity_for(definition).min(u64::from(quantity)) as u32;
        let mut units = Self::incoming_units(definition, accepted, durability);

        let targets: Vec<SlotId> = self
            .stackable_slots(definition.handle, SlotFilter::STORAGE)
            .collect();
        for id in targets {
            if units.is_empty() {
                break;
            }
            let Some(stack) = self.slots[id.index()]
                .stack()
                .and_then(|stack| self.pool.get_mut(stack))
            else {
                continue;
            };
            let moved = (stack.room() as usize).min(units.len());
            let keep = units.len() - moved;
            stack.push_units(units.split_off(keep));
            tracing::debug!(item = %definition.handle, slot = %id, moved, "stacked into slot");
        }

        while !units.is_empty() {
            let Some(id) =
                self.find_empty_slot(SlotFilter::STORAGE.accepting(definition.category))
            else {
                break;
            };
            let moved = (definition.max_stack as usize).min(units.len());
            if moved == 0 {
                break;
            }
            let keep = units.len() - moved;
            let stack = match ItemStack::new(Arc::clone(definition), units.split_off(keep)) {
                Ok(stack) => stack,
                Err(error) => {
                    tracing::warn!(item = %definition.handle, %error, "could not build stack");
                    break;
                }
            };
            let stack = self.pool.insert(stack);
            self.slots[id.index()].put(stack);
            tracing::debug!(item = %definition.handle, slot = %id, moved, "placed new stack");
        }

        let remainder = quantity - accepted + units.len() as u32;
        if remainder > 0 {
            tracing::debug!(item = %definition.handle, remainder, "inventory full");
        }
        remainder
    }

    fn incoming_units(definition: &ItemDefinition, quantity: u32, durability: &[f32]) -> Vec<f32> {
        let quantity = quantity as usize;
        let mut units: Vec<f32> = durability.iter().copied().take(quantity).collect();
        units.resize(quantity, definition.max_durability);
        units
    }

    /// Removes up to `amount` units of `handle` from storage, in slot order and
    /// from the tail of each stack. Returns the number of units removed.
    pub fn remove_quantity(&mut self, handle: ItemHandle, amount: u32) -> u32 {
        let mut removed = 0;
        let ids: Vec<SlotId> = self.storage_ids().collect();
        for id in ids {
            if removed == amount {
                break;
            }
            let Some(stack_id) = self.slots[id.index()].stack() else {
                continue;
            };
            let Some(stack) = self.pool.get_mut(stack_id) else {
                continue;
            };
            if stack.handle() != handle {
                continue;
            }

            let taken = stack.take_units(amount - removed).len() as u32;
            removed += taken;
            if stack.is_empty() {
                self.slots[id.index()].take();
                self.pool.remove(stack_id);
            }
        }
        tracing::debug!(item = %handle, requested = amount, removed, "removed quantity");
        removed
    }

    // ===== queries =====

    /// Weight of every live stack, including one being dragged.
    pub fn total_weight(&self) -> f32 {
        self.pool.iter().map(|(_, stack)| stack.weight()).sum()
    }

    /// Units of `handle` in storage. Armor counts one per stack.
    pub fn count_of(&self, handle: ItemHandle) -> u32 {
        self.storage_stacks()
            .filter(|stack| stack.handle() == handle)
            .map(|stack| {
                if stack.definition().armor().is_some() {
                    1
                } else {
                    stack.count()
                }
            })
            .sum()
    }

    pub fn has_at_least(&self, handle: ItemHandle, quantity: u32) -> bool {
        self.count_of(handle) >= quantity
    }

    /// Returns true if `add_item` would place all `quantity` units.
    pub fn has_space_for(&self, definition: &ItemDefinition, quantity: u32) -> bool {
        self.capacity_for(definition) >= u64::from(quantity)
    }

    /// Units of `definition` storage can still take: spare room in its stacks
    /// plus a full stack per empty compatible slot.
    fn capacity_for(&self, definition: &ItemDefinition) -> u64 {
        let stack_room: u64 = self
            .storage_stacks()
            .filter(|stack| stack.handle() == definition.handle)
            .map(|stack| u64::from(stack.room()))
            .sum();
        let empty = self
            .iter()
            .filter(|(id, slot)| {
                slot.is_empty()
                    && Some(*id) != self.reserved
                    && SlotFilter::STORAGE.accepting(definition.category).matches(slot)
            })
            .count() as u64;
        stack_room + empty * u64::from(definition.max_stack)
    }

    // ===== slot-level mutation =====

    /// Takes the stack out of a slot without destroying it.
    pub(crate) fn detach(&mut self, id: SlotId) -> Result<StackId, StateError> {
        let slot = self.slot_mut(id)?;
        slot.take().ok_or(StateError::EmptySlot(id))
    }

    /// Puts a live stack into an empty, compatible slot.
    pub(crate) fn attach(&mut self, id: SlotId, stack: StackId) -> Result<(), StateError> {
        self.check_placement(id, stack)?;
        let slot = self.slot_mut(id)?;
        if !slot.is_empty() {
            return Err(StateError::SlotOccupied(id));
        }
        slot.put(stack);
        Ok(())
    }

    /// Puts a live stack into a compatible slot, returning the previous occupant.
    pub(crate) fn replace(
        &mut self,
        id: SlotId,
        stack: StackId,
    ) -> Result<Option<StackId>, StateError> {
        self.check_placement(id, stack)?;
        Ok(self.slot_mut(id)?.put(stack))
    }

    /// Verifies that `stack` is live and may sit in slot `id`.
    pub fn check_placement(&self, id: SlotId, stack: StackId) -> Result<(), StateError> {
        let slot = self.slot(id)?;
        let category = self
            .pool
            .get(stack)
            .ok_or(StateError::DanglingStack(id))?
            .definition()
            .category;
        if !slot.accepts(category) {
            return Err(StateError::IncompatibleCategory { slot: id, category });
        }
        Ok(())
    }

    pub(crate) fn spawn(&mut self, stack: ItemStack) -> StackId {
        self.pool.insert(stack)
    }

    /// Destroys a stack that is not held by any slot.
    pub(crate) fn destroy(&mut self, stack: StackId) -> Option<ItemStack> {
        self.pool.remove(stack)
    }

    /// Empties a slot and destroys its stack.
    pub(crate) fn clear_slot(&mut self, id: SlotId) -> Result<ItemStack, StateError> {
        let stack = self.detach(id)?;
        self.pool.remove(stack).ok_or(StateError::DanglingStack(id))
    }

    /// Splits the stack in `id` and places the split-off units in the first
    /// empty storage slot.
    ///
    /// # Errors
    ///
    /// Fails without mutation when the slot is empty, the stack holds a single
    /// unit, or no empty storage slot exists.
    pub fn split_at(&mut self, id: SlotId, ratio: f32) -> Result<SlotId, StateError> {
        let source = self.occupant(id)?;
        let (count, category) = self
            .pool
            .get(source)
            .map(|stack| (stack.count(), stack.definition().category))
            .ok_or(StateError::DanglingStack(id))?;
        if count <= 1 {
            return Err(StackError::TooSmallToSplit { count }.into());
        }
        let target = self
            .find_empty_slot(SlotFilter::STORAGE.accepting(category))
            .ok_or(StateError::NoFreeSlot)?;

        let stack = self
            .pool
            .get_mut(source)
            .ok_or(StateError::DanglingStack(id))?
            .split(ratio)?;
        let stack = self.pool.insert(stack);
        self.slots[target.index()].put(stack);
        Ok(target)
    }

    /// Moves a storage stack between the hotbar and the general region:
    /// partial stacks of the same item in the other region first, then the
    /// first empty slot there. Returns the number of units moved.
    pub fn quick_move(&mut self, id: SlotId) -> Result<u32, StateError> {
        let source = self.occupant(id)?;
        let region = self.slot(id)?.region();
        let destination = match region {
            SlotRegion::Hotbar => SlotFilter::regions(SlotRegions::GENERAL),
            SlotRegion::General => SlotFilter::regions(SlotRegions::HOTBAR),
            SlotRegion::Equipment => return Err(StateError::NotStorage(id)),
        };
        let handle = self
            .pool
            .get(source)
            .map(ItemStack::handle)
            .ok_or(StateError::DanglingStack(id))?;

        let mut moved = 0;
        let targets: Vec<SlotId> = self.stackable_slots(handle, destination).collect();
        for target in targets {
            let Some(target_stack) = self.slots[target.index()].stack() else {
                continue;
            };
            let Some((into, from)) = self.pool.pair_mut(target_stack, source) else {
                continue;
            };
            let result = into.fill_from(from)?;
            moved += result.consumed;
            if result.is_complete() {
                self.slots[id.index()].take();
                self.pool.remove(source);
                return Ok(moved);
            }
        }

        if let Some(target) = self.find_empty_slot(destination) {
            if let Some(stack) = self.slots[id.index()].take() {
                moved += self.pool.get(stack).map_or(0, ItemStack::count);
                self.slots[target.index()].put(stack);
            }
        }
        Ok(moved)
    }

    // ===== resize =====

    /// Sets the number of storage slots.
    ///
    /// Growing appends empty general slots. Shrinking removes trailing general
    /// slots; their stacks are first merged into or moved to surviving storage
    /// slots and whatever still does not fit is dropped through `spawner`.
    ///
    /// # Errors
    ///
    /// Rejects sizes smaller than the hotbar or past the slot id range.
    pub fn resize(
        &mut self,
        storage: usize,
        spawner: &mut dyn Spawner,
    ) -> Result<ResizeReport, StateError> {
        if storage < self.hotbar_len {
            return Err(StateError::ResizeBelowFixedRegion {
                requested: storage,
                minimum: self.hotbar_len,
            });
        }
        let maximum = InventoryConfig::MAX_SLOTS - self.equipment_len;
        if storage > maximum {
            return Err(StateError::ResizeTooLarge {
                requested: storage,
                maximum,
            });
        }

        let mut report = ResizeReport {
            previous_storage: self.storage_len(),
            storage,
            ..ResizeReport::default()
        };
        let new_len = self.equipment_len + storage;

        if new_len >= self.slots.len() {
            self.slots.resize_with(new_len, || Slot::common(SlotRegion::General));
            tracing::debug!(storage, "grew storage");
            return Ok(report);
        }

        let displaced: Vec<StackId> = self
            .slots
            .drain(new_len..)
            .filter_map(|mut slot| slot.take())
            .collect();
        if self.reserved.is_some_and(|slot| slot.index() >= new_len) {
            self.reserved = None;
        }

        for stack in displaced {
            report.redistributed += self.rehome(stack);
            if let Some(leftover) = self.pool.get(stack) {
                if self.slots.iter().any(|slot| slot.stack() == Some(stack)) {
                    continue;
                }
                let (definition, durability) =
                    (Arc::clone(leftover.definition()), leftover.durability().to_vec());
                tracing::warn!(
                    item = %definition.handle,
                    quantity = durability.len(),
                    "no room after shrink, dropping into world"
                );
                spawner.drop_into_world(&definition, durability.len() as u32, &durability);
                report.dropped.push((definition.handle, durability.len() as u32));
                self.pool.remove(stack);
            }
        }

        tracing::debug!(
            storage,
            redistributed = report.redistributed,
            dropped = report.dropped.len(),
            "shrank storage"
        );
        Ok(report)
    }

    /// Merges a slotless stack into storage or moves it to an empty storage
    /// slot. Returns the number of units merged or moved.
    fn rehome(&mut self, stack: StackId) -> u32 {
        let Some((handle, category)) = self
            .pool
            .get(stack)
            .map(|s| (s.handle(), s.definition().category))
        else {
            return 0;
        };

        let mut moved = 0;
        let targets: Vec<SlotId> = self
            .stackable_slots(handle, SlotFilter::STORAGE)
            .collect();
        for target in targets {
            let Some(target_stack) = self.slots[target.index()].stack() else {
                continue;
            };
            let Some((into, from)) = self.pool.pair_mut(target_stack, stack) else {
                continue;
            };
            let Ok(result) = into.fill_from(from) else {
                continue;
            };
            moved += result.consumed;
            if result.is_complete() {
                self.pool.remove(stack);
                return moved;
            }
        }

        if let Some(target) = self.find_empty_slot(SlotFilter::STORAGE.accepting(category)) {
            moved += self.pool.get(stack).map_or(0, ItemStack::count);
            self.slots[target.index()].put(stack);
        }
        moved
    }

    // ===== diagnostics =====

    /// Checks every stack invariant and that each slot references a live,
    /// distinct stack its constraint accepts.
    pub fn is_consistent(&self, tolerance: f32) -> bool {
        let stacks_ok = self
            .pool
            .iter()
            .all(|(_, stack)| !stack.is_empty() && stack.is_consistent(tolerance));

        let mut seen = Vec::new();
        let slots_ok = self.iter().all(|(_, slot)| match slot.stack() {
            None => true,
            Some(id) => {
                let unique = !seen.contains(&id);
                seen.push(id);
                unique
                    && self
                        .pool
                        .get(id)
                        .is_some_and(|stack| slot.accepts(stack.definition().category))
            }
        });

        stacks_ok && slots_ok
    }
}
