//! Runtime inventory state.
//!
//! This module owns item stacks, the slot container and the stacking math.
//! Stacks live in a generational arena; slots and the drag state refer to them
//! by [`StackId`]. Higher layers (transfer, equipment) mutate this state only
//! through the operations exposed here.
mod common;
mod cooldown;
mod error;
mod inventory;
mod pool;
mod slot;
mod stack;

pub use common::{SlotId, StackId, Tick};
pub use cooldown::CooldownTracker;
pub use error::{StackError, StateError};
pub use inventory::{InventoryState, ResizeReport};
pub use pool::StackPool;
pub use slot::{Slot, SlotFilter, SlotKind, SlotRegion, SlotRegions};
pub use stack::{DurabilityOutcome, FillResult, ItemStack};
