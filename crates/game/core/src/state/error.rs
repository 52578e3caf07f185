//! Inventory state errors.
//!
//! Errors are raised before any mutation: an `Err` always means the
//! inventory is exactly as it was before the call.

use crate::env::{ItemCategory, ItemHandle};
use crate::error::{ErrorSeverity, GameError};

use super::SlotId;

/// Errors from the stacking math on a single stack.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StackError {
    /// Filling across different item definitions.
    #[error("cannot merge {source_item} into a stack of {target_item}")]
    DefinitionMismatch {
        target_item: ItemHandle,
        source_item: ItemHandle,
    },

    /// A stack of one (or zero) cannot be split.
    #[error("a stack of {count} cannot be split")]
    TooSmallToSplit { count: u32 },

    /// Building a stack outside `1..=max_stack`.
    #[error("{item}: {count} units do not fit a stack of at most {max}")]
    InvalidCount { item: ItemHandle, count: u32, max: u32 },
}

impl GameError for StackError {
    fn severity(&self) -> ErrorSeverity {
        use StackError::*;
        match self {
            TooSmallToSplit { .. } => ErrorSeverity::Recoverable,
            DefinitionMismatch { .. } | InvalidCount { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use StackError::*;
        match self {
            DefinitionMismatch { .. } => "STACK_DEFINITION_MISMATCH",
            TooSmallToSplit { .. } => "STACK_TOO_SMALL_TO_SPLIT",
            InvalidCount { .. } => "STACK_INVALID_COUNT",
        }
    }
}

/// Errors from container-level operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// Stale or out-of-range slot id.
    #[error("{0} does not exist")]
    InvalidSlotReference(SlotId),

    /// The operation needs an occupied slot.
    #[error("{0} is empty")]
    EmptySlot(SlotId),

    /// The operation needs an empty slot.
    #[error("{0} is occupied")]
    SlotOccupied(SlotId),

    /// The slot's constraint rejects the item's category.
    #[error("{slot} does not accept {category} items")]
    IncompatibleCategory { slot: SlotId, category: ItemCategory },

    /// The operation only applies to hotbar and general slots.
    #[error("{0} is not a storage slot")]
    NotStorage(SlotId),

    /// No empty storage slot is available.
    #[error("no free storage slot")]
    NoFreeSlot,

    /// Resizing would remove hotbar slots.
    #[error("cannot shrink storage to {requested} slots (hotbar needs {minimum})")]
    ResizeBelowFixedRegion { requested: usize, minimum: usize },

    /// Resizing past the addressable slot range.
    #[error("cannot grow storage to {requested} slots (limit {maximum})")]
    ResizeTooLarge { requested: usize, maximum: usize },

    /// A slot points at a stack the pool no longer holds.
    #[error("{0} refers to a destroyed stack")]
    DanglingStack(SlotId),

    #[error(transparent)]
    Stack(#[from] StackError),
}

impl GameError for StateError {
    fn severity(&self) -> ErrorSeverity {
        use StateError::*;
        match self {
            IncompatibleCategory { .. } | NoFreeSlot => ErrorSeverity::Recoverable,
            InvalidSlotReference(_)
            | EmptySlot(_)
            | SlotOccupied(_)
            | NotStorage(_)
            | ResizeBelowFixedRegion { .. }
            | ResizeTooLarge { .. } => ErrorSeverity::Validation,
            DanglingStack(_) => ErrorSeverity::Internal,
            Stack(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        use StateError::*;
        match self {
            InvalidSlotReference(_) => "STATE_INVALID_SLOT_REFERENCE",
            EmptySlot(_) => "STATE_EMPTY_SLOT",
            SlotOccupied(_) => "STATE_SLOT_OCCUPIED",
            IncompatibleCategory { .. } => "STATE_INCOMPATIBLE_CATEGORY",
            NotStorage(_) => "STATE_NOT_STORAGE",
            NoFreeSlot => "STATE_NO_FREE_SLOT",
            ResizeBelowFixedRegion { .. } => "STATE_RESIZE_BELOW_FIXED_REGION",
            ResizeTooLarge { .. } => "STATE_RESIZE_TOO_LARGE",
            DanglingStack(_) => "STATE_DANGLING_STACK",
            Stack(error) => error.error_code(),
        }
    }
}
