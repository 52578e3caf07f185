use crate::error::{ErrorSeverity, GameError};
use crate::state::{SlotId, StateError};

/// Errors from the drag state machine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransferError {
    /// A drag is already in progress.
    #[error("already dragging from {origin}")]
    AlreadyDragging { origin: SlotId },

    /// Release without a preceding press.
    #[error("no drag in progress")]
    NotDragging,

    #[error(transparent)]
    State(#[from] StateError),
}

impl GameError for TransferError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            TransferError::AlreadyDragging { .. } | TransferError::NotDragging => {
                ErrorSeverity::Validation
            }
            TransferError::State(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            TransferError::AlreadyDragging { .. } => "TRANSFER_ALREADY_DRAGGING",
            TransferError::NotDragging => "TRANSFER_NOT_DRAGGING",
            TransferError::State(error) => error.error_code(),
        }
    }
}
