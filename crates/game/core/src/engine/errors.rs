//! Error types surfaced by the inventory façade.

use crate::env::OracleError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::StateError;
use crate::transfer::TransferError;

/// Errors surfaced while executing an operation through [`InventoryEngine`].
///
/// [`InventoryEngine`]: super::InventoryEngine
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error("content lookup failed: {0}")]
    Oracle(#[from] OracleError),

    #[error("inventory operation failed: {0}")]
    State(#[from] StateError),

    #[error("transfer failed: {0}")]
    Transfer(#[from] TransferError),
}

impl GameError for InventoryError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            InventoryError::Oracle(error) => error.severity(),
            InventoryError::State(error) => error.severity(),
            InventoryError::Transfer(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            InventoryError::Oracle(error) => error.error_code(),
            InventoryError::State(error) => error.error_code(),
            InventoryError::Transfer(error) => error.error_code(),
        }
    }
}
