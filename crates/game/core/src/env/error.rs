//! Oracle access errors.

use crate::error::{ErrorSeverity, GameError};

use super::{ItemHandle, SetId};

/// Errors that occur when looking up authored content.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    /// Item definition was not found by handle.
    #[error("item definition {0} not found")]
    ItemNotFound(ItemHandle),

    /// Armor set was not found by id.
    #[error("armor set {0} not found")]
    SetNotFound(SetId),
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            ItemNotFound(_) => "ORACLE_ITEM_NOT_FOUND",
            SetNotFound(_) => "ORACLE_SET_NOT_FOUND",
        }
    }
}
