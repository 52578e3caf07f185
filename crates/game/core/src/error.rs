//! Shared error classification.
//!
//! Each subsystem keeps its own error enum next to the code that raises it
//! (`StackError`, `StateError`, `TransferError`, ...). They all implement
//! [`GameError`] so hosts can route failures by severity and match on stable
//! codes instead of message text.
//!
//! Errors are only returned before the first mutation of a multi-step
//! operation; a caller never observes a half-applied change.

/// How the host should treat a failed operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// The gesture fell back to a no-op; the player can simply try again.
    Recoverable,

    /// Bad input such as a stale slot id or an unknown item handle.
    Validation,

    /// Arena and slot bookkeeping disagree. Always a bug.
    Internal,

    /// Content or configuration cannot be used at all.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true for severities that point at a defect rather than input.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

impl core::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Implemented by every armory-core error enum (derive the `Display` and
/// `Error` impls with `thiserror`).
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable SCREAMING_SNAKE identifier of the variant, for log filters and
    /// test assertions.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
