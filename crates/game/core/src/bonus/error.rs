use crate::env::MechanicId;
use crate::error::{ErrorSeverity, GameError};
use crate::traits::TraitId;

/// A tier sub-step that was skipped during activation.
///
/// Skips never abort the rest of the tier; they are reported on the
/// [`SetChange`](super::SetChange) and logged.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    #[error("tier {tier}: no handler for mechanic `{mechanic}`")]
    UnresolvedMechanic { tier: usize, mechanic: MechanicId },

    #[error("tier {tier}: enhancement target `{target}` is not granted")]
    EnhancementTargetMissing { tier: usize, target: TraitId },
}

impl SkipReason {
    pub fn tier(&self) -> usize {
        match self {
            SkipReason::UnresolvedMechanic { tier, .. }
            | SkipReason::EnhancementTargetMissing { tier, .. } => *tier,
        }
    }
}

impl GameError for SkipReason {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            SkipReason::UnresolvedMechanic { .. } => "BONUS_UNRESOLVED_MECHANIC",
            SkipReason::EnhancementTargetMissing { .. } => "BONUS_ENHANCEMENT_TARGET_MISSING",
        }
    }
}
