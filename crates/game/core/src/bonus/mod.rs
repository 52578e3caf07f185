//! Armor set bonus engine.
//!
//! One [`ArmorSetTracker`] exists per set with at least one equipped piece.
//! Each equipment change recomputes the tiers a set qualifies for and applies
//! only the difference: new tiers are activated (grants, enhancements, stat
//! modifiers, mechanics) and tiers that no longer qualify are unwound in the
//! reverse order from the record of what was applied.
mod engine;
mod error;
mod mechanics;
mod tracker;

pub use engine::{SetBonusEngine, SetChange, SetMilestone};
pub use error::SkipReason;
pub use mechanics::{HandlerId, MechanicHandler, MechanicRegistry};
pub use tracker::{AppliedTier, ArmorSetTracker};
