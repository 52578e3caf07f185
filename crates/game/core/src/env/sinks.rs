//! Outward collaborator interfaces.
//!
//! The core never renders, spawns, or edits a character sheet itself. It calls
//! these narrow, synchronous interfaces and treats each call as fire-and-forget:
//! there is no return value to roll back on.

use crate::stats::StatModifier;
use crate::traits::{TraitEnhancement, TraitGrant, TraitId};

use super::ItemDefinition;

/// Materializes item stacks in the world (drops, overflow on shrink).
pub trait Spawner {
    fn drop_into_world(&mut self, definition: &ItemDefinition, quantity: u32, durability: &[f32]);
}

/// Applies and removes numeric stat deltas on the owning character.
///
/// `remove` is always called with a modifier previously passed to `apply`.
pub trait StatSink {
    fn apply(&mut self, modifier: &StatModifier);
    fn remove(&mut self, modifier: &StatModifier);
}

/// Grants and revokes named passive abilities, and modifies granted ones.
pub trait TraitSink {
    /// Returns true if the trait is currently granted from any source.
    fn has_trait(&self, id: &TraitId) -> bool;

    fn grant(&mut self, grant: &TraitGrant);
    fn revoke(&mut self, grant: &TraitGrant);

    /// Applies an enhancement to an already granted trait.
    ///
    /// Callers check [`has_trait`](Self::has_trait) first; implementations may
    /// assume the target is present.
    fn enhance(&mut self, enhancement: &TraitEnhancement);

    /// Reverts an enhancement previously passed to [`enhance`](Self::enhance).
    fn revert(&mut self, enhancement: &TraitEnhancement);
}

/// Mutable borrows of every collaborator one gesture may touch.
pub struct Services<'a> {
    pub spawner: &'a mut dyn Spawner,
    pub stats: &'a mut dyn StatSink,
    pub traits: &'a mut dyn TraitSink,
}

impl<'a> Services<'a> {
    pub fn new(
        spawner: &'a mut dyn Spawner,
        stats: &'a mut dyn StatSink,
        traits: &'a mut dyn TraitSink,
    ) -> Self {
        Self {
            spawner,
            stats,
            traits,
        }
    }
}
