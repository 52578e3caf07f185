use std::collections::BTreeMap;
use std::sync::Arc;

use crate::env::{ArmorSet, ItemHandle, MechanicId, SetId};
use crate::stats::StatModifier;
use crate::traits::{TraitEnhancement, TraitGrant};

use super::HandlerId;

/// Record of what activating one tier actually applied.
///
/// Deactivation unwinds exactly this record, so a sub-step that was skipped on
/// activation is never reverted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppliedTier {
    pub grants: Vec<TraitGrant>,
    pub enhancements: Vec<TraitEnhancement>,
    pub modifiers: Vec<StatModifier>,
    pub mechanics: Vec<(MechanicId, HandlerId)>,
}

/// Runtime state of one armor set with at least one equipped piece.
#[derive(Clone, Debug)]
pub struct ArmorSetTracker {
    set: Arc<ArmorSet>,
    /// One entry per equipped stack; a piece may appear twice (paired rings).
    equipped: Vec<ItemHandle>,
    active: BTreeMap<usize, AppliedTier>,
}

impl ArmorSetTracker {
    pub fn new(set: Arc<ArmorSet>) -> Self {
        Self {
            set,
            equipped: Vec::new(),
            active: BTreeMap::new(),
        }
    }

    pub fn set(&self) -> &Arc<ArmorSet> {
        &self.set
    }

    pub fn id(&self) -> SetId {
        self.set.id
    }

    /// Number of distinct member pieces equipped.
    pub fn equipped_count(&self) -> u32 {
        let mut distinct: Vec<ItemHandle> = self.equipped.clone();
        distinct.sort_unstable();
        distinct.dedup();
        distinct.len() as u32
    }

    pub fn equipped_pieces(&self) -> &[ItemHandle] {
        &self.equipped
    }

    pub fn has_pieces(&self) -> bool {
        !self.equipped.is_empty()
    }

    pub(crate) fn add_piece(&mut self, piece: ItemHandle) {
        self.equipped.push(piece);
    }

    /// Removes one occurrence of `piece`. Returns false if it was not tracked.
    pub(crate) fn remove_piece(&mut self, piece: ItemHandle) -> bool {
        match self.equipped.iter().position(|handle| *handle == piece) {
            Some(index) => {
                self.equipped.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self, tier: usize) -> bool {
        self.active.contains_key(&tier)
    }

    /// Active tier indices in activation order.
    pub fn active_tiers(&self) -> Vec<usize> {
        let mut tiers: Vec<usize> = self.active.keys().copied().collect();
        tiers.sort_by_key(|&index| {
            let required = self
                .set
                .effects
                .get(index)
                .map_or(u32::MAX, |effect| effect.pieces_required);
            (required, index)
        });
        tiers
    }

    pub fn applied(&self, tier: usize) -> Option<&AppliedTier> {
        self.active.get(&tier)
    }

    pub(crate) fn insert_applied(&mut self, tier: usize, applied: AppliedTier) {
        self.active.insert(tier, applied);
    }

    pub(crate) fn take_applied(&mut self, tier: usize) -> Option<AppliedTier> {
        self.active.remove(&tier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::SetEffect;

    #[test]
    fn duplicate_pieces_count_once() {
        let set = ArmorSet::new(SetId(1), "Twin Rings")
            .with_member(ItemHandle(1))
            .with_member(ItemHandle(2))
            .with_effect(SetEffect::new("pair", 2));
        let mut tracker = ArmorSetTracker::new(Arc::new(set));

        tracker.add_piece(ItemHandle(1));
        tracker.add_piece(ItemHandle(1));
        assert_eq!(tracker.equipped_count(), 1);

        tracker.add_piece(ItemHandle(2));
        assert_eq!(tracker.equipped_count(), 2);

        assert!(tracker.remove_piece(ItemHandle(1)));
        assert_eq!(tracker.equipped_count(), 2);
        assert!(!tracker.remove_piece(ItemHandle(9)));
    }
}
