use std::collections::BTreeMap;
use std::sync::Arc;

use crate::env::{ArmorSet, ArmorSetOracle, ItemDefinition, SetEffect, SetId, StatSink, TraitSink};

use super::{AppliedTier, ArmorSetTracker, MechanicRegistry, SkipReason};

/// Crossing of a set's completion threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SetMilestone {
    Completed,
    Broken,
}

/// Report of one equipment change on a tracked set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetChange {
    pub set: SetId,
    pub previous_count: u32,
    pub equipped_count: u32,
    /// Tier indices activated by this change, in activation order.
    pub activated: Vec<usize>,
    /// Tier indices deactivated by this change, in deactivation order.
    pub deactivated: Vec<usize>,
    pub skipped: Vec<SkipReason>,
    pub milestone: Option<SetMilestone>,
}

impl SetChange {
    /// Returns true if no tier changed state.
    pub fn is_quiet(&self) -> bool {
        self.activated.is_empty() && self.deactivated.is_empty()
    }
}

/// Tracks equipped set pieces and keeps tier effects in step with them.
///
/// Tier activation is diff-based: a change only activates tiers that were not
/// active and deactivates tiers that no longer qualify. Tiers that stay active
/// are never re-applied.
pub struct SetBonusEngine {
    sets: Arc<dyn ArmorSetOracle>,
    trackers: BTreeMap<SetId, ArmorSetTracker>,
    mechanics: MechanicRegistry,
}

impl SetBonusEngine {
    pub fn new(sets: Arc<dyn ArmorSetOracle>) -> Self {
        Self {
            sets,
            trackers: BTreeMap::new(),
            mechanics: MechanicRegistry::new(),
        }
    }

    pub fn with_mechanics(mut self, mechanics: MechanicRegistry) -> Self {
        self.mechanics = mechanics;
        self
    }

    pub fn mechanics(&self) -> &MechanicRegistry {
        &self.mechanics
    }

    pub fn mechanics_mut(&mut self) -> &mut MechanicRegistry {
        &mut self.mechanics
    }

    pub fn tracker(&self, set: SetId) -> Option<&ArmorSetTracker> {
        self.trackers.get(&set)
    }

    pub fn trackers(&self) -> impl Iterator<Item = &ArmorSetTracker> {
        self.trackers.values()
    }

    pub fn equipped_count(&self, set: SetId) -> u32 {
        self.trackers
            .get(&set)
            .map_or(0, ArmorSetTracker::equipped_count)
    }

    pub fn active_tiers(&self, set: SetId) -> Vec<usize> {
        self.trackers
            .get(&set)
            .map(ArmorSetTracker::active_tiers)
            .unwrap_or_default()
    }

    /// Effects of the active tiers of `set`, in activation order.
    pub fn get_equipped_set_effects(&self, set: SetId) -> Vec<SetEffect> {
        let Some(tracker) = self.trackers.get(&set) else {
            return Vec::new();
        };
        tracker
            .active_tiers()
            .into_iter()
            .filter_map(|tier| tracker.set().effects.get(tier).cloned())
            .collect()
    }

    /// Records that `piece` was equipped or unequipped and applies the tier
    /// difference.
    ///
    /// Returns `None` when the piece is not a member of a known set or the
    /// change does not concern a tracked piece.
    pub fn on_equipment_changed(
        &mut self,
        piece: &ItemDefinition,
        equipped: bool,
        stats: &mut dyn StatSink,
        traits: &mut dyn TraitSink,
    ) -> Option<SetChange> {
        let set_id = piece.set()?;
        let Some(set) = self.sets.set(set_id) else {
            tracing::warn!(set = %set_id, item = %piece.handle, "piece refers to an unknown set");
            return None;
        };
        if !set.is_member(piece.handle) {
            tracing::warn!(set = %set_id, item = %piece.handle, "piece is not a member of its set");
            return None;
        }

        let mut tracker = match self.trackers.remove(&set_id) {
            Some(tracker) => tracker,
            None if equipped => ArmorSetTracker::new(Arc::clone(&set)),
            None => {
                tracing::warn!(set = %set_id, item = %piece.handle, "unequipped an untracked piece");
                return None;
            }
        };

        let previous_count = tracker.equipped_count();
        if equipped {
            tracker.add_piece(piece.handle);
        } else if !tracker.remove_piece(piece.handle) {
            tracing::warn!(set = %set_id, item = %piece.handle, "unequipped an untracked piece");
        }
        let equipped_count = tracker.equipped_count();

        let mut change = SetChange {
            set: set_id,
            previous_count,
            equipped_count,
            activated: Vec::new(),
            deactivated: Vec::new(),
            skipped: Vec::new(),
            milestone: Self::milestone(&set, previous_count, equipped_count),
        };

        let target = set.tiers_at(equipped_count);
        let mut leaving: Vec<usize> = tracker
            .active_tiers()
            .into_iter()
            .filter(|tier| !target.contains(tier))
            .collect();
        leaving.reverse();
        for tier in leaving {
            if let Some(applied) = tracker.take_applied(tier) {
                self.deactivate_tier(set_id, tier, applied, stats, traits);
                change.deactivated.push(tier);
            }
        }

        for tier in target {
            if tracker.is_active(tier) {
                continue;
            }
            let Some(effect) = set.effects.get(tier) else {
                continue;
            };
            let applied = self.activate_tier(set_id, tier, effect, stats, traits, &mut change.skipped);
            tracker.insert_applied(tier, applied);
            change.activated.push(tier);
        }

        match change.milestone {
            Some(SetMilestone::Completed) => {
                tracing::info!(set = %set_id, name = %set.name, "armor set completed")
            }
            Some(SetMilestone::Broken) => {
                tracing::info!(set = %set_id, name = %set.name, "armor set broken")
            }
            None => {}
        }

        if tracker.has_pieces() {
            self.trackers.insert(set_id, tracker);
        } else {
            tracing::debug!(set = %set_id, "stopped tracking set");
        }
        Some(change)
    }

    fn milestone(set: &ArmorSet, previous: u32, current: u32) -> Option<SetMilestone> {
        let threshold = set.completion_threshold();
        if threshold == 0 {
            return None;
        }
        if previous < threshold && current >= threshold {
            Some(SetMilestone::Completed)
        } else if previous >= threshold && current < threshold {
            Some(SetMilestone::Broken)
        } else {
            None
        }
    }

    /// Applies grants, enhancements, stat modifiers and mechanics, in that
    /// order, recording what was actually applied.
    fn activate_tier(
        &mut self,
        set: SetId,
        tier: usize,
        effect: &SetEffect,
        stats: &mut dyn StatSink,
        traits: &mut dyn TraitSink,
        skipped: &mut Vec<SkipReason>,
    ) -> AppliedTier {
        let mut applied = AppliedTier::default();

        for grant in &effect.traits {
            traits.grant(grant);
            applied.grants.push(grant.clone());
        }

        for enhancement in &effect.enhancements {
            if traits.has_trait(&enhancement.target) {
                traits.enhance(enhancement);
                applied.enhancements.push(enhancement.clone());
            } else {
                tracing::warn!(
                    %set,
                    tier,
                    target = %enhancement.target,
                    "enhancement target not granted, skipping"
                );
                skipped.push(SkipReason::EnhancementTargetMissing {
                    tier,
                    target: enhancement.target.clone(),
                });
            }
        }

        for modifier in &effect.modifiers {
            stats.apply(modifier);
            applied.modifiers.push(modifier.clone());
        }

        for mechanic in &effect.mechanics {
            match self.mechanics.resolve(&mechanic.id) {
                Some(handler) => {
                    self.mechanics.activate(handler, &mechanic.id, &mechanic.params);
                    applied.mechanics.push((mechanic.id.clone(), handler));
                }
                None => {
                    tracing::warn!(%set, tier, mechanic = %mechanic.id, "no handler for mechanic, skipping");
                    skipped.push(SkipReason::UnresolvedMechanic {
                        tier,
                        mechanic: mechanic.id.clone(),
                    });
                }
            }
        }

        tracing::debug!(%set, tier, name = %effect.name, "activated set tier");
        applied
    }

    /// Unwinds an applied tier in reverse: mechanics, stat modifiers,
    /// enhancements, then grants.
    fn deactivate_tier(
        &mut self,
        set: SetId,
        tier: usize,
        applied: AppliedTier,
        stats: &mut dyn StatSink,
        traits: &mut dyn TraitSink,
    ) {
        for (mechanic, handler) in applied.mechanics.iter().rev() {
            self.mechanics.deactivate(*handler, mechanic);
        }
        for modifier in applied.modifiers.iter().rev() {
            stats.remove(modifier);
        }
        for enhancement in applied.enhancements.iter().rev() {
            traits.revert(enhancement);
        }
        for grant in applied.grants.iter().rev() {
            traits.revoke(grant);
        }
        tracing::debug!(%set, tier, "deactivated set tier");
    }
}

impl std::fmt::Debug for SetBonusEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetBonusEngine")
            .field("trackers", &self.trackers)
            .field("mechanics", &self.mechanics)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::bonus::MechanicHandler;
    use crate::env::{
        ArmorData, ItemCatalog, ItemCategory, ItemHandle, MechanicId, MechanicParams,
        SpecialMechanic,
    };
    use crate::stats::{StatKind, StatLedger, StatModifier};
    use crate::traits::{EnhancementKind, TraitBook, TraitEnhancement, TraitGrant, TraitId};

    type Log = Rc<RefCell<Vec<String>>>;

    struct Recorder(Log);

    impl MechanicHandler for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        fn activate(&mut self, id: &MechanicId, _: &MechanicParams) {
            self.0.borrow_mut().push(format!("+{id}"));
        }

        fn deactivate(&mut self, id: &MechanicId) {
            self.0.borrow_mut().push(format!("-{id}"));
        }
    }

    fn piece(handle: u32, category: ItemCategory) -> ItemDefinition {
        ItemDefinition::new(ItemHandle(handle), format!("piece {handle}"), category)
            .with_armor(ArmorData::new(2, 0).in_set(SetId(1)))
    }

    fn catalog() -> Arc<ItemCatalog> {
        let items = vec![
            piece(1, ItemCategory::Helmet),
            piece(2, ItemCategory::Chestplate),
            piece(3, ItemCategory::Leggings),
            piece(4, ItemCategory::Boots),
        ];
        let set = ArmorSet::new(SetId(1), "Warden")
            .with_member(ItemHandle(1))
            .with_member(ItemHandle(2))
            .with_member(ItemHandle(3))
            .with_member(ItemHandle(4))
            .with_effect(
                SetEffect::new("two", 2)
                    .with_trait(TraitGrant::new("thorns"))
                    .with_modifier(StatModifier::flat(StatKind::Defense, 5)),
            )
            .with_effect(
                SetEffect::new("four", 4)
                    .with_enhancement(TraitEnhancement::new(
                        "thorns",
                        EnhancementKind::Multiply(200),
                    ))
                    .with_enhancement(TraitEnhancement::new("frenzy", EnhancementKind::Upgrade(1)))
                    .with_mechanic(SpecialMechanic::new("guardian_aura").with_param("radius", 4.0))
                    .with_mechanic(SpecialMechanic::new("unknown_mechanic")),
            );
        Arc::new(ItemCatalog::build(items, vec![set]).unwrap())
    }

    fn definition(catalog: &ItemCatalog, handle: u32) -> Arc<ItemDefinition> {
        catalog.item(ItemHandle(handle)).unwrap()
    }

    #[test]
    fn tiers_activate_and_deactivate_by_diff() {
        let catalog = catalog();
        let log: Log = Rc::default();
        let mut mechanics = MechanicRegistry::new();
        mechanics.register_for("guardian_aura", Box::new(Recorder(Rc::clone(&log))));
        let mut engine = SetBonusEngine::new(catalog.clone()).with_mechanics(mechanics);
        let mut stats = StatLedger::new();
        let mut traits = TraitBook::new();
        let thorns = TraitId::new("thorns");

        let first = engine
            .on_equipment_changed(&definition(&catalog, 1), true, &mut stats, &mut traits)
            .unwrap();
        assert!(first.is_quiet());

        let second = engine
            .on_equipment_changed(&definition(&catalog, 2), true, &mut stats, &mut traits)
            .unwrap();
        assert_eq!(second.activated, vec![0]);
        assert!(traits.has_trait(&thorns));
        assert_eq!(stats.value(StatKind::Defense, 0), 5);

        engine.on_equipment_changed(&definition(&catalog, 3), true, &mut stats, &mut traits);
        let fourth = engine
            .on_equipment_changed(&definition(&catalog, 4), true, &mut stats, &mut traits)
            .unwrap();
        assert_eq!(fourth.activated, vec![1]);
        assert_eq!(fourth.milestone, Some(SetMilestone::Completed));
        assert_eq!(
            fourth.skipped,
            vec![
                SkipReason::EnhancementTargetMissing {
                    tier: 1,
                    target: TraitId::new("frenzy"),
                },
                SkipReason::UnresolvedMechanic {
                    tier: 1,
                    mechanic: MechanicId::new("unknown_mechanic"),
                },
            ]
        );
        assert_eq!(traits.enhancement_count(&thorns), 1);
        assert_eq!(*log.borrow(), vec!["+guardian_aura".to_string()]);

        let broken = engine
            .on_equipment_changed(&definition(&catalog, 4), false, &mut stats, &mut traits)
            .unwrap();
        assert_eq!(broken.deactivated, vec![1]);
        assert_eq!(broken.milestone, Some(SetMilestone::Broken));
        assert_eq!(engine.active_tiers(SetId(1)), vec![0]);
        assert_eq!(traits.enhancement_count(&thorns), 0);
        assert!(traits.has_trait(&thorns));
        assert_eq!(
            *log.borrow(),
            vec!["+guardian_aura".to_string(), "-guardian_aura".to_string()]
        );
    }

    #[test]
    fn last_piece_removes_tracker_and_unwinds_everything() {
        let catalog = catalog();
        let mut engine = SetBonusEngine::new(catalog.clone());
        let mut stats = StatLedger::new();
        let mut traits = TraitBook::new();

        for handle in [1, 2] {
            engine.on_equipment_changed(&definition(&catalog, handle), true, &mut stats, &mut traits);
        }
        for handle in [2, 1] {
            engine.on_equipment_changed(&definition(&catalog, handle), false, &mut stats, &mut traits);
        }

        assert!(engine.tracker(SetId(1)).is_none());
        assert!(stats.is_empty());
        assert!(traits.is_empty());
        assert!(engine.get_equipped_set_effects(SetId(1)).is_empty());
    }

    #[test]
    fn items_outside_sets_are_ignored() {
        let catalog = catalog();
        let mut engine = SetBonusEngine::new(catalog);
        let plain = ItemDefinition::new(ItemHandle(9), "Cap", ItemCategory::Helmet)
            .with_armor(ArmorData::new(1, 0));
        let mut stats = StatLedger::new();
        let mut traits = TraitBook::new();

        assert!(
            engine
                .on_equipment_changed(&plain, true, &mut stats, &mut traits)
                .is_none()
        );
    }
}
