//! Equip and unequip side effects.
//!
//! A stack is equipped exactly while it sits in an equipment slot. Equipping
//! applies the item's stat modifiers, then the piece's own trait grants, then
//! notifies the set bonus engine; unequipping runs the same steps backwards.
//! Both operations are idempotent per stack.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::bonus::{SetBonusEngine, SetChange};
use crate::env::{ItemCategory, StatSink, TraitSink};
use crate::state::{ItemStack, SlotKind};

/// Applies equipment side effects and owns the set bonus engine.
#[derive(Debug)]
pub struct EquipmentResolver {
    bonuses: SetBonusEngine,
    changes: VecDeque<SetChange>,
}

impl EquipmentResolver {
    /// Undrained set changes kept before the oldest are discarded.
    pub const MAX_PENDING_CHANGES: usize = 256;

    pub fn new(bonuses: SetBonusEngine) -> Self {
        Self {
            bonuses,
            changes: VecDeque::new(),
        }
    }

    pub fn bonuses(&self) -> &SetBonusEngine {
        &self.bonuses
    }

    pub fn bonuses_mut(&mut self) -> &mut SetBonusEngine {
        &mut self.bonuses
    }

    /// Returns true if an item of `category` may sit in a slot of `kind`.
    pub fn is_compatible(kind: SlotKind, category: ItemCategory) -> bool {
        kind.accepts(category)
    }

    /// Marks `stack` equipped and applies its effects. Returns false (and does
    /// nothing) if it was already equipped.
    pub fn equip(
        &mut self,
        stack: &mut ItemStack,
        stats: &mut dyn StatSink,
        traits: &mut dyn TraitSink,
    ) -> bool {
        if !stack.set_equipped(true) {
            return false;
        }
        let definition = Arc::clone(stack.definition());

        for modifier in definition.equip_modifiers() {
            stats.apply(&modifier);
        }
        if let Some(armor) = definition.armor() {
            for grant in &armor.traits {
                traits.grant(grant);
            }
        }
        if let Some(change) = self
            .bonuses
            .on_equipment_changed(&definition, true, stats, traits)
        {
            self.record(change);
        }

        tracing::debug!(item = %definition.handle, name = %definition.name, "equipped");
        true
    }

    /// Marks `stack` unequipped and removes its effects. Returns false (and
    /// does nothing) if it was not equipped.
    pub fn unequip(
        &mut self,
        stack: &mut ItemStack,
        stats: &mut dyn StatSink,
        traits: &mut dyn TraitSink,
    ) -> bool {
        if !stack.set_equipped(false) {
            return false;
        }
        let definition = Arc::clone(stack.definition());

        if let Some(change) = self
            .bonuses
            .on_equipment_changed(&definition, false, stats, traits)
        {
            self.record(change);
        }
        if let Some(armor) = definition.armor() {
            for grant in armor.traits.iter().rev() {
                traits.revoke(grant);
            }
        }
        for modifier in definition.equip_modifiers().iter().rev() {
            stats.remove(modifier);
        }

        tracing::debug!(item = %definition.handle, name = %definition.name, "unequipped");
        true
    }

    /// Set changes recorded since the last drain, oldest first.
    pub fn drain_set_changes(&mut self) -> Vec<SetChange> {
        self.changes.drain(..).collect()
    }

    fn record(&mut self, change: SetChange) {
        if self.changes.len() == Self::MAX_PENDING_CHANGES {
            if let Some(dropped) = self.changes.pop_front() {
                tracing::warn!(set = %dropped.set, "set change buffer full; discarding oldest");
            }
        }
        self.changes.push_back(change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{ArmorData, ArmorSet, ItemCatalog, ItemDefinition, ItemHandle, SetEffect, SetId};
    use crate::stats::{StatKind, StatLedger, StatModifier};
    use crate::traits::{TraitBook, TraitGrant, TraitId};

    fn helmet() -> Arc<ItemDefinition> {
        Arc::new(
            ItemDefinition::new(ItemHandle(1), "Iron Helm", ItemCategory::Helmet)
                .with_modifier(StatModifier::flat(StatKind::MaxHealth, 10))
                .with_armor(ArmorData::new(3, 1).with_trait(TraitGrant::new("steady"))),
        )
    }

    fn resolver() -> EquipmentResolver {
        let catalog = Arc::new(ItemCatalog::default());
        EquipmentResolver::new(SetBonusEngine::new(catalog))
    }

    #[test]
    fn equip_twice_applies_once() {
        let mut resolver = resolver();
        let mut stack = ItemStack::fresh(helmet(), 1).unwrap();
        let mut stats = StatLedger::new();
        let mut traits = TraitBook::new();

        assert!(resolver.equip(&mut stack, &mut stats, &mut traits));
        assert!(!resolver.equip(&mut stack, &mut stats, &mut traits));

        assert!(stack.is_equipped());
        assert_eq!(stats.value(StatKind::Defense, 0), 3);
        assert_eq!(stats.value(StatKind::MagicDefense, 0), 1);
        assert_eq!(stats.modifier_count(StatKind::MaxHealth), 1);
        assert_eq!(traits.grant_count(&TraitId::new("steady")), 1);
    }

    #[test]
    fn unequip_restores_the_sheet() {
        let mut resolver = resolver();
        let mut stack = ItemStack::fresh(helmet(), 1).unwrap();
        let mut stats = StatLedger::new();
        let mut traits = TraitBook::new();

        assert!(!resolver.unequip(&mut stack, &mut stats, &mut traits));
        resolver.equip(&mut stack, &mut stats, &mut traits);
        assert!(resolver.unequip(&mut stack, &mut stats, &mut traits));

        assert!(!stack.is_equipped());
        assert!(stats.is_empty());
        assert!(traits.is_empty());
    }

    #[test]
    fn compatibility_follows_slot_kind() {
        assert!(EquipmentResolver::is_compatible(
            SlotKind::Common,
            ItemCategory::Helmet
        ));
        assert!(!EquipmentResolver::is_compatible(
            SlotKind::Equipment(ItemCategory::Chestplate),
            ItemCategory::Helmet
        ));
    }

    #[test]
    fn undrained_set_changes_are_bounded() {
        let piece = ItemDefinition::new(ItemHandle(7), "Circlet", ItemCategory::Helmet)
            .with_armor(ArmorData::new(1, 0).in_set(SetId(1)));
        let set = ArmorSet::new(SetId(1), "Solo")
            .with_member(ItemHandle(7))
            .with_effect(SetEffect::new("one", 1));
        let catalog = Arc::new(ItemCatalog::build(vec![piece.clone()], vec![set]).unwrap());
        let mut resolver = EquipmentResolver::new(SetBonusEngine::new(catalog));
        let mut stack = ItemStack::fresh(Arc::new(piece), 1).unwrap();
        let mut stats = StatLedger::new();
        let mut traits = TraitBook::new();

        for _ in 0..EquipmentResolver::MAX_PENDING_CHANGES {
            resolver.equip(&mut stack, &mut stats, &mut traits);
            resolver.unequip(&mut stack, &mut stats, &mut traits);
        }

        let changes = resolver.drain_set_changes();
        assert_eq!(changes.len(), EquipmentResolver::MAX_PENDING_CHANGES);
        // the newest change is kept
        assert_eq!(changes.last().map(|change| change.equipped_count), Some(0));
        assert!(resolver.drain_set_changes().is_empty());
    }
}
