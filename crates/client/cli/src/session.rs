//! Scripted inventory session.
//!
//! Replays a fixed sequence of player gestures against the loaded content and
//! logs what the engine reports after each one.
use anyhow::{Context, Result, bail};
use armory_core::{
    ArmorSetOracle, InventoryEngine, ItemHandle, ReleaseTarget, SlotId, StatKind, Tick,
    TransferOutcome,
};

use crate::host::Host;

pub struct Session<'a> {
    engine: &'a mut InventoryEngine,
    host: &'a mut Host,
    now: Tick,
}

impl<'a> Session<'a> {
    pub fn new(engine: &'a mut InventoryEngine, host: &'a mut Host) -> Self {
        Self {
            engine,
            host,
            now: Tick::ZERO,
        }
    }

    pub fn run(mut self) -> Result<()> {
        self.stock_up()?;
        self.wear_every_set()?;
        self.drink_potions()?;
        self.sort_storage()?;
        self.shrink_bag()?;
        self.report();
        Ok(())
    }

    fn stock_up(&mut self) -> Result<()> {
        for (name, quantity) in [("Healing Potion", 12), ("Bread", 30)] {
            let item = self.handle(name)?;
            let left = self.engine.add_item(item, quantity, &[])?;
            tracing::info!(name, quantity, left, "picked up");
        }
        Ok(())
    }

    /// Picks up every set piece in the catalog and drags it into a matching
    /// equipment slot.
    fn wear_every_set(&mut self) -> Result<()> {
        let catalog = std::sync::Arc::clone(self.engine.catalog());
        let pieces: Vec<_> = catalog
            .all_sets()
            .iter()
            .flat_map(|set| set.members.clone())
            .collect();

        for piece in pieces {
            if self.engine.add_item(piece, 1, &[])? > 0 {
                tracing::warn!(item = %piece, "no room for set piece");
                continue;
            }
            let Some(from) = self.storage_slot_of(piece) else {
                continue;
            };
            let Some(to) = self.equipment_slot_for(piece) else {
                tracing::warn!(item = %piece, "no equipment slot accepts this piece");
                continue;
            };
            let outcome = self.drag(from, ReleaseTarget::Slot(to))?;
            tracing::info!(item = %piece, ?outcome, "equip gesture");
        }

        for change in self.engine.drain_set_changes() {
            tracing::info!(
                set = %change.set,
                pieces = change.equipped_count,
                activated = ?change.activated,
                deactivated = ?change.deactivated,
                milestone = ?change.milestone,
                "set changed"
            );
            for skipped in &change.skipped {
                tracing::warn!(%skipped, "tier step skipped");
            }
        }
        Ok(())
    }

    fn drink_potions(&mut self) -> Result<()> {
        let potion = self.handle("Healing Potion")?;
        for _ in 0..4 {
            let Some(slot) = self.storage_slot_of(potion) else {
                break;
            };
            let outcome = self
                .engine
                .use_item(slot, self.now, &mut self.host.services())?;
            tracing::info!(tick = %self.now, ?outcome, "used potion");
            self.now = self.now + 2;
        }
        Ok(())
    }

    fn sort_storage(&mut self) -> Result<()> {
        let bread = self.handle("Bread")?;
        if let Some(slot) = self.storage_slot_of(bread) {
            let split = self.engine.split_stack(slot);
            tracing::info!(slot = %slot, split, "split bread");
            let moved = self.engine.quick_move(slot)?;
            tracing::info!(slot = %slot, moved, "quick moved bread");
        }
        Ok(())
    }

    /// Shrinks storage to the hotbar while holding a stack, forcing the drag
    /// to return and the overflow to drop.
    fn shrink_bag(&mut self) -> Result<()> {
        let hotbar = self.engine.inventory().hotbar_len();
        if let Some(first) = self.engine.inventory().storage_ids().next() {
            let holding = self.engine.begin_drag(first);
            tracing::debug!(slot = %first, holding, "holding a stack while resizing");
        }
        let report = self.engine.resize(hotbar, &mut self.host.services())?;
        tracing::info!(
            from = report.previous_storage,
            to = report.storage,
            redistributed = report.redistributed,
            dropped = report.dropped.len(),
            "resized storage"
        );
        Ok(())
    }

    fn report(&self) {
        for tracker in self.engine.bonuses().trackers() {
            let effects: Vec<String> = self
                .engine
                .get_equipped_set_effects(tracker.id())
                .into_iter()
                .map(|effect| effect.name)
                .collect();
            tracing::info!(
                set = %tracker.set().name,
                pieces = tracker.equipped_count(),
                ?effects,
                "set status"
            );
        }
        tracing::info!(
            defense = self.host.stats.value(StatKind::Defense, 0),
            max_health = self.host.stats.value(StatKind::MaxHealth, 100),
            traits = self.host.traits.len(),
            weight = self.engine.total_weight(),
            overweight = self.engine.is_overweight(),
            floor_piles = self.host.floor.piles.len(),
            consistent = self.engine.is_consistent(),
            "session finished"
        );
    }

    fn drag(&mut self, from: SlotId, to: ReleaseTarget) -> Result<TransferOutcome> {
        if !self.engine.begin_drag(from) {
            bail!("nothing to pick up in {from}");
        }
        Ok(self.engine.end_drag(to, &mut self.host.services())?)
    }

    fn handle(&self, name: &str) -> Result<ItemHandle> {
        self.engine
            .catalog()
            .find_by_name(name)
            .map(|definition| definition.handle)
            .with_context(|| format!("item `{name}` is not in the catalog"))
    }

    fn storage_slot_of(&self, item: ItemHandle) -> Option<SlotId> {
        let inventory = self.engine.inventory();
        inventory.storage_ids().find(|&slot| {
            inventory
                .stack_at(slot)
                .ok()
                .flatten()
                .is_some_and(|stack| stack.handle() == item)
        })
    }

    fn equipment_slot_for(&self, item: ItemHandle) -> Option<SlotId> {
        let category = self.engine.catalog().item(item).ok()?.category;
        let inventory = self.engine.inventory();
        inventory.equipment_ids().find(|&slot| {
            inventory
                .slot(slot)
                .is_ok_and(|slot| slot.is_empty() && slot.accepts(category))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use armory_core::{
        ArmorData, ArmorSet, InventoryConfig, ItemCatalog, ItemCategory, ItemDefinition,
        SetEffect, SetId, TraitGrant,
    };

    use super::*;

    fn catalog() -> ItemCatalog {
        let pair = SetId(1);
        ItemCatalog::build(
            vec![
                ItemDefinition::new(ItemHandle(1), "Healing Potion", ItemCategory::Potion)
                    .with_max_stack(5)
                    .with_unit_weight(0.5)
                    .with_cooldown(3),
                ItemDefinition::new(ItemHandle(2), "Bread", ItemCategory::Food)
                    .with_max_stack(10),
                ItemDefinition::new(ItemHandle(3), "Hood", ItemCategory::Helmet)
                    .with_armor(ArmorData::new(1, 0).in_set(pair)),
                ItemDefinition::new(ItemHandle(4), "Sandals", ItemCategory::Boots)
                    .with_armor(ArmorData::new(1, 0).in_set(pair)),
            ],
            vec![
                ArmorSet::new(pair, "Pilgrim")
                    .with_member(ItemHandle(3))
                    .with_member(ItemHandle(4))
                    .with_effect(SetEffect::new("pair", 2).with_trait(TraitGrant::new("wanderer"))),
            ],
        )
        .unwrap()
    }

    #[test]
    fn scripted_session_leaves_a_consistent_inventory() {
        let config = InventoryConfig {
            equipment: vec![ItemCategory::Helmet, ItemCategory::Boots],
            ..InventoryConfig::storage_only(2, 6)
        };
        let mut engine = InventoryEngine::new(config, Arc::new(catalog()));
        let mut host = Host::default();

        Session::new(&mut engine, &mut host).run().unwrap();

        assert!(engine.is_consistent());
        assert!(!engine.is_dragging());
        assert_eq!(engine.inventory().storage_len(), 2);
        assert_eq!(engine.active_tiers(SetId(1)), [0]);
        assert!(!host.floor.piles.is_empty());
    }
}
