mod common;

use armory_core::{ReleaseTarget, SlotId, StatKind, TransferOutcome};
use common::*;

#[test]
fn split_then_fill_restores_the_stack() {
    let mut engine = engine();
    let durability = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7];
    engine.add_item(POTION, 7, &durability).unwrap();
    let mut host = Host::default();

    assert!(engine.split_stack(FIRST_HOTBAR));
    let split_slot = SlotId(5);
    assert_eq!(engine.stack(split_slot).unwrap().unwrap().durability(), &[0.5, 0.6, 0.7]);
    assert!(engine.is_consistent());

    let outcome = drag(&mut engine, &mut host, split_slot, ReleaseTarget::Slot(FIRST_HOTBAR));

    assert_eq!(
        outcome,
        TransferOutcome::Filled {
            slot: FIRST_HOTBAR,
            moved: 3,
            remainder: 0
        }
    );
    let stack = engine.stack(FIRST_HOTBAR).unwrap().unwrap();
    let mut restored = stack.durability().to_vec();
    restored.sort_by(f32::total_cmp);
    assert_eq!(restored, durability);
    assert!(engine.stack(split_slot).unwrap().is_none());
    assert_eq!(engine.inventory().pool().len(), 1);
}

#[test]
fn equip_side_effects_apply_once_across_drags() {
    let mut engine = engine();
    let mut host = Host::default();
    equip(&mut engine, &mut host, IRON_HELM, HELMET_SLOT);
    assert_eq!(host.stats.value(StatKind::Defense, 0), 2);

    // Released over its own slot and over nothing: both return it.
    let outcome = drag(&mut engine, &mut host, HELMET_SLOT, ReleaseTarget::Slot(HELMET_SLOT));
    assert_eq!(outcome, TransferOutcome::Returned { slot: HELMET_SLOT });
    let outcome = drag(&mut engine, &mut host, HELMET_SLOT, ReleaseTarget::Nowhere);
    assert_eq!(outcome, TransferOutcome::Returned { slot: HELMET_SLOT });

    assert_eq!(host.stats.value(StatKind::Defense, 0), 2);
    assert_eq!(host.stats.modifier_count(StatKind::Defense), 1);
    assert!(engine.stack(HELMET_SLOT).unwrap().unwrap().is_equipped());
}

#[test]
fn carried_equipment_stays_equipped_until_it_settles() {
    let mut engine = engine();
    let mut host = Host::default();
    equip(&mut engine, &mut host, IRON_HELM, HELMET_SLOT);

    assert!(engine.begin_drag(HELMET_SLOT));
    assert!(engine.carried().is_some_and(|stack| stack.is_equipped()));
    assert_eq!(host.stats.value(StatKind::Defense, 0), 2);

    engine
        .end_drag(ReleaseTarget::Slot(FIRST_HOTBAR), &mut host.services())
        .unwrap();
    assert!(!engine.stack(FIRST_HOTBAR).unwrap().unwrap().is_equipped());
    assert!(host.stats.is_empty());
}

#[test]
fn tier_activation_is_monotonic_in_piece_count() {
    let mut engine = engine();
    let mut host = Host::default();
    let set = warden_set();

    let check = |engine: &armory_core::InventoryEngine| {
        let count = engine.equipped_count(WARDEN);
        let active = engine.active_tiers(WARDEN);
        for (tier, effect) in set.effects.iter().enumerate() {
            assert_eq!(
                active.contains(&tier),
                count >= effect.pieces_required,
                "tier {tier} at {count} pieces"
            );
        }
    };

    let pieces = [
        (WARDEN_BOOTS, BOOTS_SLOT),
        (WARDEN_HELM, HELMET_SLOT),
        (WARDEN_GREAVES, LEGS_SLOT),
        (WARDEN_CUIRASS, CHEST_SLOT),
    ];
    for (item, slot) in pieces {
        equip(&mut engine, &mut host, item, slot);
        check(&engine);
    }
    for (_, slot) in pieces.iter().rev() {
        drag(&mut engine, &mut host, *slot, ReleaseTarget::DropZone);
        check(&engine);
    }

    assert_eq!(host.floor.drops.len(), 4);
    assert!(engine.bonuses().tracker(WARDEN).is_none());
    assert!(host.stats.is_empty());
    assert!(host.traits.is_empty());
}

#[test]
fn mixed_session_keeps_every_invariant() {
    let mut engine = engine();
    let mut host = Host::default();

    engine.add_item(POTION, 13, &[0.9; 13]).unwrap();
    engine.add_item(BREAD, 25, &[]).unwrap();
    assert!(engine.is_consistent());

    equip(&mut engine, &mut host, WARDEN_HELM, HELMET_SLOT);
    equip(&mut engine, &mut host, WARDEN_CUIRASS, CHEST_SLOT);
    assert!(engine.is_consistent());

    let bread = slot_of(&engine, BREAD).unwrap();
    assert!(engine.split_stack(bread));
    assert!(engine.is_consistent());

    engine.remove_quantity(POTION, 4);
    engine.remove_quantity(BREAD, 12);
    assert!(engine.is_consistent());

    let potion = slot_of(&engine, POTION).unwrap();
    drag(&mut engine, &mut host, potion, ReleaseTarget::Slot(CHEST_SLOT));
    drag(&mut engine, &mut host, CHEST_SLOT, ReleaseTarget::Slot(potion));
    assert!(engine.is_consistent());

    let report = engine.resize(3, &mut host.services()).unwrap();
    assert!(engine.is_consistent());
    assert_eq!(engine.inventory().storage_len(), 3);

    let dropped: u32 = report.dropped.iter().map(|(_, quantity)| quantity).sum();
    let held = engine.count_of(POTION) + engine.count_of(BREAD);
    assert_eq!(held + dropped, 9 + 13);
    assert_eq!(engine.equipped_count(WARDEN), 2);
    assert!(engine.stack(CHEST_SLOT).unwrap().unwrap().is_equipped());
}
