mod common;

use std::rc::Rc;

use armory_core::{
    GameError, ReleaseTarget, SetMilestone, SkipReason, StatKind, TraitId, TransferOutcome,
};
use common::*;

fn effect_names(engine: &armory_core::InventoryEngine) -> Vec<String> {
    engine
        .get_equipped_set_effects(WARDEN)
        .into_iter()
        .map(|effect| effect.name)
        .collect()
}

#[test]
fn full_set_applies_every_tier_and_mechanic() {
    let log = MechanicLog::default();
    let mut engine = engine().with_mechanics(mechanics(&log));
    let mut host = Host::default();

    equip_warden(&mut engine, &mut host);

    assert_eq!(engine.equipped_count(WARDEN), 4);
    assert_eq!(effect_names(&engine), ["two", "four"]);
    assert_eq!(
        *log.borrow(),
        ["guardian:+guardian_aura:5", "auras:+aura_of_frost:0"]
    );

    let thorns = host.traits.view(&TraitId::new("thorns")).unwrap();
    assert_eq!(thorns.multiplier, 150);
    let vigilance = host.traits.view(&TraitId::new("vigilance")).unwrap();
    assert_eq!(vigilance.level, 2);

    // 4 + 8 + 6 + 3 flat, then +10%.
    assert_eq!(host.stats.value(StatKind::Defense, 0), 23);
    assert_eq!(host.stats.value(StatKind::MaxHealth, 100), 120);
}

#[test]
fn breaking_the_set_unwinds_the_top_tier_in_reverse() {
    let log = MechanicLog::default();
    let mut engine = engine().with_mechanics(mechanics(&log));
    let mut host = Host::default();
    equip_warden(&mut engine, &mut host);
    engine.drain_set_changes();
    log.borrow_mut().clear();

    let outcome = drag(&mut engine, &mut host, BOOTS_SLOT, ReleaseTarget::Slot(FIRST_HOTBAR));
    assert_eq!(outcome, TransferOutcome::Placed { slot: FIRST_HOTBAR });

    assert_eq!(
        *log.borrow(),
        ["auras:-aura_of_frost", "guardian:-guardian_aura"]
    );
    assert_eq!(effect_names(&engine), ["two"]);

    let thorns = host.traits.view(&TraitId::new("thorns")).unwrap();
    assert_eq!(thorns.multiplier, 100);
    assert_eq!(host.traits.enhancement_count(&TraitId::new("vigilance")), 0);
    assert_eq!(host.stats.value(StatKind::Defense, 0), 18);

    let changes = engine.drain_set_changes();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].previous_count, 4);
    assert_eq!(changes[0].equipped_count, 3);
    assert_eq!(changes[0].deactivated, [1]);
    assert!(changes[0].activated.is_empty());
    assert_eq!(changes[0].milestone, Some(SetMilestone::Broken));
}

#[test]
fn changes_report_milestones_in_order() {
    let mut engine = engine();
    let mut host = Host::default();
    equip_warden(&mut engine, &mut host);

    let changes = engine.drain_set_changes();
    let counts: Vec<_> = changes.iter().map(|change| change.equipped_count).collect();
    assert_eq!(counts, [1, 2, 3, 4]);
    assert_eq!(changes[1].activated, [0]);
    assert!(changes[2].is_quiet());
    assert_eq!(changes[3].activated, [1]);

    let milestones: Vec<_> = changes.iter().filter_map(|change| change.milestone).collect();
    assert_eq!(milestones, [SetMilestone::Completed]);
    assert!(engine.drain_set_changes().is_empty());
}

#[test]
fn unresolved_mechanics_are_skipped_without_aborting_the_tier() {
    let mut engine = engine();
    let mut host = Host::default();
    equip_warden(&mut engine, &mut host);

    let changes = engine.drain_set_changes();
    let skipped = &changes[3].skipped;
    assert_eq!(skipped.len(), 2);
    assert!(skipped.iter().all(|skip| skip.tier() == 1));
    assert!(matches!(
        &skipped[0],
        SkipReason::UnresolvedMechanic { mechanic, .. } if mechanic.as_str() == "guardian_aura"
    ));
    assert_eq!(skipped[0].error_code(), "BONUS_UNRESOLVED_MECHANIC");

    // The rest of the tier still applied.
    assert_eq!(engine.active_tiers(WARDEN), [0, 1]);
    assert_eq!(host.traits.enhancement_count(&TraitId::new("thorns")), 1);
    assert_eq!(host.stats.value(StatKind::Defense, 0), 23);
}

#[test]
fn mechanics_registered_after_construction_are_used() {
    let log = MechanicLog::default();
    let mut engine = engine();
    engine.mechanics_mut().register_for(
        "guardian_aura",
        Box::new(RecordingMechanic {
            name: "late",
            prefix: None,
            log: Rc::clone(&log),
        }),
    );
    let mut host = Host::default();
    equip_warden(&mut engine, &mut host);

    assert_eq!(*log.borrow(), ["late:+guardian_aura:5"]);
    let changes = engine.drain_set_changes();
    assert_eq!(changes[3].skipped.len(), 1);
}

#[test]
fn stripping_every_piece_leaves_a_clean_sheet() {
    let log = MechanicLog::default();
    let mut engine = engine().with_mechanics(mechanics(&log));
    let mut host = Host::default();
    equip_warden(&mut engine, &mut host);

    for slot in [HELMET_SLOT, CHEST_SLOT, LEGS_SLOT, BOOTS_SLOT] {
        drag(&mut engine, &mut host, slot, ReleaseTarget::DropZone);
    }

    assert!(host.stats.is_empty());
    assert!(host.traits.is_empty());
    assert_eq!(engine.equipped_count(WARDEN), 0);
    assert!(effect_names(&engine).is_empty());
    assert_eq!(log.borrow().len(), 4);
    assert!(engine.is_consistent());
}
