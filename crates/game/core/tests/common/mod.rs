#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use armory_core::{
    ArmorData, ArmorSet, EnhancementKind, InventoryConfig, InventoryEngine, ItemCatalog,
    ItemCategory, ItemDefinition, ItemHandle, MechanicHandler, MechanicId, MechanicParams,
    MechanicRegistry, ReleaseTarget, Services, SetEffect, SetId, SlotId, Spawner,
    SpecialMechanic, StatKind, StatLedger, StatModifier, TraitBook, TraitEnhancement, TraitGrant,
    TransferOutcome,
};

pub const POTION: ItemHandle = ItemHandle(1);
pub const BREAD: ItemHandle = ItemHandle(2);
pub const WARDEN_HELM: ItemHandle = ItemHandle(10);
pub const WARDEN_CUIRASS: ItemHandle = ItemHandle(11);
pub const WARDEN_GREAVES: ItemHandle = ItemHandle(12);
pub const WARDEN_BOOTS: ItemHandle = ItemHandle(13);
pub const IRON_HELM: ItemHandle = ItemHandle(20);

pub const WARDEN: SetId = SetId(1);

pub const HELMET_SLOT: SlotId = SlotId(0);
pub const CHEST_SLOT: SlotId = SlotId(1);
pub const LEGS_SLOT: SlotId = SlotId(2);
pub const BOOTS_SLOT: SlotId = SlotId(3);
pub const FIRST_HOTBAR: SlotId = SlotId(4);
pub const FIRST_GENERAL: SlotId = SlotId(7);

fn warden_piece(handle: ItemHandle, name: &str, category: ItemCategory, defense: i32) -> ItemDefinition {
    ItemDefinition::new(handle, name, category)
        .with_unit_weight(4.0)
        .with_max_durability(20.0)
        .with_armor(ArmorData::new(defense, 1).in_set(WARDEN))
}

pub fn items() -> Vec<ItemDefinition> {
    vec![
        ItemDefinition::new(POTION, "Healing Potion", ItemCategory::Potion)
            .with_max_stack(10)
            .with_unit_weight(0.5)
            .with_max_durability(1.0)
            .with_cooldown(3),
        ItemDefinition::new(BREAD, "Bread", ItemCategory::Food)
            .with_max_stack(20)
            .with_unit_weight(0.2),
        ItemDefinition::new(WARDEN_HELM, "Warden Helm", ItemCategory::Helmet)
            .with_unit_weight(3.0)
            .with_max_durability(20.0)
            .with_armor(
                ArmorData::new(4, 1)
                    .in_set(WARDEN)
                    .with_trait(TraitGrant::new("vigilance")),
            ),
        warden_piece(WARDEN_CUIRASS, "Warden Cuirass", ItemCategory::Chestplate, 8),
        warden_piece(WARDEN_GREAVES, "Warden Greaves", ItemCategory::Leggings, 6),
        warden_piece(WARDEN_BOOTS, "Warden Boots", ItemCategory::Boots, 3),
        ItemDefinition::new(IRON_HELM, "Iron Helm", ItemCategory::Helmet)
            .with_unit_weight(3.0)
            .with_armor(ArmorData::new(2, 0)),
    ]
}

pub fn warden_set() -> ArmorSet {
    ArmorSet::new(WARDEN, "Warden's Vigil")
        .with_member(WARDEN_HELM)
        .with_member(WARDEN_CUIRASS)
        .with_member(WARDEN_GREAVES)
        .with_member(WARDEN_BOOTS)
        .with_effect(
            SetEffect::new("two", 2)
                .with_trait(TraitGrant::new("thorns"))
                .with_modifier(StatModifier::flat(StatKind::MaxHealth, 20)),
        )
        .with_effect(
            SetEffect::new("four", 4)
                .with_enhancement(TraitEnhancement::new("thorns", EnhancementKind::Multiply(150)))
                .with_enhancement(TraitEnhancement::new("vigilance", EnhancementKind::Upgrade(1)))
                .with_modifier(StatModifier::increased(StatKind::Defense, 10))
                .with_mechanic(SpecialMechanic::new("guardian_aura").with_param("radius", 5.0))
                .with_mechanic(SpecialMechanic::new("aura_of_frost")),
        )
}

pub fn catalog() -> Arc<ItemCatalog> {
    Arc::new(ItemCatalog::build(items(), vec![warden_set()]).expect("fixture content is valid"))
}

/// Four equipment slots (helmet, chest, legs, boots), three hotbar slots and
/// four general slots.
pub fn config() -> InventoryConfig {
    InventoryConfig {
        equipment: vec![
            ItemCategory::Helmet,
            ItemCategory::Chestplate,
            ItemCategory::Leggings,
            ItemCategory::Boots,
        ],
        durability_per_use: 10.0,
        ..InventoryConfig::storage_only(3, 4)
    }
}

pub fn engine() -> InventoryEngine {
    InventoryEngine::new(config(), catalog())
}

pub type MechanicLog = Rc<RefCell<Vec<String>>>;

/// Mechanic handler that records activations. With a prefix it also claims
/// unbound mechanic ids starting with it.
pub struct RecordingMechanic {
    pub name: &'static str,
    pub prefix: Option<&'static str>,
    pub log: MechanicLog,
}

impl MechanicHandler for RecordingMechanic {
    fn name(&self) -> &str {
        self.name
    }

    fn can_handle(&self, id: &MechanicId) -> bool {
        self.prefix
            .is_some_and(|prefix| id.as_str().starts_with(prefix))
    }

    fn activate(&mut self, id: &MechanicId, params: &MechanicParams) {
        let radius = params.get("radius").copied().unwrap_or_default();
        self.log
            .borrow_mut()
            .push(format!("{}:+{id}:{radius}", self.name));
    }

    fn deactivate(&mut self, id: &MechanicId) {
        self.log.borrow_mut().push(format!("{}:-{id}", self.name));
    }
}

/// Registry with an exact handler for `guardian_aura` and a fallback handler
/// for every `aura_*` mechanic.
pub fn mechanics(log: &MechanicLog) -> MechanicRegistry {
    let mut registry = MechanicRegistry::new();
    registry.register_for(
        "guardian_aura",
        Box::new(RecordingMechanic {
            name: "guardian",
            prefix: None,
            log: Rc::clone(log),
        }),
    );
    registry.register(Box::new(RecordingMechanic {
        name: "auras",
        prefix: Some("aura_"),
        log: Rc::clone(log),
    }));
    registry
}

#[derive(Debug, Default)]
pub struct Floor {
    pub drops: Vec<(ItemHandle, u32, Vec<f32>)>,
}

impl Spawner for Floor {
    fn drop_into_world(&mut self, definition: &ItemDefinition, quantity: u32, durability: &[f32]) {
        self.drops
            .push((definition.handle, quantity, durability.to_vec()));
    }
}

/// The character and world the engine talks to.
#[derive(Debug, Default)]
pub struct Host {
    pub floor: Floor,
    pub stats: StatLedger,
    pub traits: TraitBook,
}

impl Host {
    pub fn services(&mut self) -> Services<'_> {
        Services::new(&mut self.floor, &mut self.stats, &mut self.traits)
    }
}

/// First storage slot holding `item`.
pub fn slot_of(engine: &InventoryEngine, item: ItemHandle) -> Option<SlotId> {
    let inventory = engine.inventory();
    inventory.storage_ids().find(|&slot| {
        inventory
            .stack_at(slot)
            .ok()
            .flatten()
            .is_some_and(|stack| stack.handle() == item)
    })
}

pub fn drag(
    engine: &mut InventoryEngine,
    host: &mut Host,
    from: SlotId,
    to: ReleaseTarget,
) -> TransferOutcome {
    assert!(engine.begin_drag(from), "nothing to pick up in {from}");
    engine
        .end_drag(to, &mut host.services())
        .expect("drag was active")
}

/// Adds one `item` and drags it into `slot`.
pub fn equip(engine: &mut InventoryEngine, host: &mut Host, item: ItemHandle, slot: SlotId) {
    assert_eq!(engine.add_item(item, 1, &[]).unwrap(), 0);
    let from = slot_of(engine, item).expect("item was added");
    assert_eq!(
        drag(engine, host, from, ReleaseTarget::Slot(slot)),
        TransferOutcome::Placed { slot }
    );
}

pub fn equip_warden(engine: &mut InventoryEngine, host: &mut Host) {
    equip(engine, host, WARDEN_HELM, HELMET_SLOT);
    equip(engine, host, WARDEN_CUIRASS, CHEST_SLOT);
    equip(engine, host, WARDEN_GREAVES, LEGS_SLOT);
    equip(engine, host, WARDEN_BOOTS, BOOTS_SLOT);
}
