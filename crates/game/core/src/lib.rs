//! Grid inventory, equipment and armor set bonus logic.
//!
//! `armory-core` is a pure, synchronous library: it owns slot storage, item
//! stacking, drag transfers, equip side effects and tiered armor set bonuses,
//! and reaches the outside world only through the collaborator traits in
//! [`env`] (`Spawner`, `StatSink`, `TraitSink`) and [`bonus::MechanicHandler`].
//! All mutation flows through [`engine::InventoryEngine`].
pub mod bonus;
pub mod config;
pub mod engine;
pub mod env;
pub mod equipment;
pub mod error;
pub mod state;
pub mod stats;
pub mod traits;
pub mod transfer;

pub use bonus::{
    ArmorSetTracker, HandlerId, MechanicHandler, MechanicRegistry, SetBonusEngine, SetChange,
    SetMilestone, SkipReason,
};
pub use config::InventoryConfig;
pub use engine::{InventoryEngine, InventoryError, UseOutcome};
pub use env::{
    ArmorData, ArmorSet, ArmorSetOracle, ItemCatalog, ItemCategory, ItemDefinition, ItemHandle,
    ItemKind, ItemOracle, MechanicId, MechanicParams, OracleError, Services, SetEffect, SetId,
    Spawner, SpecialMechanic, StatSink, TraitSink, ValidationError,
};
pub use equipment::EquipmentResolver;
pub use error::{ErrorSeverity, GameError};
pub use state::{
    CooldownTracker, DurabilityOutcome, FillResult, InventoryState, ItemStack, ResizeReport, Slot,
    SlotFilter, SlotId, SlotKind, SlotRegion, SlotRegions, StackError, StackId, StackPool,
    StateError, Tick,
};
pub use stats::{Bonus, BonusStack, StatKind, StatLedger, StatModifier};
pub use traits::{EnhancementKind, TraitBook, TraitEnhancement, TraitGrant, TraitId};
pub use transfer::{ReleaseTarget, TransferError, TransferOutcome, TransferState};
