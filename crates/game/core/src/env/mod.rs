//! Authored data and collaborator interfaces.
//!
//! Oracles expose immutable item definitions and armor sets; sinks are the
//! narrow outward interfaces (spawning, stats, traits) the core calls into.
//! Nothing here owns runtime inventory state.
mod catalog;
mod error;
mod items;
mod sets;
mod sinks;
mod validation;

pub use catalog::ItemCatalog;
pub use error::OracleError;
pub use items::{ArmorData, ItemCategory, ItemDefinition, ItemHandle, ItemKind, ItemOracle};
pub use sets::{
    ArmorSet, ArmorSetOracle, MechanicId, MechanicParams, SetEffect, SetId, SpecialMechanic,
};
pub use sinks::{Services, Spawner, StatSink, TraitSink};
pub use validation::{ValidationError, validate};
