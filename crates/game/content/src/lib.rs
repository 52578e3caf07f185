//! Data-driven content for the inventory engine.
//!
//! This crate provides loaders for RON/TOML data files:
//! - Item definitions (data-driven via RON)
//! - Armor sets and their tiers (data-driven via RON)
//! - Inventory layout and tunables (data-driven via TOML)
//!
//! Content is validated once at load time and handed to the engine as an
//! immutable [`armory_core::ItemCatalog`]; it never appears in runtime state.
//!
//! All loaders use armory-core types directly with serde for RON/TOML deserialization.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ArmorSetLoader, ConfigLoader, ContentFactory, ItemLoader, LoadResult};
