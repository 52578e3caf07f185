use std::sync::Arc;

use crate::stats::{StatKind, StatModifier};
use crate::traits::TraitGrant;

use super::SetId;

pub trait ItemOracle: Send + Sync {
    fn definition(&self, handle: ItemHandle) -> Option<Arc<ItemDefinition>>;

    /// Returns all item definitions available in this oracle, in handle order.
    fn all_definitions(&self) -> Vec<Arc<ItemDefinition>>;
}

/// Reference to an item definition stored outside the inventory (lookup via oracle).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ItemHandle(pub u32);

impl core::fmt::Display for ItemHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// Broad item category. Equipment categories double as slot constraints.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ItemCategory {
    Common,
    Potion,
    Food,
    Helmet,
    Chestplate,
    Leggings,
    Boots,
    Gloves,
    Shield,
    Ring,
    Trinket,
    Cloak,
    Belt,
    Shoulders,
    Bracers,
    Amulet,
}

impl ItemCategory {
    /// Returns true for categories that can only sit in a matching equipment slot.
    pub const fn is_equipment(self) -> bool {
        !matches!(self, Self::Common | Self::Potion | Self::Food)
    }

    /// Returns true for categories consumed one unit per use.
    pub const fn is_consumable(self) -> bool {
        matches!(self, Self::Potion | Self::Food)
    }
}

/// Item definition with common fields and type-specific data.
///
/// # Design: Base + Kind Pattern
///
/// - Base struct holds common fields (handle, category, stacking, weight)
/// - `kind` enum holds type-specific data (armor stats, set membership)
///
/// Definitions are immutable authored data shared behind `Arc` by every stack
/// that refers to them.
///
/// # Stacking
///
/// - Armor: `max_stack = 1` (never stacks, enforced by validation)
/// - Consumables and materials: any `max_stack >= 1`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDefinition {
    pub handle: ItemHandle,
    pub name: String,
    pub category: ItemCategory,
    pub max_stack: u32,
    /// Weight of a single unit.
    pub unit_weight: f32,
    /// Durability of a fresh unit. Zero means the item does not wear.
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_durability: f32,
    /// Cooldown in ticks applied after using one unit.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown: u64,
    /// Stat deltas applied while the item is equipped.
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: Vec<StatModifier>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind: ItemKind,
}

impl ItemDefinition {
    pub fn new(handle: ItemHandle, name: impl Into<String>, category: ItemCategory) -> Self {
        Self {
            handle,
            name: name.into(),
            category,
            max_stack: 1,
            unit_weight: 0.0,
            max_durability: 0.0,
            cooldown: 0,
            modifiers: Vec::new(),
            kind: ItemKind::Basic,
        }
    }

    pub fn with_max_stack(mut self, max_stack: u32) -> Self {
        self.max_stack = max_stack;
        self
    }

    pub fn with_unit_weight(mut self, unit_weight: f32) -> Self {
        self.unit_weight = unit_weight;
        self
    }

    pub fn with_max_durability(mut self, max_durability: f32) -> Self {
        self.max_durability = max_durability;
        self
    }

    pub fn with_cooldown(mut self, cooldown: u64) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_modifier(mut self, modifier: StatModifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn with_armor(mut self, armor: ArmorData) -> Self {
        self.kind = ItemKind::Armor(armor);
        self
    }

    pub fn is_stackable(&self) -> bool {
        self.max_stack > 1
    }

    pub fn wears(&self) -> bool {
        self.max_durability > 0.0
    }

    pub fn armor(&self) -> Option<&ArmorData> {
        match &self.kind {
            ItemKind::Armor(data) => Some(data),
            ItemKind::Basic => None,
        }
    }

    /// Armor set this item belongs to, if it is a set piece.
    pub fn set(&self) -> Option<SetId> {
        self.armor().and_then(|armor| armor.set)
    }

    /// Every stat delta the item contributes while equipped: armor values first,
    /// then the authored modifiers.
    pub fn equip_modifiers(&self) -> Vec<StatModifier> {
        let mut modifiers = Vec::with_capacity(self.modifiers.len() + 2);
        if let Some(armor) = self.armor() {
            if armor.defense != 0 {
                modifiers.push(StatModifier::flat(StatKind::Defense, armor.defense));
            }
            if armor.magic_defense != 0 {
                modifiers.push(StatModifier::flat(
                    StatKind::MagicDefense,
                    armor.magic_defense,
                ));
            }
        }
        modifiers.extend(self.modifiers.iter().cloned());
        modifiers
    }
}

/// Item type with type-specific data.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemKind {
    /// Plain item: materials, consumables, trinkets without armor values.
    #[default]
    Basic,

    /// Armor piece that occupies an equipment slot of its category.
    Armor(ArmorData),
}

/// Armor-specific data.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArmorData {
    pub defense: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub magic_defense: i32,
    /// Armor set this piece counts towards.
    #[cfg_attr(feature = "serde", serde(default))]
    pub set: Option<SetId>,
    /// Traits granted by the piece itself, independent of any set bonus.
    #[cfg_attr(feature = "serde", serde(default))]
    pub traits: Vec<TraitGrant>,
}

impl ArmorData {
    pub fn new(defense: i32, magic_defense: i32) -> Self {
        Self {
            defense,
            magic_defense,
            set: None,
            traits: Vec::new(),
        }
    }

    pub fn in_set(mut self, set: SetId) -> Self {
        self.set = Some(set);
        self
    }

    pub fn with_trait(mut self, grant: TraitGrant) -> Self {
        self.traits.push(grant);
        self
    }
}
