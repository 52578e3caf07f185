use crate::env::ItemCategory;

/// Inventory layout and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InventoryConfig {
    /// Number of hotbar slots. The hotbar is never resized.
    pub hotbar_slots: u16,
    /// Initial number of general storage slots.
    pub general_slots: u16,
    /// Equipment slot constraints, in slot order. A category may repeat
    /// (two ring slots).
    pub equipment: Vec<ItemCategory>,
    /// Durability removed from the active unit per use.
    pub durability_per_use: f32,
    /// Fraction of a stack moved by a split action.
    pub split_ratio: f32,
    /// Tolerance used when checking cached stack weights.
    pub weight_tolerance: f32,
    /// Encumbrance limit; `None` means unlimited.
    pub max_carry_weight: Option<f32>,
}

impl InventoryConfig {
    // ===== compile-time constants =====
    /// Upper bound on addressable slots (slot ids are `u16`).
    pub const MAX_SLOTS: usize = u16::MAX as usize;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_HOTBAR_SLOTS: u16 = 9;
    pub const DEFAULT_GENERAL_SLOTS: u16 = 27;
    pub const DEFAULT_DURABILITY_PER_USE: f32 = 1.0;
    pub const DEFAULT_SPLIT_RATIO: f32 = 0.5;
    pub const DEFAULT_WEIGHT_TOLERANCE: f32 = 1e-3;

    pub fn new() -> Self {
        Self {
            hotbar_slots: Self::DEFAULT_HOTBAR_SLOTS,
            general_slots: Self::DEFAULT_GENERAL_SLOTS,
            equipment: Self::default_equipment(),
            durability_per_use: Self::DEFAULT_DURABILITY_PER_USE,
            split_ratio: Self::DEFAULT_SPLIT_RATIO,
            weight_tolerance: Self::DEFAULT_WEIGHT_TOLERANCE,
            max_carry_weight: None,
        }
    }

    /// Layout with no equipment slots, handy for storage-only containers.
    pub fn storage_only(hotbar_slots: u16, general_slots: u16) -> Self {
        Self {
            hotbar_slots,
            general_slots,
            equipment: Vec::new(),
            ..Self::new()
        }
    }

    pub fn with_max_carry_weight(mut self, limit: f32) -> Self {
        self.max_carry_weight = Some(limit);
        self
    }

    /// Total number of storage slots (hotbar + general).
    pub fn storage_slots(&self) -> usize {
        self.hotbar_slots as usize + self.general_slots as usize
    }

    fn default_equipment() -> Vec<ItemCategory> {
        use ItemCategory::*;
        vec![
            Helmet, Chestplate, Leggings, Boots, Gloves, Shield, Ring, Ring, Trinket, Cloak,
            Belt, Shoulders, Bracers, Amulet,
        ]
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self::new()
    }
}
