use bitflags::bitflags;

use crate::env::ItemCategory;

use super::StackId;

/// Type constraint of a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotKind {
    /// Accepts any item.
    Common,
    /// Accepts only items of one equipment category.
    Equipment(ItemCategory),
}

impl SlotKind {
    /// Returns true if an item of `category` may sit in a slot of this kind.
    pub fn accepts(self, category: ItemCategory) -> bool {
        match self {
            SlotKind::Common => true,
            SlotKind::Equipment(constraint) => constraint == category,
        }
    }

    pub fn is_equipment(self) -> bool {
        matches!(self, SlotKind::Equipment(_))
    }
}

/// Region of the inventory a slot belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SlotRegion {
    Equipment,
    Hotbar,
    General,
}

impl SlotRegion {
    pub fn flag(self) -> SlotRegions {
        match self {
            SlotRegion::Equipment => SlotRegions::EQUIPMENT,
            SlotRegion::Hotbar => SlotRegions::HOTBAR,
            SlotRegion::General => SlotRegions::GENERAL,
        }
    }
}

bitflags! {
    /// Set of regions a slot search may visit.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct SlotRegions: u8 {
        const EQUIPMENT = 1 << 0;
        const HOTBAR    = 1 << 1;
        const GENERAL   = 1 << 2;

        /// Hotbar and general storage.
        const STORAGE = Self::HOTBAR.bits() | Self::GENERAL.bits();
        const ALL     = Self::EQUIPMENT.bits() | Self::STORAGE.bits();
    }
}

/// Filter for slot searches: the regions to visit and, optionally, an item
/// category the slot must accept.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotFilter {
    pub regions: SlotRegions,
    pub accepts: Option<ItemCategory>,
}

impl SlotFilter {
    pub const STORAGE: Self = Self {
        regions: SlotRegions::STORAGE,
        accepts: None,
    };

    pub fn regions(regions: SlotRegions) -> Self {
        Self {
            regions,
            accepts: None,
        }
    }

    /// Equipment slots that accept `category`.
    pub fn equipment_for(category: ItemCategory) -> Self {
        Self {
            regions: SlotRegions::EQUIPMENT,
            accepts: Some(category),
        }
    }

    pub fn accepting(mut self, category: ItemCategory) -> Self {
        self.accepts = Some(category);
        self
    }

    pub fn matches(&self, slot: &Slot) -> bool {
        self.regions.contains(slot.region.flag())
            && self.accepts.is_none_or(|category| slot.accepts(category))
    }
}

impl Default for SlotFilter {
    fn default() -> Self {
        Self::STORAGE
    }
}

/// A single storage cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slot {
    kind: SlotKind,
    region: SlotRegion,
    stack: Option<StackId>,
}

impl Slot {
    pub(crate) fn common(region: SlotRegion) -> Self {
        Self {
            kind: SlotKind::Common,
            region,
            stack: None,
        }
    }

    pub(crate) fn equipment(category: ItemCategory) -> Self {
        Self {
            kind: SlotKind::Equipment(category),
            region: SlotRegion::Equipment,
            stack: None,
        }
    }

    pub fn kind(&self) -> SlotKind {
        self.kind
    }

    pub fn region(&self) -> SlotRegion {
        self.region
    }

    pub fn stack(&self) -> Option<StackId> {
        self.stack
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_none()
    }

    pub fn is_equipment(&self) -> bool {
        self.kind.is_equipment()
    }

    pub fn is_storage(&self) -> bool {
        !self.is_equipment()
    }

    pub fn accepts(&self, category: ItemCategory) -> bool {
        self.kind.accepts(category)
    }

    pub(crate) fn put(&mut self, stack: StackId) -> Option<StackId> {
        self.stack.replace(stack)
    }

    pub(crate) fn take(&mut self) -> Option<StackId> {
        self.stack.take()
    }
}
