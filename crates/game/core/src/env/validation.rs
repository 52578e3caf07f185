//! Load-time schema checks for authored items and armor sets.
//!
//! Validation is constructive: it never fixes content up, it reports every
//! problem it finds so authors can correct the data in one pass.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{ErrorSeverity, GameError};

use super::{ArmorSet, ItemDefinition, ItemHandle, SetId};

/// A single problem found in authored content.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("item handle {0} is defined more than once")]
    DuplicateItem(ItemHandle),

    #[error("armor set {0} is defined more than once")]
    DuplicateSet(SetId),

    #[error("{item}: max_stack must be at least 1")]
    ZeroMaxStack { item: ItemHandle },

    #[error("{item}: unit weight must be a finite, non-negative number")]
    InvalidWeight { item: ItemHandle },

    #[error("{item}: max durability must be a finite, non-negative number")]
    InvalidDurability { item: ItemHandle },

    #[error("{item}: armor pieces must use an equipment category, not {category}")]
    ArmorNotEquipment { item: ItemHandle, category: String },

    #[error("{item}: armor pieces never stack (max_stack = {max_stack})")]
    StackableArmor { item: ItemHandle, max_stack: u32 },

    #[error("{item}: refers to unknown armor set {set}")]
    UnknownSet { item: ItemHandle, set: SetId },

    #[error("{set}: member {item} is not defined")]
    UnknownMember { set: SetId, item: ItemHandle },

    #[error("{set}: member {item} is not an armor piece")]
    MemberNotArmor { set: SetId, item: ItemHandle },

    #[error("{set}: member {item} belongs to {actual:?} instead")]
    MemberSetMismatch {
        set: SetId,
        item: ItemHandle,
        actual: Option<SetId>,
    },

    #[error("{set}: member {item} is listed more than once")]
    DuplicateMember { set: SetId, item: ItemHandle },

    #[error("{set}: tier {tier} requires zero pieces")]
    ZeroPiecesRequired { set: SetId, tier: usize },

    #[error("{set}: tier {tier} requires {required} pieces but the set has {members}")]
    TierUnreachable {
        set: SetId,
        tier: usize,
        required: u32,
        members: usize,
    },

    #[error("{set}: tiers {first} and {second} share the threshold {required}")]
    DuplicateThreshold {
        set: SetId,
        first: usize,
        second: usize,
        required: u32,
    },

    #[error("{set}: tier {tier} has a mechanic with an empty id")]
    EmptyMechanicId { set: SetId, tier: usize },
}

impl GameError for ValidationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        use ValidationError::*;
        match self {
            DuplicateItem(_) => "CONTENT_DUPLICATE_ITEM",
            DuplicateSet(_) => "CONTENT_DUPLICATE_SET",
            ZeroMaxStack { .. } => "CONTENT_ZERO_MAX_STACK",
            InvalidWeight { .. } => "CONTENT_INVALID_WEIGHT",
            InvalidDurability { .. } => "CONTENT_INVALID_DURABILITY",
            ArmorNotEquipment { .. } => "CONTENT_ARMOR_NOT_EQUIPMENT",
            StackableArmor { .. } => "CONTENT_STACKABLE_ARMOR",
            UnknownSet { .. } => "CONTENT_UNKNOWN_SET",
            UnknownMember { .. } => "CONTENT_UNKNOWN_MEMBER",
            MemberNotArmor { .. } => "CONTENT_MEMBER_NOT_ARMOR",
            MemberSetMismatch { .. } => "CONTENT_MEMBER_SET_MISMATCH",
            DuplicateMember { .. } => "CONTENT_DUPLICATE_MEMBER",
            ZeroPiecesRequired { .. } => "CONTENT_ZERO_PIECES_REQUIRED",
            TierUnreachable { .. } => "CONTENT_TIER_UNREACHABLE",
            DuplicateThreshold { .. } => "CONTENT_DUPLICATE_THRESHOLD",
            EmptyMechanicId { .. } => "CONTENT_EMPTY_MECHANIC_ID",
        }
    }
}

/// Checks items and sets against each other. Returns every problem found;
/// an empty list means the content is usable.
pub fn validate(items: &[ItemDefinition], sets: &[ArmorSet]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let mut by_handle: BTreeMap<ItemHandle, &ItemDefinition> = BTreeMap::new();
    for item in items {
        if by_handle.insert(item.handle, item).is_some() {
            errors.push(ValidationError::DuplicateItem(item.handle));
        }
    }

    let mut set_ids = BTreeSet::new();
    for set in sets {
        if !set_ids.insert(set.id) {
            errors.push(ValidationError::DuplicateSet(set.id));
        }
    }

    for item in items {
        validate_item(item, &set_ids, &mut errors);
    }
    for set in sets {
        validate_set(set, &by_handle, &mut errors);
    }

    errors
}

fn validate_item(item: &ItemDefinition, sets: &BTreeSet<SetId>, errors: &mut Vec<ValidationError>) {
    let handle = item.handle;
    if item.max_stack == 0 {
        errors.push(ValidationError::ZeroMaxStack { item: handle });
    }
    if !item.unit_weight.is_finite() || item.unit_weight < 0.0 {
        errors.push(ValidationError::InvalidWeight { item: handle });
    }
    if !item.max_durability.is_finite() || item.max_durability < 0.0 {
        errors.push(ValidationError::InvalidDurability { item: handle });
    }

    let Some(armor) = item.armor() else {
        return;
    };
    if !item.category.is_equipment() {
        errors.push(ValidationError::ArmorNotEquipment {
            item: handle,
            category: item.category.to_string(),
        });
    }
    if item.max_stack > 1 {
        errors.push(ValidationError::StackableArmor {
            item: handle,
            max_stack: item.max_stack,
        });
    }
    if let Some(set) = armor.set {
        if !sets.contains(&set) {
            errors.push(ValidationError::UnknownSet { item: handle, set });
        }
    }
}

fn validate_set(
    set: &ArmorSet,
    items: &BTreeMap<ItemHandle, &ItemDefinition>,
    errors: &mut Vec<ValidationError>,
) {
    let mut seen = BTreeSet::new();
    for &member in &set.members {
        if !seen.insert(member) {
            errors.push(ValidationError::DuplicateMember {
                set: set.id,
                item: member,
            });
            continue;
        }
        match items.get(&member) {
            None => errors.push(ValidationError::UnknownMember {
                set: set.id,
                item: member,
            }),
            Some(definition) => match definition.armor() {
                None => errors.push(ValidationError::MemberNotArmor {
                    set: set.id,
                    item: member,
                }),
                Some(armor) if armor.set != Some(set.id) => {
                    errors.push(ValidationError::MemberSetMismatch {
                        set: set.id,
                        item: member,
                        actual: armor.set,
                    })
                }
                Some(_) => {}
            },
        }
    }

    let mut thresholds: BTreeMap<u32, usize> = BTreeMap::new();
    for (tier, effect) in set.effects.iter().enumerate() {
        if effect.pieces_required == 0 {
            errors.push(ValidationError::ZeroPiecesRequired { set: set.id, tier });
        } else if effect.pieces_required as usize > seen.len() {
            errors.push(ValidationError::TierUnreachable {
                set: set.id,
                tier,
                required: effect.pieces_required,
                members: seen.len(),
            });
        }
        if let Some(&first) = thresholds.get(&effect.pieces_required) {
            errors.push(ValidationError::DuplicateThreshold {
                set: set.id,
                first,
                second: tier,
                required: effect.pieces_required,
            });
        } else {
            thresholds.insert(effect.pieces_required, tier);
        }
        if effect
            .mechanics
            .iter()
            .any(|mechanic| mechanic.id.as_str().trim().is_empty())
        {
            errors.push(ValidationError::EmptyMechanicId { set: set.id, tier });
        }
    }
}
