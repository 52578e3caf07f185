use std::collections::BTreeMap;
use std::sync::Arc;

use crate::stats::StatModifier;
use crate::traits::{TraitEnhancement, TraitGrant};

use super::ItemHandle;

pub trait ArmorSetOracle: Send + Sync {
    fn set(&self, id: SetId) -> Option<Arc<ArmorSet>>;

    /// Returns all armor sets available in this oracle, in id order.
    fn all_sets(&self) -> Vec<Arc<ArmorSet>>;
}

/// Identifier of an armor set definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SetId(pub u32);

impl core::fmt::Display for SetId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "set#{}", self.0)
    }
}

/// Name of a special mechanic (e.g. `"lifesteal_aura"`), resolved at runtime
/// against the registered mechanic handlers.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MechanicId(pub String);

impl MechanicId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for MechanicId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Named numeric parameters handed to a mechanic handler on activation.
pub type MechanicParams = BTreeMap<String, f32>;

/// A parameterized special ability unlocked by a set tier.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpecialMechanic {
    pub id: MechanicId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub params: MechanicParams,
}

impl SpecialMechanic {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: MechanicId::new(id),
            params: MechanicParams::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: f32) -> Self {
        self.params.insert(key.into(), value);
        self
    }
}

/// One tier of an armor set: bonuses unlocked at `pieces_required` pieces.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetEffect {
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    pub pieces_required: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub traits: Vec<TraitGrant>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub enhancements: Vec<TraitEnhancement>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: Vec<StatModifier>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mechanics: Vec<SpecialMechanic>,
}

impl SetEffect {
    pub fn new(name: impl Into<String>, pieces_required: u32) -> Self {
        Self {
            name: name.into(),
            pieces_required,
            traits: Vec::new(),
            enhancements: Vec::new(),
            modifiers: Vec::new(),
            mechanics: Vec::new(),
        }
    }

    pub fn with_trait(mut self, grant: TraitGrant) -> Self {
        self.traits.push(grant);
        self
    }

    pub fn with_enhancement(mut self, enhancement: TraitEnhancement) -> Self {
        self.enhancements.push(enhancement);
        self
    }

    pub fn with_modifier(mut self, modifier: StatModifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn with_mechanic(mut self, mechanic: SpecialMechanic) -> Self {
        self.mechanics.push(mechanic);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.traits.is_empty()
            && self.enhancements.is_empty()
            && self.modifiers.is_empty()
            && self.mechanics.is_empty()
    }
}

/// Armor set definition: member pieces and tiered effects.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArmorSet {
    pub id: SetId,
    pub name: String,
    pub members: Vec<ItemHandle>,
    pub effects: Vec<SetEffect>,
}

impl ArmorSet {
    pub fn new(id: SetId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            members: Vec::new(),
            effects: Vec::new(),
        }
    }

    pub fn with_member(mut self, handle: ItemHandle) -> Self {
        self.members.push(handle);
        self
    }

    pub fn with_effect(mut self, effect: SetEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn is_member(&self, handle: ItemHandle) -> bool {
        self.members.contains(&handle)
    }

    /// Piece count at which the set counts as complete: the highest tier
    /// threshold, or every member when the set has no tiers.
    pub fn completion_threshold(&self) -> u32 {
        self.effects
            .iter()
            .map(|effect| effect.pieces_required)
            .max()
            .unwrap_or(self.members.len() as u32)
    }

    /// Indices of the tiers unlocked at `equipped` pieces, in activation order
    /// (ascending threshold, then authored order).
    pub fn tiers_at(&self, equipped: u32) -> Vec<usize> {
        let mut tiers: Vec<usize> = self
            .effects
            .iter()
            .enumerate()
            .filter(|(_, effect)| effect.pieces_required <= equipped)
            .map(|(index, _)| index)
            .collect();
        tiers.sort_by_key(|&index| (self.effects[index].pieces_required, index));
        tiers
    }
}
