//! Numeric stat deltas exchanged with the host's character sheet.
//!
//! Equipment and set tiers never mutate a character directly: they hand
//! [`StatModifier`]s to a [`StatSink`](crate::env::StatSink). The bonus
//! vocabulary follows the layered stack `Flat → %Inc → More → Less → Clamp`,
//! and [`StatLedger`] is a reference sink that folds modifiers in that order.

pub mod bonus;
pub mod ledger;

pub use bonus::{Bonus, BonusStack, StatBounds};
pub use ledger::StatLedger;

/// Character stats that items and set tiers can modify.
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
pub enum StatKind {
    Defense,
    MagicDefense,
    MaxHealth,
    MaxMana,
    MaxStamina,
    Strength,
    Dexterity,
    Intelligence,
    AttackPower,
    SpellPower,
    CritChance,
    MoveSpeed,
    CarryCapacity,
}

/// A single stat delta: which stat, and how it is modified.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatModifier {
    pub stat: StatKind,
    pub bonus: Bonus,
}

impl StatModifier {
    pub fn new(stat: StatKind, bonus: Bonus) -> Self {
        Self { stat, bonus }
    }

    pub fn flat(stat: StatKind, value: i32) -> Self {
        Self::new(stat, Bonus::Flat(value))
    }

    pub fn increased(stat: StatKind, percent: i32) -> Self {
        Self::new(stat, Bonus::Increased(percent))
    }
}
