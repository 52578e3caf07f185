//! Passive traits granted by armor pieces and set tiers.
//!
//! A trait is a named passive ability owned by the host. The core only grants,
//! revokes, and enhances traits through a [`TraitSink`]; [`TraitBook`] is the
//! in-memory reference sink.
//!
//! Enhancements modify a trait that is already granted instead of granting a
//! new one, so they are only meaningful while their target is present.

use std::collections::BTreeMap;

use crate::env::TraitSink;

/// Name of a passive trait (e.g. `"thorns"`, `"fire_resistance"`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TraitId(pub String);

impl TraitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for TraitId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Grants a trait at a starting level.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraitGrant {
    pub id: TraitId,
    #[cfg_attr(feature = "serde", serde(default = "default_level"))]
    pub level: u8,
}

#[cfg(feature = "serde")]
fn default_level() -> u8 {
    1
}

impl TraitGrant {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: TraitId::new(id),
            level: 1,
        }
    }

    pub fn at_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }
}

/// How an enhancement changes its target trait.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EnhancementKind {
    /// Scales the trait's magnitude, in percent (150 = ×1.5).
    Multiply(u32),
    /// Attaches additional named effects to the trait.
    AddEffects(Vec<String>),
    /// Swaps the trait for a stronger variant while the enhancement lasts.
    Replace(TraitId),
    /// Raises the trait's level.
    Upgrade(u8),
}

/// Modification of an already granted trait.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraitEnhancement {
    pub target: TraitId,
    pub kind: EnhancementKind,
}

impl TraitEnhancement {
    pub fn new(target: impl Into<String>, kind: EnhancementKind) -> Self {
        Self {
            target: TraitId::new(target),
            kind,
        }
    }
}

/// Effective shape of a granted trait after all enhancements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraitView {
    pub id: TraitId,
    pub level: u8,
    /// Combined magnitude multiplier in percent (100 = unchanged), saturating
    /// at `u32::MAX`.
    pub multiplier: u32,
    pub extra_effects: Vec<String>,
    /// Most recent active replacement, if any.
    pub replaced_by: Option<TraitId>,
}

#[derive(Clone, Debug, Default)]
struct TraitEntry {
    /// One entry per live grant; the trait is present while non-empty.
    grants: Vec<u8>,
    enhancements: Vec<TraitEnhancement>,
}

/// Reference [`TraitSink`] with reference-counted grants.
///
/// Two sources granting the same trait keep it alive until both revoke it.
#[derive(Clone, Debug, Default)]
pub struct TraitBook {
    entries: BTreeMap<TraitId, TraitEntry>,
}

impl TraitBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct traits currently granted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of live grants of `id`.
    pub fn grant_count(&self, id: &TraitId) -> usize {
        self.entries.get(id).map_or(0, |entry| entry.grants.len())
    }

    /// Number of live enhancements attached to `id`.
    pub fn enhancement_count(&self, id: &TraitId) -> usize {
        self.entries
            .get(id)
            .map_or(0, |entry| entry.enhancements.len())
    }

    /// Resolves the effective view of a granted trait.
    pub fn view(&self, id: &TraitId) -> Option<TraitView> {
        let entry = self.entries.get(id)?;
        let mut view = TraitView {
            id: id.clone(),
            level: entry.grants.iter().copied().max().unwrap_or(0),
            multiplier: 100,
            extra_effects: Vec::new(),
            replaced_by: None,
        };
        for enhancement in &entry.enhancements {
            match &enhancement.kind {
                EnhancementKind::Multiply(percent) => {
                    let scaled = u64::from(view.multiplier) * u64::from(*percent) / 100;
                    view.multiplier = u32::try_from(scaled).unwrap_or(u32::MAX);
                }
                EnhancementKind::AddEffects(effects) => {
                    view.extra_effects.extend(effects.iter().cloned());
                }
                EnhancementKind::Replace(with) => view.replaced_by = Some(with.clone()),
                EnhancementKind::Upgrade(levels) => {
                    view.level = view.level.saturating_add(*levels);
                }
            }
        }
        Some(view)
    }
}

impl TraitSink for TraitBook {
    fn has_trait(&self, id: &TraitId) -> bool {
        self.entries.contains_key(id)
    }

    fn grant(&mut self, grant: &TraitGrant) {
        self.entries
            .entry(grant.id.clone())
            .or_default()
            .grants
            .push(grant.level);
    }

    fn revoke(&mut self, grant: &TraitGrant) {
        let Some(entry) = self.entries.get_mut(&grant.id) else {
            tracing::warn!(trait_id = %grant.id, "revoking a trait that is not granted");
            return;
        };
        if let Some(index) = entry.grants.iter().position(|level| *level == grant.level) {
            entry.grants.remove(index);
        } else {
            entry.grants.pop();
        }
        if entry.grants.is_empty() {
            if !entry.enhancements.is_empty() {
                tracing::warn!(
                    trait_id = %grant.id,
                    dangling = entry.enhancements.len(),
                    "trait revoked while enhancements are still attached"
                );
            }
            self.entries.remove(&grant.id);
        }
    }

    fn enhance(&mut self, enhancement: &TraitEnhancement) {
        match self.entries.get_mut(&enhancement.target) {
            Some(entry) => entry.enhancements.push(enhancement.clone()),
            None => tracing::warn!(
                trait_id = %enhancement.target,
                "enhancing a trait that is not granted"
            ),
        }
    }

    fn revert(&mut self, enhancement: &TraitEnhancement) {
        let Some(entry) = self.entries.get_mut(&enhancement.target) else {
            return;
        };
        if let Some(index) = entry.enhancements.iter().position(|e| e == enhancement) {
            entry.enhancements.remove(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grants_are_reference_counted() {
        let mut book = TraitBook::new();
        let thorns = TraitGrant::new("thorns");

        book.grant(&thorns);
        book.grant(&thorns);
        book.revoke(&thorns);
        assert!(book.has_trait(&thorns.id));

        book.revoke(&thorns);
        assert!(!book.has_trait(&thorns.id));
    }

    #[test]
    fn view_folds_enhancements() {
        let mut book = TraitBook::new();
        book.grant(&TraitGrant::new("thorns").at_level(2));
        book.enhance(&TraitEnhancement::new("thorns", EnhancementKind::Multiply(150)));
        book.enhance(&TraitEnhancement::new("thorns", EnhancementKind::Upgrade(1)));
        book.enhance(&TraitEnhancement::new(
            "thorns",
            EnhancementKind::AddEffects(vec!["bleed".into()]),
        ));

        let view = book.view(&TraitId::new("thorns")).unwrap();
        assert_eq!(view.level, 3);
        assert_eq!(view.multiplier, 150);
        assert_eq!(view.extra_effects, vec!["bleed".to_string()]);

        book.revert(&TraitEnhancement::new("thorns", EnhancementKind::Upgrade(1)));
        assert_eq!(book.view(&TraitId::new("thorns")).unwrap().level, 2);
    }

    #[test]
    fn stacked_multipliers_saturate() {
        let mut book = TraitBook::new();
        book.grant(&TraitGrant::new("thorns"));
        book.enhance(&TraitEnhancement::new("thorns", EnhancementKind::Multiply(70_000)));
        book.enhance(&TraitEnhancement::new("thorns", EnhancementKind::Multiply(70_000)));
        assert_eq!(book.view(&TraitId::new("thorns")).unwrap().multiplier, 49_000_000);

        book.enhance(&TraitEnhancement::new(
            "thorns",
            EnhancementKind::Multiply(50_000_000),
        ));
        assert_eq!(book.view(&TraitId::new("thorns")).unwrap().multiplier, u32::MAX);
    }
}
