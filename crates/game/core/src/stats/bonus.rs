//! Layered stat bonuses: `Flat → %Inc → More → Less → Clamp`.

/// One layer of a stat delta.
///
/// Percent values are whole percents: `Increased(20)` is +20%, `More(50)` is
/// ×1.5 and `Less(10)` is ×0.9. Bonuses are plain values, so removing a bonus
/// that was added is an exact inverse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bonus {
    /// Added to the base before any scaling.
    Flat(i32),
    /// Summed with every other `Increased`, then applied once.
    Increased(i32),
    /// Applied one after another after the increased sum.
    More(i32),
    /// Applied one after another, last.
    Less(i32),
}

/// Bonuses collected for one stat, folded in layer order on demand.
///
/// # Example
/// ```
/// # use armory_core::stats::{Bonus, BonusStack};
/// let mut stack = BonusStack::new();
/// stack.add(Bonus::Flat(5));
/// stack.add(Bonus::Increased(20));
/// stack.add(Bonus::Increased(15));
/// stack.add(Bonus::More(50));
/// stack.add(Bonus::Less(10));
///
/// // (10 + 5) × 1.35 × 1.5 × 0.9, clamped to 5..=100
/// assert_eq!(stack.apply(10, 5, 100), 27);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BonusStack {
    bonuses: Vec<Bonus>,
}

impl BonusStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, bonus: Bonus) {
        self.bonuses.push(bonus);
    }

    /// Removes one occurrence of `bonus`. Returns false if it was never added.
    pub fn remove(&mut self, bonus: &Bonus) -> bool {
        let Some(index) = self.bonuses.iter().position(|b| b == bonus) else {
            return false;
        };
        self.bonuses.remove(index);
        true
    }

    /// Folds every bonus onto `base` and clamps the result to `min..=max`.
    ///
    /// ```text
    /// (base + Σflat) × (100 + Σinc)/100 × Π(100 + more)/100 × Π(100 − less)/100
    /// ```
    pub fn apply(&self, base: i32, min: i32, max: i32) -> i32 {
        let mut flat = 0;
        let mut increased = 0;
        for bonus in &self.bonuses {
            match *bonus {
                Bonus::Flat(value) => flat += value,
                Bonus::Increased(percent) => increased += percent,
                Bonus::More(_) | Bonus::Less(_) => {}
            }
        }

        let mut value = (base + flat) * (100 + increased) / 100;
        for bonus in &self.bonuses {
            if let Bonus::More(percent) = *bonus {
                value = value * (100 + percent) / 100;
            }
        }
        for bonus in &self.bonuses {
            if let Bonus::Less(percent) = *bonus {
                value = value * (100 - percent) / 100;
            }
        }
        value.clamp(min, max)
    }

    pub fn apply_unclamped(&self, base: i32) -> i32 {
        self.apply(base, i32::MIN, i32::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.bonuses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bonuses.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bonus> {
        self.bonuses.iter()
    }
}

/// Clamp range for a stat's final value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatBounds {
    pub min: i32,
    pub max: i32,
}

impl StatBounds {
    /// Defensive and offensive ratings never go negative.
    pub const RATING: Self = Self { min: 0, max: 9999 };

    /// Resource maximums stay at least 1.
    pub const RESOURCE: Self = Self { min: 1, max: 99999 };

    /// Percent-style stats such as crit chance.
    pub const PERCENT: Self = Self { min: 0, max: 100 };

    pub const UNCLAMPED: Self = Self {
        min: i32::MIN,
        max: i32::MAX,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_is_exact_inverse_of_add() {
        let mut stack = BonusStack::new();
        stack.add(Bonus::Flat(4));
        stack.add(Bonus::Increased(10));
        stack.add(Bonus::Flat(4));

        assert!(stack.remove(&Bonus::Flat(4)));
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.apply_unclamped(10), 15); // (10 + 4) × 1.1

        assert!(stack.remove(&Bonus::Flat(4)));
        assert!(stack.remove(&Bonus::Increased(10)));
        assert!(!stack.remove(&Bonus::Flat(4)));
        assert!(stack.is_empty());
    }

    #[test]
    fn less_is_applied_after_more() {
        let stack = BonusStack {
            bonuses: vec![Bonus::Less(50), Bonus::More(100)],
        };
        // 10 × 2 × 0.5
        assert_eq!(stack.apply_unclamped(10), 10);
    }

    #[test]
    fn clamps_to_bounds() {
        let mut stack = BonusStack::new();
        stack.add(Bonus::Flat(-50));
        let bounds = StatBounds::RATING;
        assert_eq!(stack.apply(10, bounds.min, bounds.max), 0);
    }
}
