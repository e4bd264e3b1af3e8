//! Severity tiers that own a treatment queue.

use serde::{Deserialize, Serialize};

/// A severity tier with its own waiting queue and doctor pool.
///
/// The declaration order (mild, moderate, severe) is the iteration order of
/// [`PerTier`] and of [`Tier::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Mild,
    Moderate,
    Severe,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Mild, Tier::Moderate, Tier::Severe];

    /// Returns the tier name.
    pub fn name(&self) -> &'static str {
        match self {
            Tier::Mild => "mild",
            Tier::Moderate => "moderate",
            Tier::Severe => "severe",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One value per tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerTier<T> {
    pub mild: T,
    pub moderate: T,
    pub severe: T,
}

impl<T> PerTier<T> {
    pub fn new(mild: T, moderate: T, severe: T) -> Self {
        Self {
            mild,
            moderate,
            severe,
        }
    }

    pub fn get(&self, tier: Tier) -> &T {
        match tier {
            Tier::Mild => &self.mild,
            Tier::Moderate => &self.moderate,
            Tier::Severe => &self.severe,
        }
    }

    pub fn get_mut(&mut self, tier: Tier) -> &mut T {
        match tier {
            Tier::Mild => &mut self.mild,
            Tier::Moderate => &mut self.moderate,
            Tier::Severe => &mut self.severe,
        }
    }

    /// Builds a value per tier from a function of the tier.
    pub fn from_fn(mut f: impl FnMut(Tier) -> T) -> Self {
        Self {
            mild: f(Tier::Mild),
            moderate: f(Tier::Moderate),
            severe: f(Tier::Severe),
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> PerTier<U> {
        PerTier {
            mild: f(&self.mild),
            moderate: f(&self.moderate),
            severe: f(&self.severe),
        }
    }

    pub fn zip_with<U, V>(&self, other: &PerTier<U>, mut f: impl FnMut(&T, &U) -> V) -> PerTier<V> {
        PerTier {
            mild: f(&self.mild, &other.mild),
            moderate: f(&self.moderate, &other.moderate),
            severe: f(&self.severe, &other.severe),
        }
    }

    /// Iterates `(tier, value)` pairs in tier order.
    pub fn iter(&self) -> impl Iterator<Item = (Tier, &T)> {
        Tier::ALL.into_iter().map(move |tier| (tier, self.get(tier)))
    }
}

impl<T: Copy + std::iter::Sum<T>> PerTier<T> {
    pub fn sum(&self) -> T {
        [self.mild, self.moderate, self.severe].into_iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_tier_access() {
        let mut values = PerTier::new(1, 2, 3);
        assert_eq!(*values.get(Tier::Moderate), 2);

        *values.get_mut(Tier::Severe) += 10;
        assert_eq!(values.severe, 13);
        assert_eq!(values.sum(), 16);
    }

    #[test]
    fn test_per_tier_iter_order() {
        let values = PerTier::from_fn(|tier| tier.name());
        let order: Vec<Tier> = values.iter().map(|(tier, _)| tier).collect();
        assert_eq!(order, Tier::ALL.to_vec());
    }

    #[test]
    fn test_per_tier_zip_with() {
        let a = PerTier::new(10u64, 20, 30);
        let b = PerTier::new(1u64, 2, 3);
        assert_eq!(a.zip_with(&b, |x, y| x - y), PerTier::new(9, 18, 27));
    }
}
