//! Population state vector over the four severity states.

use crate::error::ConfigError;
use crate::tier::Tier;
use nalgebra::RowVector4;
use serde::{Deserialize, Serialize};

/// Head counts per severity state `(healthy, mild, moderate, severe)`.
///
/// Counts are real-valued because the Markov step moves fractional mass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopulationState {
    pub healthy: f64,
    pub mild: f64,
    pub moderate: f64,
    pub severe: f64,
}

impl PopulationState {
    pub fn new(healthy: f64, mild: f64, moderate: f64, severe: f64) -> Self {
        Self {
            healthy,
            mild,
            moderate,
            severe,
        }
    }

    /// Parses a caller-supplied state, rejecting anything that is not exactly
    /// four finite, non-negative numbers.
    pub fn from_slice(values: &[f64]) -> Result<Self, ConfigError> {
        let [healthy, mild, moderate, severe] = values else {
            return Err(ConfigError::initial_state(format!(
                "expected 4 values, got {}",
                values.len()
            )));
        };
        let state = Self::new(*healthy, *mild, *moderate, *severe);
        state.validate()?;
        Ok(state)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in self.named() {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::initial_state(format!(
                    "{} must be a finite non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    fn named(&self) -> [(&'static str, f64); 4] {
        [
            ("healthy", self.healthy),
            ("mild", self.mild),
            ("moderate", self.moderate),
            ("severe", self.severe),
        ]
    }

    pub fn total(&self) -> f64 {
        self.healthy + self.mild + self.moderate + self.severe
    }

    /// Cases in a treatable tier.
    pub fn cases(&self, tier: Tier) -> f64 {
        match tier {
            Tier::Mild => self.mild,
            Tier::Moderate => self.moderate,
            Tier::Severe => self.severe,
        }
    }

    pub fn cases_mut(&mut self, tier: Tier) -> &mut f64 {
        match tier {
            Tier::Mild => &mut self.mild,
            Tier::Moderate => &mut self.moderate,
            Tier::Severe => &mut self.severe,
        }
    }

    /// Moves `served` patients of `tier` back to healthy.
    ///
    /// The tier is floored at zero: the queue can hold more patients than
    /// the chain still attributes to that tier.
    pub fn recover(&mut self, tier: Tier, served: u64) {
        let served = served as f64;
        self.healthy += served;
        let cases = self.cases_mut(tier);
        *cases = (*cases - served).max(0.0);
    }

    pub fn clamp_nonnegative(&self) -> Self {
        Self::from_row(&self.to_row().map(|v| v.max(0.0)))
    }

    pub fn is_nonnegative(&self) -> bool {
        self.named().iter().all(|(_, v)| *v >= 0.0)
    }

    pub fn to_row(&self) -> RowVector4<f64> {
        RowVector4::new(self.healthy, self.mild, self.moderate, self.severe)
    }

    pub fn from_row(row: &RowVector4<f64>) -> Self {
        Self::new(row[0], row[1], row[2], row[3])
    }
}

impl Default for PopulationState {
    fn default() -> Self {
        Self::new(800_000.0, 20_000.0, 5_000.0, 3_000.0)
    }
}
