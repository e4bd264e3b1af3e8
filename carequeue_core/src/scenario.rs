//! Scenario presets selecting the transition matrix.

use crate::error::ConfigError;
use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};

/// Scenario identifiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    /// Stable conditions: slow onset, severe cases retained
    #[default]
    Peace,

    /// Crisis conditions: doubled onset, mass drifts toward moderate/severe
    Crisis,
}

impl Scenario {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<Scenario> {
        vec![Scenario::Peace, Scenario::Crisis]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            Scenario::Peace => "peace",
            Scenario::Crisis => "crisis",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            Scenario::Peace => "Stable conditions, 0.5% daily onset, severe state absorbing",
            Scenario::Crisis => "Crisis conditions, 1% daily onset, slower recovery from moderate",
        }
    }

    /// Returns the row-stochastic daily transition matrix.
    ///
    /// Rows and columns are ordered healthy, mild, moderate, severe.
    #[rustfmt::skip]
    pub fn transition_matrix(&self) -> Matrix4<f64> {
        match self {
            Scenario::Peace => Matrix4::new(
                0.995, 0.005, 0.00, 0.00,
                0.10, 0.70, 0.20, 0.00,
                0.00, 0.10, 0.70, 0.20,
                0.00, 0.00, 0.00, 1.00,
            ),
            Scenario::Crisis => Matrix4::new(
                0.99, 0.01, 0.00, 0.00,
                0.10, 0.75, 0.15, 0.00,
                0.00, 0.10, 0.85, 0.05,
                0.00, 0.00, 0.05, 0.95,
            ),
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Scenario {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "peace" => Ok(Scenario::Peace),
            "crisis" => Ok(Scenario::Crisis),
            _ => Err(ConfigError::UnknownScenario(s.to_string())),
        }
    }
}
