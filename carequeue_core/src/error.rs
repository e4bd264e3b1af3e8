//! Error types for the simulation core.

use crate::tier::Tier;
use thiserror::Error;

/// Configuration rejected before the first simulated day.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Scenario name is not one of the presets
    #[error("Unknown scenario: {0} (expected 'peace' or 'crisis')")]
    UnknownScenario(String),

    /// Horizon must be at least one day
    #[error("Simulation time must be a positive integer")]
    NonPositiveHorizon,

    /// Initial state is not four finite, non-negative numbers
    #[error("Invalid initial state: {0}")]
    InvalidInitialState(String),

    /// Allocation ratio outside [0, 1] or not finite
    #[error("Invalid allocation ratio for {tier}: {value}")]
    InvalidRatio { tier: Tier, value: f64 },

    /// Controller tuning is unusable (zero period, delta outside (0, 1], ...)
    #[error("Invalid controller setting: {0}")]
    InvalidController(String),

    /// Doctor pool times service rate does not fit a daily capacity counter
    #[error("Daily capacity overflows: {doctors} doctors serving {rate} patients per day")]
    CapacityOverflow { doctors: u64, rate: u64 },
}

impl ConfigError {
    /// Creates an initial-state error.
    pub fn initial_state(msg: impl Into<String>) -> Self {
        Self::InvalidInitialState(msg.into())
    }

    /// Creates a controller error.
    pub fn controller(msg: impl Into<String>) -> Self {
        Self::InvalidController(msg.into())
    }
}

/// Errors returned by a simulation run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The caller aborted the run between days
    #[error("Simulation aborted after {completed_days} day(s)")]
    Aborted { completed_days: u32 },
}
