//! Periodic allocation controller.
//!
//! Every `period` days the controller turns the trailing mean queue length
//! of each tier into an implied waiting time (`mean / capacity`) and shifts
//! doctor share toward every tier whose wait exceeds its threshold.

use crate::allocation::{AllocationRatios, Staffing};
use crate::error::ConfigError;
use crate::tier::{PerTier, Tier};
use serde::{Deserialize, Serialize};

/// Order in which threshold rules are applied within one checkpoint.
///
/// Later rules can take back share granted by earlier ones, so mild relief
/// always has the last word.
pub const RULE_ORDER: [Tier; 3] = [Tier::Severe, Tier::Moderate, Tier::Mild];

/// What happens to the ratios after a checkpoint fired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatioPolicy {
    /// Keep the ratios as adjusted, even if they no longer sum to 1
    #[default]
    Preserve,

    /// Divide by the sum after every adjustment
    Renormalize,
}

/// Controller tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Days between checkpoints (fires on `day > 0 && day % period == 0`)
    pub period: u32,

    /// Number of trailing daily queue lengths averaged per checkpoint
    pub window: usize,

    /// Share moved per fired rule
    pub delta: f64,

    /// Waiting-time thresholds in days
    pub thresholds: PerTier<f64>,

    pub policy: RatioPolicy,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            period: 30,
            window: 30,
            delta: 0.05,
            thresholds: PerTier::new(20.0, 14.0, 7.0),
            policy: RatioPolicy::Preserve,
        }
    }
}

impl ControllerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.period == 0 {
            return Err(ConfigError::controller("period must be at least one day"));
        }
        if self.window == 0 {
            return Err(ConfigError::controller("window must hold at least one day"));
        }
        if !(self.delta > 0.0 && self.delta <= 1.0) {
            return Err(ConfigError::controller(format!(
                "delta must be in (0, 1], got {}",
                self.delta
            )));
        }
        for (tier, threshold) in self.thresholds.iter() {
            if !threshold.is_finite() || *threshold < 0.0 {
                return Err(ConfigError::controller(format!(
                    "{} threshold must be a non-negative number, got {}",
                    tier, threshold
                )));
            }
        }
        Ok(())
    }
}

/// A checkpoint at which at least one rule fired.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControllerEvent {
    pub day: u32,
    pub waits: PerTier<f64>,
    pub fired: Vec<Tier>,
    pub ratios_before: AllocationRatios,
    pub ratios_after: AllocationRatios,
    pub staffing: Staffing,
}

/// Ratios produced by a checkpoint where some rule fired.
#[derive(Debug, Clone, PartialEq)]
pub struct Adjustment {
    pub fired: Vec<Tier>,
    pub ratios: AllocationRatios,
}

#[derive(Debug, Clone, Default)]
pub struct AllocationController {
    config: ControllerConfig,
}

impl AllocationController {
    pub fn new(config: ControllerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn is_checkpoint(&self, day: u32) -> bool {
        day > 0 && day % self.config.period == 0
    }

    /// Implied waiting time per tier, zero where capacity is zero.
    pub fn congestion(mean_queue: &PerTier<f64>, capacity: &PerTier<u64>) -> PerTier<f64> {
        mean_queue.zip_with(capacity, |mean, cap| {
            if *cap > 0 {
                mean / *cap as f64
            } else {
                0.0
            }
        })
    }

    /// Applies the threshold rules in [`RULE_ORDER`].
    ///
    /// Returns `None` when no rule fired; the ratios are then left as they are.
    pub fn evaluate(&self, waits: &PerTier<f64>, ratios: &AllocationRatios) -> Option<Adjustment> {
        let mut adjusted = *ratios;
        let mut fired = Vec::new();

        for tier in RULE_ORDER {
            if waits.get(tier) > self.config.thresholds.get(tier) {
                adjusted.shift_toward(tier, self.config.delta);
                fired.push(tier);
            }
        }

        if fired.is_empty() {
            return None;
        }

        if self.config.policy == RatioPolicy::Renormalize {
            adjusted = adjusted.renormalized();
        }

        Some(Adjustment {
            fired,
            ratios: adjusted,
        })
    }
}
