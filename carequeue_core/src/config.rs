//! Run configuration and validation.

use crate::allocation::{AllocationRatios, ServiceRates, Staffing, DEFAULT_SERVICE_RATES};
use crate::controller::{ControllerConfig, RatioPolicy};
use crate::error::ConfigError;
use crate::population::PopulationState;
use crate::scenario::Scenario;
use crate::tier::PerTier;
use serde::{Deserialize, Serialize};

/// Default backlog waiting at day 0.
pub const DEFAULT_INITIAL_QUEUES: PerTier<u64> = PerTier {
    mild: 10_000,
    moderate: 5_000,
    severe: 1_000,
};

/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Initial head counts
    pub initial_state: PopulationState,

    /// Transition matrix preset
    pub scenario: Scenario,

    /// Horizon in days
    pub sim_time: u32,

    /// Size of the doctor pool
    pub total_doctors: u64,

    /// Patients per doctor per day
    pub service_rates: ServiceRates,

    /// Starting doctor share per tier
    pub initial_ratios: AllocationRatios,

    /// Backlog at day 0
    pub initial_queues: PerTier<u64>,

    /// Controller tuning
    pub controller: ControllerConfig,

    /// Seed for a replayable run (None = OS entropy)
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            initial_state: PopulationState::default(),
            scenario: Scenario::Peace,
            sim_time: 365,
            total_doctors: 1000,
            service_rates: DEFAULT_SERVICE_RATES,
            initial_ratios: AllocationRatios::default(),
            initial_queues: DEFAULT_INITIAL_QUEUES,
            controller: ControllerConfig::default(),
            seed: None,
        }
    }
}

impl SimConfig {
    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.scenario = scenario;
        self
    }

    pub fn with_initial_state(mut self, state: PopulationState) -> Self {
        self.initial_state = state;
        self
    }

    pub fn with_sim_time(mut self, days: u32) -> Self {
        self.sim_time = days;
        self
    }

    pub fn with_total_doctors(mut self, doctors: u64) -> Self {
        self.total_doctors = doctors;
        self
    }

    pub fn with_service_rates(mut self, rates: ServiceRates) -> Self {
        self.service_rates = rates;
        self
    }

    pub fn with_ratios(mut self, ratios: AllocationRatios) -> Self {
        self.initial_ratios = ratios;
        self
    }

    pub fn with_initial_queues(mut self, queues: PerTier<u64>) -> Self {
        self.initial_queues = queues;
        self
    }

    pub fn with_ratio_policy(mut self, policy: RatioPolicy) -> Self {
        self.controller.policy = policy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Rejects configurations that cannot be simulated. Runs before day 0.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sim_time == 0 {
            return Err(ConfigError::NonPositiveHorizon);
        }
        self.initial_state.validate()?;
        self.initial_ratios.validate()?;
        self.controller.validate()?;
        Staffing::check_capacity(self.total_doctors, &self.service_rates)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let config = SimConfig::default().with_sim_time(0);
        assert_eq!(config.validate(), Err(ConfigError::NonPositiveHorizon));
    }

    #[test]
    fn test_bad_state_rejected() {
        let config = SimConfig::default()
            .with_initial_state(PopulationState::new(1.0, -5.0, 0.0, 0.0));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidInitialState(_))
        ));
    }

    #[test]
    fn test_bad_ratio_rejected() {
        let config = SimConfig::default().with_ratios(AllocationRatios::new(-0.1, 0.6, 0.5));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRatio { .. })
        ));
    }

    #[test]
    fn test_oversized_doctor_pool_rejected() {
        let config = SimConfig::default().with_total_doctors(u64::MAX / 4);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CapacityOverflow { rate: 10, .. })
        ));

        let rates = PerTier::new(1, 1, u64::MAX);
        let config = SimConfig::default().with_total_doctors(2).with_service_rates(rates);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CapacityOverflow { doctors: 2, .. })
        ));
    }

    #[test]
    fn test_config_from_json() {
        let json = serde_json::to_string(&SimConfig::default().with_seed(9)).unwrap();
        let parsed: SimConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.seed, Some(9));
        assert_eq!(parsed.scenario, Scenario::Peace);
    }
}
