//! Simulation requests and their validation.
//!
//! Every field is optional; missing ones fall back to the default table.

use carequeue_core::{
    AllocationRatios, ConfigError, PerTier, PopulationState, Scenario, ServiceRates, SimConfig,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

/// Population reported when the request does not name one.
pub const DEFAULT_POPULATION: i64 = 828_000;

/// Request rejected before any simulation work.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Invalid population size.")]
    InvalidPopulation,

    #[error("Initial state must be a list of four numbers.")]
    InvalidInitialState,

    #[error("Invalid scenario. Choose 'peace' or 'crisis'.")]
    InvalidScenario,

    #[error("Simulation time must be a positive integer.")]
    InvalidSimTime,

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Malformed request: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read request: {0}")]
    Io(#[from] std::io::Error),
}

/// A simulation request as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub population: Option<i64>,
    /// Kept loose so shape and type errors get their own message
    pub initial_state: Option<Value>,
    pub scenario: Option<String>,
    pub sim_time: Option<i64>,
    pub total_doctors: Option<u64>,
    pub service_rates: Option<ServiceRates>,
    pub allocation: Option<AllocationRatios>,
    pub initial_queues: Option<PerTier<u64>>,
    pub seed: Option<u64>,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub population: i64,
    pub config: SimConfig,
}

impl SimulationRequest {
    pub fn from_json(json: &str) -> Result<Self, RequestError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RequestError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Applies defaults and checks every field, then validates the
    /// resulting configuration.
    pub fn validate(&self) -> Result<ValidatedRequest, RequestError> {
        let defaults = SimConfig::default();

        let population = self.population.unwrap_or(DEFAULT_POPULATION);
        if population <= 0 {
            return Err(RequestError::InvalidPopulation);
        }

        let initial_state = match &self.initial_state {
            Some(value) => PopulationState::from_slice(&four_numbers(value)?)?,
            None => defaults.initial_state,
        };

        let scenario = match &self.scenario {
            Some(name) => name
                .parse::<Scenario>()
                .map_err(|_| RequestError::InvalidScenario)?,
            None => defaults.scenario,
        };

        let sim_time = match self.sim_time {
            Some(days) => u32::try_from(days)
                .ok()
                .filter(|d| *d > 0)
                .ok_or(RequestError::InvalidSimTime)?,
            None => defaults.sim_time,
        };

        let config = SimConfig {
            initial_state,
            scenario,
            sim_time,
            total_doctors: self.total_doctors.unwrap_or(defaults.total_doctors),
            service_rates: self.service_rates.unwrap_or(defaults.service_rates),
            initial_ratios: self.allocation.unwrap_or(defaults.initial_ratios),
            initial_queues: self.initial_queues.unwrap_or(defaults.initial_queues),
            seed: self.seed,
            ..defaults
        };
        config.validate()?;

        Ok(ValidatedRequest { population, config })
    }
}

fn four_numbers(value: &Value) -> Result<Vec<f64>, RequestError> {
    let values = value
        .as_array()
        .filter(|items| items.len() == 4)
        .ok_or(RequestError::InvalidInitialState)?;
    values
        .iter()
        .map(|v| v.as_f64().ok_or(RequestError::InvalidInitialState))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_request_uses_defaults() {
        let validated = SimulationRequest::from_json("{}").unwrap().validate().unwrap();

        assert_eq!(validated.population, 828_000);
        assert_eq!(validated.config, SimConfig::default());
    }

    #[test]
    fn test_full_request() {
        let json = r#"{
            "population": 1000,
            "initial_state": [900, 60, 30, 10],
            "scenario": "crisis",
            "sim_time": 90,
            "total_doctors": 50,
            "allocation": {"mild": 0.5, "moderate": 0.3, "severe": 0.2},
            "seed": 17
        }"#;
        let validated = SimulationRequest::from_json(json).unwrap().validate().unwrap();

        assert_eq!(validated.population, 1000);
        assert_eq!(validated.config.scenario, Scenario::Crisis);
        assert_eq!(validated.config.sim_time, 90);
        assert_eq!(validated.config.total_doctors, 50);
        assert_eq!(validated.config.initial_state.severe, 10.0);
        assert_eq!(validated.config.initial_ratios.moderate, 0.3);
        assert_eq!(validated.config.seed, Some(17));
    }

    #[test]
    fn test_rejects_bad_population() {
        let request = SimulationRequest {
            population: Some(0),
            ..Default::default()
        };
        assert!(matches!(request.validate(), Err(RequestError::InvalidPopulation)));
    }

    #[test]
    fn test_rejects_short_state() {
        let request = SimulationRequest {
            initial_state: Some(json!([1.0, 2.0])),
            ..Default::default()
        };
        let err = request.validate().unwrap_err();
        assert_eq!(err.to_string(), "Initial state must be a list of four numbers.");
    }

    #[test]
    fn test_rejects_non_numeric_state() {
        for json in [
            r#"{"initial_state": [1, "x", 2, 3]}"#,
            r#"{"initial_state": "1,2,3,4"}"#,
            r#"{"initial_state": [1, null, 2, 3]}"#,
        ] {
            let err = SimulationRequest::from_json(json).unwrap().validate().unwrap_err();
            assert_eq!(err.to_string(), "Initial state must be a list of four numbers.");
        }
    }

    #[test]
    fn test_rejects_negative_state_as_config_error() {
        let request = SimulationRequest {
            initial_state: Some(json!([1.0, -2.0, 0.0, 0.0])),
            ..Default::default()
        };
        assert!(matches!(
            request.validate(),
            Err(RequestError::Config(ConfigError::InvalidInitialState(_)))
        ));
    }

    #[test]
    fn test_rejects_unknown_scenario() {
        let request = SimulationRequest {
            scenario: Some("war".to_string()),
            ..Default::default()
        };
        let err = request.validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid scenario. Choose 'peace' or 'crisis'.");
    }

    #[test]
    fn test_rejects_non_positive_sim_time() {
        for days in [0, -5, i64::MAX] {
            let request = SimulationRequest {
                sim_time: Some(days),
                ..Default::default()
            };
            assert!(matches!(request.validate(), Err(RequestError::InvalidSimTime)));
        }
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            SimulationRequest::from_json("{\"sim_time\": \"soon\"}"),
            Err(RequestError::Parse(_))
        ));
    }
}
