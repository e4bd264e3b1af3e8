//! Scenario runner - executes simulation runs and checks their invariants.

use carequeue_core::{
    is_service_day, run_simulation, PerTier, Scenario, SimConfig, SimulationError,
    SimulationResults, Tier,
};
use tracing::{debug, info, warn};

/// Results from running a scenario.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    /// Scenario that was run
    pub scenario: Scenario,

    /// Seed used
    pub seed: u64,

    /// Whether every invariant held
    pub passed: bool,

    /// Failure message if any
    pub failure_reason: Option<String>,

    /// Full results (None if the run was rejected or aborted)
    pub results: Option<SimulationResults>,
}

/// Peace vs crisis under the same seed.
#[derive(Debug, Clone)]
pub struct ScenarioComparison {
    pub seed: u64,
    pub peace_queue_lengths: PerTier<f64>,
    pub crisis_queue_lengths: PerTier<f64>,
    pub peace_rules_fired: usize,
    pub crisis_rules_fired: usize,
}

impl ScenarioComparison {
    /// True when crisis has longer mean queues in every tier.
    pub fn crisis_more_congested(&self) -> bool {
        Tier::ALL.iter().all(|tier| {
            self.crisis_queue_lengths.get(*tier) > self.peace_queue_lengths.get(*tier)
        })
    }
}

/// Runs scenarios from a shared base configuration.
pub struct ScenarioRunner {
    /// Configuration seed
    seed: u64,

    /// Base configuration (scenario and seed are overridden per run)
    config: SimConfig,
}

impl ScenarioRunner {
    /// Creates a new scenario runner.
    pub fn new(seed: u64, config: SimConfig) -> Self {
        Self { seed, config }
    }

    /// Sets the horizon.
    pub fn with_days(mut self, days: u32) -> Self {
        self.config.sim_time = days;
        self
    }

    /// Sets the doctor pool.
    pub fn with_doctors(mut self, doctors: u64) -> Self {
        self.config.total_doctors = doctors;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Runs a scenario and returns the result.
    pub fn run(&self, scenario: Scenario) -> ScenarioResult {
        info!("Starting scenario: {} (seed={})", scenario.name(), self.seed);
        debug!("{}", scenario.description());

        let config = self
            .config
            .clone()
            .with_scenario(scenario)
            .with_seed(self.seed);

        match run_simulation(&config) {
            Ok(results) => {
                let verdict = check_invariants(&results, config.total_doctors);
                if let Err(reason) = &verdict {
                    warn!("Invariant violated in {}: {}", scenario.name(), reason);
                }
                ScenarioResult {
                    scenario,
                    seed: self.seed,
                    passed: verdict.is_ok(),
                    failure_reason: verdict.err(),
                    results: Some(results),
                }
            }
            Err(e) => ScenarioResult {
                scenario,
                seed: self.seed,
                passed: false,
                failure_reason: Some(e.to_string()),
                results: None,
            },
        }
    }

    /// Runs both presets under this runner's seed.
    pub fn compare(&self) -> Result<ScenarioComparison, SimulationError> {
        let run = |scenario| {
            run_simulation(
                &self
                    .config
                    .clone()
                    .with_scenario(scenario)
                    .with_seed(self.seed),
            )
        };
        let peace = run(Scenario::Peace)?;
        let crisis = run(Scenario::Crisis)?;

        Ok(ScenarioComparison {
            seed: self.seed,
            peace_queue_lengths: peace.average_queue_lengths,
            crisis_queue_lengths: crisis.average_queue_lengths,
            peace_rules_fired: peace.rules_fired(),
            crisis_rules_fired: crisis.rules_fired(),
        })
    }
}

/// Checks a finished run against the model's invariants.
///
/// - state, queues and doctor counts never negative
/// - doctor counts sum to `total_doctors` at start and after every reallocation
/// - nobody is served on non-working days
/// - every ratio stays within [0, 1]
/// - capacity only changes on days the controller fired
pub fn check_invariants(results: &SimulationResults, total_doctors: u64) -> Result<(), String> {
    let event_days: Vec<u32> = results.controller_events.iter().map(|e| e.day).collect();

    for (i, record) in results.daily.iter().enumerate() {
        if !record.state.is_nonnegative() {
            return Err(format!("negative state on day {}", record.day));
        }
        if !record.ratios.is_within_unit() {
            return Err(format!("allocation ratio out of [0, 1] on day {}", record.day));
        }
        if !is_service_day(record.day) && record.served != PerTier::default() {
            return Err(format!("patients served on non-working day {}", record.day));
        }
        if i > 0 {
            let prev = &results.daily[i - 1];
            if prev.capacity != record.capacity && !event_days.contains(&prev.day) {
                return Err(format!("capacity changed without a controller event on day {}", record.day));
            }
        }
    }

    for event in &results.controller_events {
        if event.staffing.total_doctors() != total_doctors {
            return Err(format!(
                "doctor count {} != {} after reallocation on day {}",
                event.staffing.total_doctors(),
                total_doctors,
                event.day
            ));
        }
        if !event.ratios_after.is_within_unit() {
            return Err(format!("controller produced out-of-range ratios on day {}", event.day));
        }
    }

    if results.final_staffing.total_doctors() != total_doctors {
        return Err("final doctor allocation does not match the pool".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runner_passes_default_scenarios() {
        let runner = ScenarioRunner::new(42, SimConfig::default()).with_days(120);

        for scenario in Scenario::all() {
            let result = runner.run(scenario);
            assert!(result.passed, "{:?}", result.failure_reason);
            assert_eq!(result.results.unwrap().days_simulated, 120);
        }
    }

    #[test]
    fn test_runner_reports_config_errors() {
        let runner = ScenarioRunner::new(1, SimConfig::default()).with_days(0);
        let result = runner.run(Scenario::Peace);

        assert!(!result.passed);
        assert!(result.results.is_none());
        assert!(result.failure_reason.unwrap().contains("positive"));
    }

    #[test]
    fn test_runner_zero_doctors() {
        let runner = ScenarioRunner::new(3, SimConfig::default())
            .with_days(60)
            .with_doctors(0);
        let result = runner.run(Scenario::Crisis);

        assert!(result.passed);
        let results = result.results.unwrap();
        assert_eq!(results.average_waiting_times, PerTier::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_compare_full_year() {
        let comparison = ScenarioRunner::new(5, SimConfig::default()).compare().unwrap();

        assert!(comparison.crisis_more_congested());
        assert!(comparison.crisis_rules_fired > comparison.peace_rules_fired);
    }

    #[test]
    fn test_check_invariants_catches_weekend_service() {
        let mut results = run_simulation(&SimConfig::default().with_sim_time(10).with_seed(1)).unwrap();
        results.daily[5].served = PerTier::new(1, 0, 0);

        let err = check_invariants(&results, 1000).unwrap_err();
        assert!(err.contains("non-working day 5"));
    }
}
