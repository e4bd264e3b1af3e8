//! Simulation driver - composes the components once per day.
//!
//! A [`Simulation`] owns every piece of mutable state for one run. Nothing
//! is shared between runs, so any number can execute side by side.

use crate::allocation::{AllocationRatios, Staffing};
use crate::arrivals::{ArrivalGenerator, SamplingFailure};
use crate::config::SimConfig;
use crate::controller::{AllocationController, ControllerEvent};
use crate::error::{ConfigError, SimulationError};
use crate::population::PopulationState;
use crate::queues::QueueEngine;
use crate::scenario::Scenario;
use crate::statistics::{AllocationSnapshot, DayRecord, StatisticsAccumulator};
use crate::tier::PerTier;
use crate::transition::TransitionModel;

use carequeue_env::{EntropyContext, RunId, SeededContext, SimEnvironment};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

/// Aggregate output of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationResults {
    pub run_id: RunId,
    pub scenario: Scenario,
    pub seed: Option<u64>,
    pub days_simulated: u32,
    pub initial_state: PopulationState,
    pub final_state: PopulationState,
    pub average_waiting_times: PerTier<f64>,
    pub average_queue_lengths: PerTier<f64>,
    pub final_ratios: AllocationRatios,
    pub final_staffing: Staffing,
    /// Ratios on every controller-period day, day 0 included
    pub monthly_allocations: Vec<AllocationSnapshot>,
    pub controller_events: Vec<ControllerEvent>,
    pub sampling_failures: Vec<SamplingFailure>,
    pub daily: Vec<DayRecord>,
}

impl SimulationResults {
    /// Number of checkpoints at which the controller changed the ratios.
    pub fn controller_triggers(&self) -> usize {
        self.controller_events.len()
    }

    /// Number of individual threshold rules fired across the run.
    pub fn rules_fired(&self) -> usize {
        self.controller_events.iter().map(|e| e.fired.len()).sum()
    }
}

/// Exclusively owned state of one run.
pub struct Simulation {
    config: SimConfig,
    day: u32,
    state: PopulationState,
    ratios: AllocationRatios,
    transition: TransitionModel,
    arrivals: ArrivalGenerator,
    queues: QueueEngine,
    controller: AllocationController,
    stats: StatisticsAccumulator,
    events: Vec<ControllerEvent>,
}

impl Simulation {
    /// Validates `config` and builds a fresh context at day 0.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let queues = QueueEngine::new(
            config.initial_queues,
            config.total_doctors,
            config.service_rates,
            &config.initial_ratios,
        );

        Ok(Self {
            day: 0,
            state: config.initial_state,
            ratios: config.initial_ratios,
            transition: TransitionModel::new(config.scenario),
            arrivals: ArrivalGenerator::new(),
            queues,
            controller: AllocationController::new(config.controller),
            stats: StatisticsAccumulator::new(config.initial_state, config.sim_time),
            events: Vec::new(),
            config,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Index of the next day to simulate.
    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn is_finished(&self) -> bool {
        self.day >= self.config.sim_time
    }

    pub fn state(&self) -> &PopulationState {
        &self.state
    }

    pub fn ratios(&self) -> &AllocationRatios {
        &self.ratios
    }

    pub fn staffing(&self) -> &Staffing {
        self.queues.staffing()
    }

    pub fn queues(&self) -> &PerTier<u64> {
        self.queues.queues()
    }

    pub fn statistics(&self) -> &StatisticsAccumulator {
        &self.stats
    }

    pub fn controller_events(&self) -> &[ControllerEvent] {
        &self.events
    }

    /// Simulates the next day. Returns `None` once the horizon is reached.
    ///
    /// Order within a day: advance the chain, sample arrivals from the
    /// flux, serve the queues, record, then run the controller on
    /// checkpoint days.
    pub fn step_day<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<DayRecord> {
        if self.is_finished() {
            return None;
        }
        let day = self.day;

        let step = self.transition.step(&self.state);
        self.state = step.state;
        if self.state.total() == 0.0 {
            debug!(day, "Total population is zero");
        }

        let arrivals = self.arrivals.sample(day, &step.flux, rng);
        let service = self.queues.serve_day(day, arrivals, &mut self.state);

        let record = *self.stats.record(
            day,
            self.state,
            &service,
            *self.queues.queues(),
            self.ratios,
            *self.queues.capacity(),
        );

        if self.controller.is_checkpoint(day) {
            self.run_checkpoint(day);
        }

        self.day += 1;
        Some(record)
    }

    fn run_checkpoint(&mut self, day: u32) {
        let window = self.controller.config().window;
        let mean = self.stats.trailing_mean_queue(window);
        let waits = AllocationController::congestion(&mean, self.queues.capacity());

        let Some(adjustment) = self.controller.evaluate(&waits, &self.ratios) else {
            debug!(day, ?waits, "Checkpoint: no threshold exceeded");
            return;
        };

        let ratios_before = self.ratios;
        self.ratios = adjustment.ratios;
        let staffing = self.queues.reallocate(&self.ratios);

        info!(
            day,
            fired = ?adjustment.fired,
            mild = self.ratios.mild,
            moderate = self.ratios.moderate,
            severe = self.ratios.severe,
            "Reallocated doctors"
        );

        self.events.push(ControllerEvent {
            day,
            waits,
            fired: adjustment.fired,
            ratios_before,
            ratios_after: self.ratios,
            staffing,
        });
    }

    /// Runs the remaining days, checking for an abort before each one.
    pub fn run<E: SimEnvironment + ?Sized>(
        mut self,
        env: &mut E,
    ) -> Result<SimulationResults, SimulationError> {
        let seed = env.seed();
        let run_id = seed.map(RunId::from_seed).unwrap_or_else(RunId::random);
        info!(
            %run_id,
            scenario = %self.config.scenario,
            days = self.config.sim_time,
            doctors = self.config.total_doctors,
            "Starting simulation"
        );

        while !self.is_finished() {
            if env.should_abort() {
                info!(%run_id, day = self.day, "Simulation aborted");
                return Err(SimulationError::Aborted {
                    completed_days: self.day,
                });
            }
            self.step_day(env.rng());
        }

        let results = self.finish(run_id, seed);
        info!(
            %run_id,
            triggers = results.controller_triggers(),
            sampling_failures = results.sampling_failures.len(),
            "Simulation complete"
        );
        Ok(results)
    }

    /// Summarizes the days simulated so far.
    pub fn finish(self, run_id: RunId, seed: Option<u64>) -> SimulationResults {
        let summary = self.stats.summarize(self.queues.capacity());
        let period = self.controller.config().period;

        SimulationResults {
            run_id,
            scenario: self.config.scenario,
            seed,
            days_simulated: self.day,
            initial_state: self.config.initial_state,
            final_state: self.state,
            average_waiting_times: summary.average_waiting_times,
            average_queue_lengths: summary.average_queue_lengths,
            final_ratios: self.ratios,
            final_staffing: *self.queues.staffing(),
            monthly_allocations: self.stats.allocation_snapshots(period),
            controller_events: self.events,
            sampling_failures: self.arrivals.into_failures(),
            daily: self.stats.into_records(),
        }
    }
}

/// Runs `config` to completion in a fresh context.
///
/// Seeded configs replay exactly; unseeded ones draw from OS entropy.
pub fn run_simulation(config: &SimConfig) -> Result<SimulationResults, SimulationError> {
    let simulation = Simulation::new(config.clone())?;
    match config.seed {
        Some(seed) => simulation.run(&mut SeededContext::new(seed)),
        None => simulation.run(&mut EntropyContext::new()),
    }
}

/// Runs `config` against a caller-supplied environment.
pub fn run_simulation_with<E: SimEnvironment + ?Sized>(
    config: &SimConfig,
    env: &mut E,
) -> Result<SimulationResults, SimulationError> {
    Simulation::new(config.clone())?.run(env)
}
