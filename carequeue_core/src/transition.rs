//! Markov transition model.
//!
//! One call to [`TransitionModel::step`] advances the chain by a day and
//! derives the expected inflow (flux) into each treatable tier from the
//! advanced state.

use crate::population::PopulationState;
use crate::scenario::Scenario;
use crate::tier::PerTier;
use nalgebra::Matrix4;

/// Expected one-day inflow into each treatable tier.
pub type Flux = PerTier<f64>;

/// Result of advancing the chain by one day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionStep {
    /// State after `state · T`, clamped at zero
    pub state: PopulationState,

    /// Non-negative expected arrivals per tier (NaN is passed through so the
    /// sampler can report it)
    pub flux: Flux,
}

/// Holds the scenario's transition matrix for the whole run.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionModel {
    matrix: Matrix4<f64>,
}

impl TransitionModel {
    pub fn new(scenario: Scenario) -> Self {
        Self {
            matrix: scenario.transition_matrix(),
        }
    }

    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    /// Advances the chain one day: `clamp_nonnegative(state · T)`.
    pub fn advance(&self, state: &PopulationState) -> PopulationState {
        PopulationState::from_row(&(state.to_row() * self.matrix)).clamp_nonnegative()
    }

    /// Expected inflow per tier given an (already advanced) state.
    ///
    /// - mild: healthy × (T[h,mild] + T[h,moderate] + T[h,severe])
    /// - moderate: mild × (T[mild,moderate] + T[mild,severe])
    /// - severe: moderate × T[moderate,severe]
    ///
    /// All zero when the population is empty.
    pub fn flux(&self, state: &PopulationState) -> Flux {
        if state.total() == 0.0 {
            return Flux::default();
        }

        let t = &self.matrix;
        let raw = Flux::new(
            state.healthy * (t[(0, 1)] + t[(0, 2)] + t[(0, 3)]),
            state.mild * (t[(1, 2)] + t[(1, 3)]),
            state.moderate * t[(2, 3)],
        );
        // NaN fails `< 0.0` and is kept for the arrival generator to reject
        raw.map(|rate| if *rate < 0.0 { 0.0 } else { *rate })
    }

    pub fn step(&self, state: &PopulationState) -> TransitionStep {
        let state = self.advance(state);
        let flux = self.flux(&state);
        TransitionStep { state, flux }
    }
}
