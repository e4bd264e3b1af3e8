//! Statistics accumulator.
//!
//! Pure bookkeeping: it records each day and summarizes at the end of the
//! horizon, but nothing it computes feeds back into the model except the
//! trailing queue means the controller reads.

use crate::allocation::AllocationRatios;
use crate::population::PopulationState;
use crate::queues::DayService;
use crate::tier::{PerTier, Tier};
use serde::{Deserialize, Serialize};

/// Everything observable about one simulated day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub day: u32,
    /// State after transition and recoveries
    pub state: PopulationState,
    pub arrivals: PerTier<u64>,
    pub served: PerTier<u64>,
    pub net_new: PerTier<i64>,
    /// Queue lengths at end of day
    pub queues: PerTier<u64>,
    pub cumulative_served: PerTier<u64>,
    /// Ratios in force during the day (before any checkpoint adjustment)
    pub ratios: AllocationRatios,
    pub capacity: PerTier<u64>,
}

/// Allocation ratios on a reporting day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocationSnapshot {
    pub day: u32,
    pub mild: f64,
    pub moderate: f64,
    pub severe: f64,
}

/// End-of-horizon averages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub average_queue_lengths: PerTier<f64>,
    /// Mean queue length over final capacity, zero where capacity is zero
    pub average_waiting_times: PerTier<f64>,
}

#[derive(Debug, Clone)]
pub struct StatisticsAccumulator {
    initial_state: PopulationState,
    cumulative_served: PerTier<u64>,
    records: Vec<DayRecord>,
}

impl StatisticsAccumulator {
    pub fn new(initial_state: PopulationState, horizon: u32) -> Self {
        Self {
            initial_state,
            cumulative_served: PerTier::default(),
            records: Vec::with_capacity(horizon as usize),
        }
    }

    /// Appends one day.
    pub fn record(
        &mut self,
        day: u32,
        state: PopulationState,
        service: &DayService,
        queues: PerTier<u64>,
        ratios: AllocationRatios,
        capacity: PerTier<u64>,
    ) -> &DayRecord {
        self.cumulative_served = self
            .cumulative_served
            .zip_with(&service.served, |total, served| total.saturating_add(*served));

        self.records.push(DayRecord {
            day,
            state,
            arrivals: service.arrivals,
            served: service.served,
            net_new: service.net_new,
            queues,
            cumulative_served: self.cumulative_served,
            ratios,
            capacity,
        });
        &self.records[self.records.len() - 1]
    }

    pub fn records(&self) -> &[DayRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<DayRecord> {
        self.records
    }

    pub fn days_recorded(&self) -> usize {
        self.records.len()
    }

    pub fn cumulative_served(&self) -> &PerTier<u64> {
        &self.cumulative_served
    }

    /// Mean queue length over the last `window` recorded days (or all of
    /// them, if fewer were recorded). Zero when nothing was recorded.
    pub fn trailing_mean_queue(&self, window: usize) -> PerTier<f64> {
        let start = self.records.len().saturating_sub(window);
        mean_queue(&self.records[start..])
    }

    /// Mean queue length over the whole horizon.
    pub fn mean_queue(&self) -> PerTier<f64> {
        mean_queue(&self.records)
    }

    pub fn summarize(&self, final_capacity: &PerTier<u64>) -> Summary {
        let average_queue_lengths = self.mean_queue();
        let average_waiting_times = average_queue_lengths.zip_with(final_capacity, |mean, cap| {
            if *cap > 0 {
                mean / *cap as f64
            } else {
                0.0
            }
        });
        Summary {
            average_queue_lengths,
            average_waiting_times,
        }
    }

    /// Ratios recorded on every day divisible by `period`, day 0 included.
    pub fn allocation_snapshots(&self, period: u32) -> Vec<AllocationSnapshot> {
        self.records
            .iter()
            .filter(|r| period > 0 && r.day % period == 0)
            .map(|r| AllocationSnapshot {
                day: r.day,
                mild: r.ratios.mild,
                moderate: r.ratios.moderate,
                severe: r.ratios.severe,
            })
            .collect()
    }

    /// Active cases per tier, starting with the initial state.
    pub fn active_cases(&self) -> Vec<PerTier<f64>> {
        std::iter::once(&self.initial_state)
            .chain(self.records.iter().map(|r| &r.state))
            .map(|s| PerTier::from_fn(|tier: Tier| s.cases(tier)))
            .collect()
    }

    /// Cumulative recoveries per tier, starting at zero.
    pub fn cumulative_cured(&self) -> Vec<PerTier<u64>> {
        std::iter::once(PerTier::default())
            .chain(self.records.iter().map(|r| r.cumulative_served))
            .collect()
    }
}

fn mean_queue(records: &[DayRecord]) -> PerTier<f64> {
    if records.is_empty() {
        return PerTier::default();
    }
    let n = records.len() as f64;
    PerTier::from_fn(|tier| records.iter().map(|r| *r.queues.get(tier) as f64).sum::<f64>() / n)
}
