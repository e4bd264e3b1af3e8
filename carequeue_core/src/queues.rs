//! Queue/service engine.
//!
//! Holds the three waiting queues and the current staffing. Each day it
//! admits arrivals, serves up to capacity on working days, and feeds the
//! served patients back into the population state as recoveries.

use crate::allocation::{AllocationRatios, ServiceRates, Staffing};
use crate::population::PopulationState;
use crate::tier::PerTier;
use serde::{Deserialize, Serialize};

/// Length of the service week in days. Day 0 is a Monday.
pub const DAYS_PER_WEEK: u32 = 7;

/// Returns false on the two non-working days of each week (`day % 7` of 5 or 6).
pub fn is_service_day(day: u32) -> bool {
    !matches!(day % DAYS_PER_WEEK, 5 | 6)
}

/// Outcome of one day at the queues.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayService {
    pub arrivals: PerTier<u64>,
    pub served: PerTier<u64>,
    /// `arrivals - served`; negative when the backlog shrank
    pub net_new: PerTier<i64>,
}

/// The three treatment queues and the doctors serving them.
#[derive(Debug, Clone)]
pub struct QueueEngine {
    queues: PerTier<u64>,
    total_doctors: u64,
    rates: ServiceRates,
    staffing: Staffing,
}

impl QueueEngine {
    pub fn new(
        initial_queues: PerTier<u64>,
        total_doctors: u64,
        rates: ServiceRates,
        ratios: &AllocationRatios,
    ) -> Self {
        Self {
            queues: initial_queues,
            total_doctors,
            rates,
            staffing: Staffing::new(total_doctors, ratios, &rates),
        }
    }

    pub fn queues(&self) -> &PerTier<u64> {
        &self.queues
    }

    pub fn staffing(&self) -> &Staffing {
        &self.staffing
    }

    pub fn capacity(&self) -> &PerTier<u64> {
        &self.staffing.capacity
    }

    /// Recomputes doctor counts and capacity from new ratios.
    pub fn reallocate(&mut self, ratios: &AllocationRatios) -> Staffing {
        self.staffing = Staffing::new(self.total_doctors, ratios, &self.rates);
        self.staffing
    }

    /// Admits today's arrivals, serves on working days, and moves served
    /// patients to healthy in `state`.
    pub fn serve_day(
        &mut self,
        day: u32,
        arrivals: PerTier<u64>,
        state: &mut PopulationState,
    ) -> DayService {
        let working = is_service_day(day);
        let mut served: PerTier<u64> = PerTier::default();

        for (tier, count) in arrivals.iter() {
            let queue = self.queues.get_mut(tier);
            *queue = queue.saturating_add(*count);

            if working {
                let done = (*queue).min(*self.staffing.capacity.get(tier));
                *queue -= done;
                *served.get_mut(tier) = done;
                state.recover(tier, done);
            }
        }

        let net_new = arrivals.zip_with(&served, |a, s| *a as i64 - *s as i64);
        DayService {
            arrivals,
            served,
            net_new,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::DEFAULT_SERVICE_RATES;
    use crate::tier::Tier;

    fn engine(queues: PerTier<u64>, doctors: u64) -> QueueEngine {
        QueueEngine::new(queues, doctors, DEFAULT_SERVICE_RATES, &AllocationRatios::default())
    }

    #[test]
    fn test_service_days() {
        let working: Vec<u32> = (0..14).filter(|d| is_service_day(*d)).collect();
        assert_eq!(working, vec![0, 1, 2, 3, 4, 7, 8, 9, 10, 11]);
    }

    #[test]
    fn test_serve_caps_at_capacity() {
        // capacity: mild 70, moderate 10, severe 1
        let mut engine = engine(PerTier::new(100, 5, 3), 10);
        let mut state = PopulationState::new(0.0, 200.0, 50.0, 10.0);

        let day = engine.serve_day(0, PerTier::new(20, 2, 0), &mut state);

        assert_eq!(day.served, PerTier::new(70, 7, 1));
        assert_eq!(*engine.queues(), PerTier::new(50, 0, 2));
        assert_eq!(day.net_new, PerTier::new(-50, -5, -1));
        assert_eq!(state.healthy, 78.0);
        assert_eq!(state.mild, 130.0);
    }

    #[test]
    fn test_huge_backlog_saturates() {
        let mut engine = engine(PerTier::new(u64::MAX - 1, 0, 0), 0);
        let mut state = PopulationState::default();

        let day = engine.serve_day(5, PerTier::new(10, 0, 0), &mut state);

        assert_eq!(engine.queues().mild, u64::MAX);
        assert_eq!(day.served, PerTier::new(0, 0, 0));
    }

    #[test]
    fn test_weekend_serves_nobody() {
        let mut engine = engine(PerTier::new(100, 50, 10), 1000);
        let mut state = PopulationState::default();
        let before = state;

        for day in [5, 6, 12, 13] {
            let queues = *engine.queues();
            let result = engine.serve_day(day, PerTier::new(3, 2, 1), &mut state);

            assert_eq!(result.served, PerTier::new(0, 0, 0));
            assert_eq!(engine.queues().mild, queues.mild + 3);
            assert_eq!(engine.queues().severe, queues.severe + 1);
        }
        assert_eq!(state, before);
    }

    #[test]
    fn test_zero_doctors_never_serve() {
        let mut engine = engine(PerTier::new(10, 10, 10), 0);
        let mut state = PopulationState::default();

        let result = engine.serve_day(0, PerTier::new(1, 1, 1), &mut state);

        assert_eq!(result.served, PerTier::new(0, 0, 0));
        assert_eq!(*engine.queues(), PerTier::new(11, 11, 11));
    }

    #[test]
    fn test_reallocate_updates_capacity() {
        let mut engine = engine(PerTier::default(), 1000);
        let staffing = engine.reallocate(&AllocationRatios::new(0.5, 0.3, 0.2));

        assert_eq!(staffing.doctors, PerTier::new(500, 300, 200));
        assert_eq!(*engine.capacity().get(Tier::Moderate), 1500);
    }
}
