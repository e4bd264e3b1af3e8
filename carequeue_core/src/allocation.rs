//! Allocation ratios, doctor counts, and daily service capacity.

use crate::error::ConfigError;
use crate::tier::{PerTier, Tier};
use serde::{Deserialize, Serialize};

/// Patients a single doctor treats per day, per tier.
pub type ServiceRates = PerTier<u64>;

pub const DEFAULT_SERVICE_RATES: ServiceRates = PerTier {
    mild: 10,
    moderate: 5,
    severe: 1,
};

/// Fraction of the doctor pool assigned to each tier.
///
/// Each ratio stays in `[0, 1]`. The three are expected to sum to 1 but
/// nothing enforces it: [`AllocationRatios::shift_toward`] can leave the
/// sum above 1 once a ratio has hit its floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocationRatios {
    pub mild: f64,
    pub moderate: f64,
    pub severe: f64,
}

impl AllocationRatios {
    pub fn new(mild: f64, moderate: f64, severe: f64) -> Self {
        Self {
            mild,
            moderate,
            severe,
        }
    }

    pub fn get(&self, tier: Tier) -> f64 {
        match tier {
            Tier::Mild => self.mild,
            Tier::Moderate => self.moderate,
            Tier::Severe => self.severe,
        }
    }

    fn get_mut(&mut self, tier: Tier) -> &mut f64 {
        match tier {
            Tier::Mild => &mut self.mild,
            Tier::Moderate => &mut self.moderate,
            Tier::Severe => &mut self.severe,
        }
    }

    pub fn sum(&self) -> f64 {
        self.mild + self.moderate + self.severe
    }

    /// Moves `delta` toward `target` (capped at 1.0) and takes `delta / 2`
    /// from each of the other two tiers (floored at 0.0).
    pub fn shift_toward(&mut self, target: Tier, delta: f64) {
        for tier in Tier::ALL {
            let ratio = self.get_mut(tier);
            if tier == target {
                *ratio = (*ratio + delta).min(1.0);
            } else {
                *ratio = (*ratio - delta / 2.0).max(0.0);
            }
        }
    }

    /// Scales the ratios to sum to 1. A zero sum is left untouched.
    pub fn renormalized(&self) -> Self {
        let sum = self.sum();
        if sum > 0.0 {
            Self::new(self.mild / sum, self.moderate / sum, self.severe / sum)
        } else {
            *self
        }
    }

    pub fn is_within_unit(&self) -> bool {
        Tier::ALL
            .iter()
            .all(|tier| (0.0..=1.0).contains(&self.get(*tier)))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for tier in Tier::ALL {
            let value = self.get(tier);
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidRatio { tier, value });
            }
        }
        Ok(())
    }
}

impl Default for AllocationRatios {
    fn default() -> Self {
        Self::new(0.7, 0.2, 0.1)
    }
}

/// Doctor counts and the daily capacity they provide.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Staffing {
    pub doctors: PerTier<u64>,
    pub capacity: PerTier<u64>,
}

impl Staffing {
    /// Splits `total_doctors` by `ratios`.
    ///
    /// Mild and moderate get `floor(total * ratio)`; severe takes the
    /// remainder so the counts always sum to `total_doctors`. When drift
    /// pushes the ratio sum past 1, moderate is capped so the remainder
    /// never goes negative.
    pub fn new(total_doctors: u64, ratios: &AllocationRatios, rates: &ServiceRates) -> Self {
        let share = |ratio: f64| (total_doctors as f64 * ratio).floor() as u64;

        let mild = share(ratios.mild).min(total_doctors);
        let moderate = share(ratios.moderate).min(total_doctors - mild);
        let severe = total_doctors - mild - moderate;

        let doctors = PerTier::new(mild, moderate, severe);
        let capacity = doctors.zip_with(rates, |d, r| d.saturating_mul(*r));
        Self { doctors, capacity }
    }

    /// Checks that the whole pool on any single tier yields a representable
    /// daily capacity.
    pub fn check_capacity(total_doctors: u64, rates: &ServiceRates) -> Result<(), ConfigError> {
        for (_, rate) in rates.iter() {
            if total_doctors.checked_mul(*rate).is_none() {
                return Err(ConfigError::CapacityOverflow {
                    doctors: total_doctors,
                    rate: *rate,
                });
            }
        }
        Ok(())
    }

    pub fn total_doctors(&self) -> u64 {
        self.doctors.sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_staffing() {
        let staffing = Staffing::new(1000, &AllocationRatios::default(), &DEFAULT_SERVICE_RATES);

        assert_eq!(staffing.doctors, PerTier::new(700, 200, 100));
        assert_eq!(staffing.capacity, PerTier::new(7000, 1000, 100));
    }

    #[test]
    fn test_severe_absorbs_remainder() {
        let ratios = AllocationRatios::new(0.333, 0.333, 0.0);
        let staffing = Staffing::new(10, &ratios, &DEFAULT_SERVICE_RATES);

        assert_eq!(staffing.doctors, PerTier::new(3, 3, 4));
        assert_eq!(staffing.total_doctors(), 10);
    }

    #[test]
    fn test_overcommitted_ratios_keep_counts_nonnegative() {
        let ratios = AllocationRatios::new(0.8, 0.4, 0.1);
        let staffing = Staffing::new(1000, &ratios, &DEFAULT_SERVICE_RATES);

        assert_eq!(staffing.doctors, PerTier::new(800, 200, 0));
        assert_eq!(staffing.total_doctors(), 1000);
    }

    #[test]
    fn test_capacity_overflow_detected() {
        assert!(Staffing::check_capacity(1000, &DEFAULT_SERVICE_RATES).is_ok());
        assert_eq!(
            Staffing::check_capacity(u64::MAX / 4, &DEFAULT_SERVICE_RATES),
            Err(ConfigError::CapacityOverflow {
                doctors: u64::MAX / 4,
                rate: 10
            })
        );

        // the split itself saturates rather than wrapping
        let staffing = Staffing::new(u64::MAX / 4, &AllocationRatios::default(), &DEFAULT_SERVICE_RATES);
        assert_eq!(staffing.capacity.mild, u64::MAX);
    }

    #[test]
    fn test_zero_doctors_zero_capacity() {
        let staffing = Staffing::new(0, &AllocationRatios::default(), &DEFAULT_SERVICE_RATES);
        assert_eq!(staffing.capacity, PerTier::new(0, 0, 0));
    }

    #[test]
    fn test_shift_toward_severe() {
        let mut ratios = AllocationRatios::default();
        ratios.shift_toward(Tier::Severe, 0.05);

        assert_relative_eq!(ratios.mild, 0.675, epsilon = 1e-12);
        assert_relative_eq!(ratios.moderate, 0.175, epsilon = 1e-12);
        assert_relative_eq!(ratios.severe, 0.15, epsilon = 1e-12);
    }

    #[test]
    fn test_shift_toward_respects_bounds_and_drifts() {
        let mut ratios = AllocationRatios::new(0.98, 0.01, 0.01);
        ratios.shift_toward(Tier::Mild, 0.05);

        assert_eq!(ratios.mild, 1.0);
        assert_eq!(ratios.moderate, 0.0);
        assert_eq!(ratios.severe, 0.0);
        assert!(ratios.is_within_unit());
    }

    #[test]
    fn test_floor_makes_sum_exceed_one() {
        let mut ratios = AllocationRatios::new(0.5, 0.5, 0.0);
        ratios.shift_toward(Tier::Mild, 0.05);

        // severe cannot go below zero, so only moderate pays
        assert_relative_eq!(ratios.sum(), 1.025, epsilon = 1e-12);
        assert_relative_eq!(ratios.renormalized().sum(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let err = AllocationRatios::new(0.5, 1.5, 0.0).validate().unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidRatio {
                tier: Tier::Moderate,
                value: 1.5
            }
        );
        assert!(AllocationRatios::new(f64::NAN, 0.0, 0.0).validate().is_err());
    }
}
