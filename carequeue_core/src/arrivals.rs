//! Poisson arrival generator.

use crate::tier::{PerTier, Tier};
use crate::transition::Flux;
use rand::Rng;
use rand_distr::{Distribution, Poisson};
use serde::Serialize;
use tracing::warn;

/// A day on which a tier's arrival rate could not be sampled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SamplingFailure {
    pub day: u32,
    pub tier: Tier,
    /// The rejected rate (serialized as `null` when NaN)
    pub rate: f64,
    pub reason: String,
}

/// Converts expected flux into integer arrival counts.
///
/// A rate the sampler rejects (NaN, negative, infinite) yields zero
/// arrivals for that tier and day; the failure is logged and kept for
/// diagnostics instead of aborting the run.
#[derive(Debug, Clone, Default)]
pub struct ArrivalGenerator {
    failures: Vec<SamplingFailure>,
}

impl ArrivalGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Samples one arrival count per tier, in tier order.
    pub fn sample<R: Rng + ?Sized>(&mut self, day: u32, flux: &Flux, rng: &mut R) -> PerTier<u64> {
        PerTier::new(
            self.sample_tier(day, Tier::Mild, flux.mild, rng),
            self.sample_tier(day, Tier::Moderate, flux.moderate, rng),
            self.sample_tier(day, Tier::Severe, flux.severe, rng),
        )
    }

    fn sample_tier<R: Rng + ?Sized>(&mut self, day: u32, tier: Tier, rate: f64, rng: &mut R) -> u64 {
        // A zero mean is a valid (empty) day, not a sampling failure
        if rate == 0.0 {
            return 0;
        }
        if !rate.is_finite() {
            self.record(day, tier, rate, "rate is not finite".to_string());
            return 0;
        }

        match Poisson::new(rate) {
            Ok(poisson) => {
                let draw: f64 = poisson.sample(rng);
                draw as u64
            }
            Err(e) => {
                self.record(day, tier, rate, e.to_string());
                0
            }
        }
    }

    fn record(&mut self, day: u32, tier: Tier, rate: f64, reason: String) {
        warn!(day, %tier, rate, %reason, "Failed to sample arrivals, substituting zero");
        self.failures.push(SamplingFailure {
            day,
            tier,
            rate,
            reason,
        });
    }

    /// Returns every sampling failure recorded so far.
    pub fn failures(&self) -> &[SamplingFailure] {
        &self.failures
    }

    pub fn into_failures(self) -> Vec<SamplingFailure> {
        self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_zero_rate_yields_zero_without_failure() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut generator = ArrivalGenerator::new();

        let arrivals = generator.sample(0, &Flux::default(), &mut rng);

        assert_eq!(arrivals, PerTier::new(0, 0, 0));
        assert!(generator.failures().is_empty());
    }

    #[test]
    fn test_nan_rate_substitutes_zero_and_records() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut generator = ArrivalGenerator::new();

        let arrivals = generator.sample(12, &Flux::new(50.0, f64::NAN, 5.0), &mut rng);

        assert_eq!(arrivals.moderate, 0);
        assert_eq!(generator.failures().len(), 1);
        assert_eq!(generator.failures()[0].day, 12);
        assert_eq!(generator.failures()[0].tier, Tier::Moderate);
    }

    #[test]
    fn test_negative_and_infinite_rates_are_failures() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut generator = ArrivalGenerator::new();

        let arrivals = generator.sample(3, &Flux::new(-1.0, f64::INFINITY, 0.0), &mut rng);

        assert_eq!(arrivals, PerTier::new(0, 0, 0));
        let tiers: Vec<Tier> = generator.failures().iter().map(|f| f.tier).collect();
        assert_eq!(tiers, vec![Tier::Mild, Tier::Moderate]);
    }

    #[test]
    fn test_deterministic_sampling() {
        let flux = Flux::new(4000.0, 300.0, 12.5);
        let mut gen1 = ArrivalGenerator::new();
        let mut gen2 = ArrivalGenerator::new();
        let mut rng1 = ChaCha8Rng::seed_from_u64(42);
        let mut rng2 = ChaCha8Rng::seed_from_u64(42);

        for day in 0..20 {
            assert_eq!(gen1.sample(day, &flux, &mut rng1), gen2.sample(day, &flux, &mut rng2));
        }
    }

    #[test]
    fn test_sample_mean_tracks_rate() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut generator = ArrivalGenerator::new();
        let flux = Flux::new(100.0, 10.0, 1.0);

        let days = 2000;
        let mut total = PerTier::new(0u64, 0, 0);
        for day in 0..days {
            let a = generator.sample(day, &flux, &mut rng);
            total = total.zip_with(&a, |x, y| x + y);
        }

        let mean_mild = total.mild as f64 / days as f64;
        let mean_severe = total.severe as f64 / days as f64;
        assert!((mean_mild - 100.0).abs() < 2.0, "mild mean {}", mean_mild);
        assert!((mean_severe - 1.0).abs() < 0.15, "severe mean {}", mean_severe);
    }
}
