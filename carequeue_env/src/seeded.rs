//! Seeded context for deterministic replays.

use crate::context::SimEnvironment;
use crate::types::AbortHandle;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Simulation context backed by a seeded ChaCha8 RNG.
///
/// Each instance owns its own stream, so concurrent runs never share
/// random state even when they were given the same seed.
pub struct SeededContext {
    /// Master seed for this run
    seed: u64,

    /// Deterministic RNG for arrival sampling
    rng: ChaCha8Rng,

    /// Optional cancellation flag owned by the caller
    abort: Option<AbortHandle>,
}

impl SeededContext {
    /// Creates a new SeededContext with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            abort: None,
        }
    }

    /// Attaches a cancellation flag checked between days.
    pub fn with_abort(mut self, handle: AbortHandle) -> Self {
        self.abort = Some(handle);
        self
    }
}

impl SimEnvironment for SeededContext {
    fn rng(&mut self) -> &mut dyn RngCore {
        &mut self.rng
    }

    fn seed(&self) -> Option<u64> {
        Some(self.seed)
    }

    fn should_abort(&self) -> bool {
        self.abort.as_ref().is_some_and(AbortHandle::is_aborted)
    }
}
