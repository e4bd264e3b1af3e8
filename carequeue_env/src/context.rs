//! Core environment trait for simulation runs.

use rand::RngCore;

/// The interface between the day loop and the outside world.
///
/// # Implementations
///
/// - **Replay**: `SeededContext` - ChaCha8 stream derived from a 64-bit seed
/// - **Live**: `EntropyContext` - `StdRng` seeded from OS entropy
///
/// # Determinism
///
/// Every random draw the core makes goes through `rng()`. Two runs handed
/// contexts with the same seed and the same configuration produce identical
/// trajectories.
pub trait SimEnvironment {
    /// Returns the random source for arrival sampling.
    fn rng(&mut self) -> &mut dyn RngCore;

    /// Returns the seed behind `rng()`, if the run is replayable.
    ///
    /// Entropy-backed contexts return `None`.
    fn seed(&self) -> Option<u64>;

    /// Returns true once the embedding caller has asked the run to stop.
    ///
    /// Polled by the driver before each day starts.
    fn should_abort(&self) -> bool {
        false
    }
}
