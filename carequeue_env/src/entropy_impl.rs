//! Live implementation of SimEnvironment using OS entropy.

use crate::context::SimEnvironment;
use crate::types::AbortHandle;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Context backed by OS entropy.
///
/// Used when the caller does not ask for a replayable run.
pub struct EntropyContext {
    rng: StdRng,
    abort: Option<AbortHandle>,
}

impl EntropyContext {
    /// Creates a new EntropyContext.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            abort: None,
        }
    }

    /// Attaches a cancellation flag checked between days.
    pub fn with_abort(mut self, handle: AbortHandle) -> Self {
        self.abort = Some(handle);
        self
    }
}

impl Default for EntropyContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SimEnvironment for EntropyContext {
    fn rng(&mut self) -> &mut dyn RngCore {
        &mut self.rng
    }

    fn seed(&self) -> Option<u64> {
        // Live runs are not replayable
        None
    }

    fn should_abort(&self) -> bool {
        self.abort.as_ref().is_some_and(AbortHandle::is_aborted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entropy_context_has_no_seed() {
        let ctx = EntropyContext::new();
        assert_eq!(ctx.seed(), None);
    }

    #[test]
    fn test_entropy_context_abort() {
        let handle = AbortHandle::new();
        let ctx = EntropyContext::default().with_abort(handle.clone());
        assert!(!ctx.should_abort());

        handle.abort();
        assert!(ctx.should_abort());
    }
}
