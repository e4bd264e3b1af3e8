//! Common types for the CareQueue environment abstraction.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Identifier attached to one run's results.
///
/// Serializes as the full UUID; displays as its first eight hex digits.
/// Seeded runs derive it from the seed so a replay reports the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_seed(seed: u64) -> Self {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&seed.to_be_bytes());
        bytes[8..].copy_from_slice(&(!seed).rotate_left(17).to_be_bytes());
        Self(Uuid::from_bytes(bytes))
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hex = self.0.simple().to_string();
        f.write_str(&hex[..8])
    }
}

/// Cooperative cancellation flag shared between a caller and a running
/// simulation.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
    /// Creates a handle in the not-aborted state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that the run stop before its next day.
    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns true once `abort()` has been called on any clone.
    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
