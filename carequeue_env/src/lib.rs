//! CareQueue Environment Abstraction Layer
//!
//! This crate isolates every source of non-determinism the simulation core
//! touches, so the same day loop can run either as a reproducible replay or
//! against OS entropy.
//!
//! # Core Concept
//!
//! The day loop never reaches for a global RNG or a global flag:
//! - Randomness (`rng()`) comes from the environment it is handed
//! - Cancellation (`should_abort()`) is polled between days, never inside one
//!
//! By deriving all entropy from a single 64-bit seed, any trajectory becomes
//! reproducible via its seed number.
//!
//! # Example
//!
//! ```ignore
//! use carequeue_env::{SeededContext, SimEnvironment};
//!
//! fn run_days<E: SimEnvironment>(env: &mut E, days: u32) {
//!     for day in 0..days {
//!         if env.should_abort() {
//!             break;
//!         }
//!         step(day, env.rng());
//!     }
//! }
//! ```

mod context;
mod entropy_impl;
mod seeded;
mod types;

pub use context::SimEnvironment;
pub use entropy_impl::EntropyContext;
pub use seeded::SeededContext;
pub use types::{AbortHandle, RunId};
