//! CareQueue Core - severity progression coupled to treatment queues
//!
//! A population split across four severity states (healthy, mild, moderate,
//! severe) evolves day by day under a Markov chain. People entering a
//! treatable tier join that tier's queue; doctors serve the queues and
//! every served patient returns to healthy. Every 30 days a feedback
//! controller moves doctor share toward the most congested tiers.
//!
//! # Day Loop
//!
//! ```text
//!  state ──► TransitionModel ──► flux ──► ArrivalGenerator ──► arrivals
//!    ▲                                                          │
//!    │ recoveries                                               ▼
//!    └──────────────────────── QueueEngine ◄──── Staffing ◄── AllocationController
//!                                   │                               ▲
//!                                   ▼                               │
//!                          StatisticsAccumulator ── trailing means ─┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use carequeue_core::{run_simulation, Scenario, SimConfig};
//!
//! let config = SimConfig::default()
//!     .with_scenario(Scenario::Crisis)
//!     .with_seed(42);
//!
//! let results = run_simulation(&config)?;
//! println!("severe after a year: {:.0}", results.final_state.severe);
//! ```

pub mod allocation;
pub mod arrivals;
pub mod config;
pub mod controller;
pub mod error;
pub mod population;
pub mod queues;
pub mod scenario;
pub mod simulation;
pub mod statistics;
pub mod tier;
pub mod transition;

// Re-export key types for convenience
pub use allocation::{AllocationRatios, ServiceRates, Staffing, DEFAULT_SERVICE_RATES};
pub use arrivals::{ArrivalGenerator, SamplingFailure};
pub use config::{SimConfig, DEFAULT_INITIAL_QUEUES};
pub use controller::{AllocationController, ControllerConfig, ControllerEvent, RatioPolicy};
pub use error::{ConfigError, SimulationError};
pub use population::PopulationState;
pub use queues::{is_service_day, DayService, QueueEngine};
pub use scenario::Scenario;
pub use simulation::{run_simulation, run_simulation_with, Simulation, SimulationResults};
pub use statistics::{AllocationSnapshot, DayRecord, StatisticsAccumulator, Summary};
pub use tier::{PerTier, Tier};
pub use transition::{Flux, TransitionModel, TransitionStep};

pub use carequeue_env::RunId;
