//! CareQueue Simulation Harness
//!
//! The calling layer around `carequeue_core`: it turns requests into
//! validated configurations, runs scenarios over one or more seeds, checks
//! every run against the model's invariants, and maps results into the JSON
//! documents external tooling (dashboards, plotting scripts) consumes.
//!
//! # Usage
//!
//! ```ignore
//! use carequeue_sim::{ScenarioRunner, SimulationRequest};
//!
//! let request = SimulationRequest::from_json(r#"{"scenario": "crisis"}"#)?;
//! let validated = request.validate()?;
//!
//! let runner = ScenarioRunner::new(42, validated.config);
//! let result = runner.run(carequeue_core::Scenario::Crisis);
//! assert!(result.passed);
//! ```

mod exporter;
mod report;
mod request;
mod runner;

pub use exporter::{AllocationRecord, DayFrame, SimExport, SimulationResponse};
pub use report::{log_comparison, log_summary};
pub use request::{RequestError, SimulationRequest, ValidatedRequest, DEFAULT_POPULATION};
pub use runner::{check_invariants, ScenarioComparison, ScenarioResult, ScenarioRunner};
