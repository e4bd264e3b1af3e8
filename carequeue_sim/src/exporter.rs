//! JSON response and export documents.
//!
//! The response mirrors what a client of the simulation service receives;
//! the export adds the day-by-day series that plotting tools draw.

use carequeue_core::{AllocationRatios, PerTier, PopulationState, RunId, SimulationResults};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;

/// One row of the monthly allocation table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocationRecord {
    #[serde(rename = "Day")]
    pub day: u32,
    #[serde(rename = "Mild")]
    pub mild: f64,
    #[serde(rename = "Moderate")]
    pub moderate: f64,
    #[serde(rename = "Severe")]
    pub severe: f64,
}

/// Response document for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResponse {
    pub run_id: RunId,
    pub scenario: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub population: i64,
    pub final_state: PopulationState,
    pub average_waiting_times: PerTier<f64>,
    pub average_queue_lengths: PerTier<f64>,
    pub monthly_resource_allocations: Vec<AllocationRecord>,
    pub controller_triggers: usize,
    pub sampling_failures: usize,
}

impl SimulationResponse {
    pub fn from_results(results: &SimulationResults, population: i64) -> Self {
        Self {
            run_id: results.run_id,
            scenario: results.scenario.name().to_string(),
            seed: results.seed,
            population,
            final_state: results.final_state,
            average_waiting_times: results.average_waiting_times,
            average_queue_lengths: results.average_queue_lengths,
            monthly_resource_allocations: results
                .monthly_allocations
                .iter()
                .map(|s| AllocationRecord {
                    day: s.day,
                    mild: s.mild,
                    moderate: s.moderate,
                    severe: s.severe,
                })
                .collect(),
            controller_triggers: results.controller_triggers(),
            sampling_failures: results.sampling_failures.len(),
        }
    }
}

/// A single day of series data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayFrame {
    pub day: u32,
    pub queue_lengths: PerTier<u64>,
    pub allocation: AllocationRatios,
    pub net_new: PerTier<i64>,
    pub cumulative_cured: PerTier<u64>,
    pub active_cases: PerTier<f64>,
}

/// Complete simulation export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimExport {
    /// Summary as returned to clients
    pub response: SimulationResponse,

    /// Active cases before day 0
    pub initial_cases: PerTier<f64>,

    /// All frames
    pub frames: Vec<DayFrame>,
}

impl SimExport {
    /// Builds the export from a finished run.
    pub fn from_results(results: &SimulationResults, population: i64) -> Self {
        let s = &results.initial_state;
        let frames = results
            .daily
            .iter()
            .map(|r| DayFrame {
                day: r.day,
                queue_lengths: r.queues,
                allocation: r.ratios,
                net_new: r.net_new,
                cumulative_cured: r.cumulative_served,
                active_cases: PerTier::new(r.state.mild, r.state.moderate, r.state.severe),
            })
            .collect();

        Self {
            response: SimulationResponse::from_results(results, population),
            initial_cases: PerTier::new(s.mild, s.moderate, s.severe),
            frames,
        }
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carequeue_core::{run_simulation, SimConfig};

    fn results() -> SimulationResults {
        run_simulation(&SimConfig::default().with_sim_time(95).with_seed(21)).unwrap()
    }

    #[test]
    fn test_response_shape() {
        let response = SimulationResponse::from_results(&results(), 828_000);
        let json = serde_json::to_value(&response).unwrap();

        assert!(json["final_state"]["healthy"].is_number());
        assert!(json["average_waiting_times"]["severe"].is_number());
        assert!(json["average_queue_lengths"]["mild"].is_number());

        let months = json["monthly_resource_allocations"].as_array().unwrap();
        assert_eq!(months.len(), 4);
        assert_eq!(months[1]["Day"], 30);
        assert_eq!(months[0]["Mild"], 0.7);
    }

    #[test]
    fn test_export_frames() {
        let results = results();
        let export = SimExport::from_results(&results, 828_000);

        assert_eq!(export.frames.len(), 95);
        assert_eq!(export.initial_cases.mild, 20_000.0);
        let last = export.frames.last().unwrap();
        assert_eq!(last.cumulative_cured, results.daily[94].cumulative_served);
    }

    #[test]
    fn test_write_to_file() {
        let path = std::env::temp_dir().join("carequeue_export_test.json");
        let path = path.to_str().unwrap();

        SimExport::from_results(&results(), 1).write_to_file(path).unwrap();
        let written: SimExport =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written.frames.len(), 95);
        let _ = std::fs::remove_file(path);
    }
}
