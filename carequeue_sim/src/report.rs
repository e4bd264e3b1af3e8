//! Human-readable run summaries.

use crate::runner::ScenarioComparison;
use carequeue_core::{SimulationResults, Tier};
use tracing::info;

/// Logs the end-of-horizon summary for one run.
pub fn log_summary(results: &SimulationResults) {
    let days = results.days_simulated;
    for tier in Tier::ALL {
        info!(
            "Number of {} cases after {} days: {:.0}",
            tier,
            days,
            results.final_state.cases(tier)
        );
    }
    for (tier, wait) in results.average_waiting_times.iter() {
        info!("Average waiting time for {} cases: {:.2} days", tier, wait);
    }
    for (tier, length) in results.average_queue_lengths.iter() {
        info!("Average queue length for {} cases: {:.2}", tier, length);
    }

    info!("Monthly resource allocation ratios:");
    info!("  {:>5} {:>8} {:>8} {:>8}", "Day", "Mild", "Moderate", "Severe");
    for snapshot in &results.monthly_allocations {
        info!(
            "  {:>5} {:>8.3} {:>8.3} {:>8.3}",
            snapshot.day, snapshot.mild, snapshot.moderate, snapshot.severe
        );
    }

    if !results.sampling_failures.is_empty() {
        info!(
            "{} arrival sample(s) replaced with zero",
            results.sampling_failures.len()
        );
    }
}

/// Logs a peace vs crisis comparison.
pub fn log_comparison(comparison: &ScenarioComparison) {
    info!("Peace vs crisis (seed={}):", comparison.seed);
    for tier in Tier::ALL {
        info!(
            "  {:<8} mean queue {:>12.1} vs {:>12.1}",
            tier.name(),
            comparison.peace_queue_lengths.get(tier),
            comparison.crisis_queue_lengths.get(tier)
        );
    }
    info!(
        "  controller rules fired: {} vs {}",
        comparison.peace_rules_fired, comparison.crisis_rules_fired
    );
}
