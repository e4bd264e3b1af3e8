//! CareQueue Simulator CLI
//!
//! Run the severity/queueing model for one or more scenarios and seeds.

use carequeue_core::{RatioPolicy, Scenario, SimConfig};
use carequeue_sim::{
    log_comparison, log_summary, ScenarioResult, ScenarioRunner, SimExport, SimulationRequest,
    SimulationResponse, DEFAULT_POPULATION,
};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// CareQueue simulation CLI
#[derive(Parser, Debug)]
#[command(name = "carequeue-sim")]
#[command(about = "Simulate mental-health severity progression and treatment queues", long_about = None)]
struct Args {
    /// Master seed for determinism (0 = random from time)
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Scenario to run (peace, crisis, all); defaults to the request's scenario
    #[arg(short = 'S', long)]
    scenario: Option<String>,

    /// Number of consecutive seeds to run
    #[arg(long, default_value = "1")]
    seeds: usize,

    /// Horizon in days (overrides the request)
    #[arg(short, long)]
    days: Option<u32>,

    /// Total doctors (overrides the request)
    #[arg(long)]
    doctors: Option<u64>,

    /// JSON request file; missing fields use the defaults
    #[arg(short, long)]
    request: Option<PathBuf>,

    /// Renormalize allocation ratios to sum to 1 after each adjustment
    #[arg(long)]
    renormalize: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON output
    #[arg(long)]
    json: bool,

    /// Export daily series to a JSON file for plotting
    #[arg(long)]
    export: Option<String>,
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    // Build the base configuration
    let (population, mut config) = match &args.request {
        Some(path) => {
            let validated = SimulationRequest::from_file(path)
                .and_then(|request| request.validate())
                .unwrap_or_else(|e| fail(e));
            (validated.population, validated.config)
        }
        None => (DEFAULT_POPULATION, SimConfig::default()),
    };
    if let Some(days) = args.days {
        config.sim_time = days;
    }
    if let Some(doctors) = args.doctors {
        config.total_doctors = doctors;
    }
    if args.renormalize {
        config = config.with_ratio_policy(RatioPolicy::Renormalize);
    }
    if let Err(e) = config.validate() {
        fail(e);
    }

    // Parse scenarios
    let scenarios: Vec<Scenario> = match args.scenario.as_deref() {
        Some("all") => Scenario::all(),
        Some(name) => vec![name.parse::<Scenario>().unwrap_or_else(|e| {
            eprintln!("Available scenarios: peace, crisis, all");
            fail(e)
        })],
        None => vec![config.scenario],
    };

    // Determine base seed
    let base_seed = if args.seed == 0 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(1)
    } else {
        args.seed
    };

    if !args.json {
        info!("CareQueue Simulator v{}", env!("CARGO_PKG_VERSION"));
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }

    // Handle --export mode
    if let Some(export_path) = &args.export {
        if scenarios.len() > 1 || args.seeds > 1 {
            fail("--export only supports a single scenario and seed");
        }

        let result = ScenarioRunner::new(base_seed, config).run(scenarios[0]);
        let Some(results) = &result.results else {
            fail(result.failure_reason.as_deref().unwrap_or("unknown"));
        };

        let export = SimExport::from_results(results, population);
        if let Err(e) = export.write_to_file(export_path) {
            error!("Failed to write export: {:?}", e);
            std::process::exit(1);
        }
        info!("Exported {} frames to {}", export.frames.len(), export_path);
        if !args.json {
            log_summary(results);
        }

        if !result.passed {
            std::process::exit(1);
        }
        return;
    }

    // Run simulations
    let mut all_results: Vec<ScenarioResult> = Vec::new();
    for seed_offset in 0..args.seeds {
        let seed = base_seed.wrapping_add(seed_offset as u64);
        let runner = ScenarioRunner::new(seed, config.clone());

        for scenario in &scenarios {
            let result = runner.run(*scenario);

            if !args.json {
                if let Some(results) = &result.results {
                    log_summary(results);
                }
                if result.passed {
                    info!("✓ {} (seed={}) invariants held", scenario.name(), seed);
                } else {
                    error!(
                        "✗ {} (seed={}) FAILED: {}",
                        scenario.name(),
                        seed,
                        result.failure_reason.as_deref().unwrap_or("unknown")
                    );
                }
            }

            all_results.push(result);
        }
    }

    let failed_count = all_results.iter().filter(|r| !r.passed).count();

    if args.json {
        let runs: Vec<serde_json::Value> = all_results
            .iter()
            .map(|r| {
                serde_json::json!({
                    "scenario": r.scenario.name(),
                    "seed": r.seed,
                    "passed": r.passed,
                    "failure_reason": r.failure_reason,
                    "response": r
                        .results
                        .as_ref()
                        .map(|results| SimulationResponse::from_results(results, population)),
                })
            })
            .collect();
        let summary = serde_json::json!({
            "total": all_results.len(),
            "failed": failed_count,
            "runs": runs,
        });
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => fail(e),
        }
    } else {
        if scenarios.len() > 1 {
            match ScenarioRunner::new(base_seed, config).compare() {
                Ok(comparison) => log_comparison(&comparison),
                Err(e) => error!("Comparison failed: {}", e),
            }
        }

        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        if failed_count == 0 {
            info!("✅ All {} run(s) passed", all_results.len());
        } else {
            error!("❌ {}/{} run(s) failed", failed_count, all_results.len());
        }
    }

    // Exit with proper code for CI
    if failed_count > 0 {
        std::process::exit(1);
    }
}
