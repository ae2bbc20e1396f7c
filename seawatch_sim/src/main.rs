//! Seawatch navigation simulator CLI
//!
//! Runs the navigator through scripted scenarios on a virtual clock.

use clap::Parser;
use seawatch_core::NavConfig;
use seawatch_sim::scenarios::ScenarioId;
use seawatch_sim::{ScenarioResult, ScenarioRunner};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Seawatch deterministic navigation simulator
#[derive(Parser, Debug)]
#[command(name = "seawatch-sim")]
#[command(about = "Run deterministic navigation scenarios for Seawatch", long_about = None)]
struct Args {
    /// Master seed for determinism (0 = random from time)
    #[arg(short, long, default_value = "42")]
    seed: u64,
    
    /// Scenario to run (single_leg, patrol, abort, pause_resume, hazard, station_keeping, all)
    #[arg(short = 'S', long, default_value = "all")]
    scenario: String,
    
    /// Tick budget per mission
    #[arg(short, long, default_value = "20000")]
    max_ticks: u64,
    
    /// JSON file with navigator overrides (missing fields keep defaults)
    #[arg(short, long)]
    config: Option<String>,
    
    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
    
    /// JSON output for CI parsing
    #[arg(long)]
    json: bool,
    
    /// Export the track of a single scenario to a JSON file
    #[arg(long)]
    export: Option<String>,
}

fn load_config(path: &str) -> Result<NavConfig, String> {
    let raw = std::fs::read_to_string(path).map_err(|e| format!("cannot read {}: {}", path, e))?;
    NavConfig::from_json(&raw).map_err(|e| format!("{}: {}", path, e))
}

fn main() {
    let args = Args::parse();
    
    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
    
    if !args.json {
        info!("Seawatch Navigation Simulator v{}", env!("CARGO_PKG_VERSION"));
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }
    
    // Parse scenarios
    let scenarios: Vec<ScenarioId> = if args.scenario == "all" {
        ScenarioId::all()
    } else {
        vec![args.scenario.parse().unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            eprintln!("Available scenarios: single_leg, patrol, abort, pause_resume, hazard, station_keeping, all");
            std::process::exit(1);
        })]
    };
    
    let nav = match args.config.as_deref().map(load_config) {
        Some(Ok(config)) => {
            info!("Loaded navigator config from {}", args.config.as_deref().unwrap_or_default());
            config
        }
        Some(Err(e)) => {
            error!("Invalid config: {}", e);
            std::process::exit(1);
        }
        None => NavConfig::default(),
    };
    
    // Determine base seed
    let seed = if args.seed == 0 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    } else {
        args.seed
    };
    
    let runner = match ScenarioRunner::new(seed).with_max_ticks(args.max_ticks).with_config(nav) {
        Ok(runner) => runner,
        Err(e) => {
            error!("Invalid config: {}", e);
            std::process::exit(1);
        }
    };
    
    // Handle --export mode
    if let Some(export_path) = &args.export {
        if scenarios.len() > 1 {
            eprintln!("Error: --export only supports a single scenario, not 'all'");
            std::process::exit(1);
        }
        
        let (result, export) = runner.run_with_export(scenarios[0]);
        if let Err(e) = export.write_to_file(export_path) {
            error!("Failed to write export: {:?}", e);
            std::process::exit(1);
        }
        info!("Exported {} frames to {}", export.frames.len(), export_path);
        
        report(&[result], args.json);
        return;
    }
    
    let results: Vec<ScenarioResult> = scenarios.iter().map(|s| runner.run(*s)).collect();
    report(&results, args.json);
}

/// Prints the summary and exits non-zero if anything failed.
fn report(results: &[ScenarioResult], json: bool) {
    let total = results.len();
    let failed_count = results.iter().filter(|r| !r.passed).count();
    let passed = total - failed_count;
    
    if json {
        // JSON output for CI parsing
        let summary = serde_json::json!({
            "total": total,
            "passed": passed,
            "failed": failed_count,
            "results": results.iter().map(|r| {
                serde_json::json!({
                    "scenario": r.scenario.name(),
                    "seed": r.seed,
                    "passed": r.passed,
                    "ticks": r.total_ticks,
                    "time_secs": r.final_time_secs,
                    "final_position": r.final_position,
                    "waypoints_reached": r.metrics.waypoints_reached,
                    "hazards_raised": r.metrics.hazards_raised,
                    "max_turn_deg": r.metrics.max_turn_deg,
                    "mission_stats": r.metrics.stats,
                    "failure_reason": r.failure_reason,
                })
            }).collect::<Vec<_>>(),
        });
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{}", text),
            Err(e) => error!("Failed to render summary: {}", e),
        }
    } else {
        for result in results {
            if result.passed {
                info!("✓ {} (seed={}) PASSED", result.scenario.name(), result.seed);
                if let Some(stats) = result.metrics.stats {
                    info!("    {} | {} | {}", stats.distance_label(), stats.fuel_label(), stats.duration_label());
                }
            } else {
                error!("✗ {} (seed={}) FAILED: {}", 
                    result.scenario.name(), 
                    result.seed, 
                    result.failure_reason.as_deref().unwrap_or("unknown")
                );
            }
        }
        
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        if failed_count == 0 {
            info!("✅ All {} scenario runs passed!", total);
        } else {
            error!("❌ {}/{} scenario runs failed!", failed_count, total);
        }
    }
    
    // Exit with proper code for CI
    if failed_count > 0 {
        std::process::exit(1);
    }
}
