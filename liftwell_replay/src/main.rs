// CLI entry point for replaying elevator scenarios.
//
// Loads a scenario file (worlds, pre-built floors, and a command script),
// runs it through the sandbox host with a real `ElevatorSystem`, and prints
// every move the system made followed by the floor indicator traffic.
// Useful for checking a config against a hand-written tower without a game
// server.
//
// Usage:
//   replay [OPTIONS] SCENARIO
//     --config <FILE>    Elevator config JSON (default: built-in defaults)
//     --verbose, -v      Log at debug level (RUST_LOG overrides)

mod logging;

use std::error::Error;
use std::path::PathBuf;

use liftwell_sim::config::ElevatorConfig;
use liftwell_sim::sandbox::{FeedbackEvent, Sandbox, Scenario};
use log::warn;

struct Args {
    config: Option<PathBuf>,
    verbose: bool,
    scenario: PathBuf,
}

fn main() {
    let args = parse_args();
    logging::init(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("Replay failed: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => ElevatorConfig::load(path)?,
        None => ElevatorConfig::default(),
    };
    if let Err(e) = config.validate() {
        warn!("config problem: {e}");
    }

    let scenario = Scenario::load(&args.scenario)?;
    let mut sandbox = Sandbox::from_scenario(&scenario, config)?;
    let result = sandbox.run(&scenario)?;

    for record in &result.moves {
        println!(
            "tick {:>6}  {}  -> {}  (floor {} of {})",
            record.tick,
            record.agent,
            record.moved.target,
            record.moved.rank,
            record.moved.floor_count
        );
    }
    for floor in &result.removed_floors {
        println!("floor removed: {floor}");
    }
    for event in sandbox.host.feedback() {
        match event {
            FeedbackEvent::ShowIndicator { agent, title, .. } => {
                println!("indicator  {agent}  {title}");
            }
            FeedbackEvent::HideIndicator { agent } => {
                println!("indicator  {agent}  hidden");
            }
            FeedbackEvent::Teleport { .. } => {}
        }
    }
    println!(
        "{} move(s) through tick {}",
        result.moves.len(),
        sandbox.tick()
    );

    sandbox.elevators.shutdown();
    Ok(())
}

/// Parse command-line arguments. Plain `std::env::args()` matching.
fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut config = None;
    let mut verbose = false;
    let mut scenario = None;
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                config = Some(args.get(i).map(PathBuf::from).unwrap_or_else(|| {
                    eprintln!("--config requires a file path");
                    std::process::exit(1);
                }));
            }
            "--verbose" | "-v" => verbose = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                std::process::exit(1);
            }
            path => {
                if scenario.is_some() {
                    eprintln!("Only one scenario file may be given");
                    std::process::exit(1);
                }
                scenario = Some(PathBuf::from(path));
            }
        }
        i += 1;
    }

    let Some(scenario) = scenario else {
        print_usage();
        std::process::exit(1);
    };
    Args {
        config,
        verbose,
        scenario,
    }
}

fn print_usage() {
    println!("Usage: replay [OPTIONS] SCENARIO");
    println!();
    println!("Options:");
    println!("  --config <FILE>    Elevator config JSON (default: built-in defaults)");
    println!("  --verbose, -v      Log at debug level (RUST_LOG overrides)");
    println!("  --help, -h         Show this help");
}
