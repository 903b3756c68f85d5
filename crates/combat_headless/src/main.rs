//! Headless encounter runner.
//!
//! This binary runs encounters without graphics, for CI verification,
//! balance batches and soak runs. Metrics go to stdout as JSON; logs go
//! to stderr.
//!
//! # Usage
//!
//! ```bash
//! # Run the built-in skirmish
//! cargo run -p combat_headless -- run
//!
//! # Run a scenario file for a fixed tick count
//! cargo run -p combat_headless -- run --scenario scenarios/rat_pod.ron --ticks 400
//!
//! # Run a balance batch across 100 seeds
//! cargo run -p combat_headless -- batch --runs 100 --vary-seed
//! ```

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use combat_headless::{
    batch::{run_batch, BatchConfig},
    runner::HeadlessRunner,
    scenario::Scenario,
};

#[derive(Parser)]
#[command(name = "combat_headless")]
#[command(about = "Headless combat encounter runner for CI and balance testing")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single encounter and print its metrics
    Run {
        /// Scenario file to load (built-in skirmish when omitted)
        #[arg(short, long)]
        scenario: Option<String>,

        /// Override the scenario's tick count
        #[arg(short, long)]
        ticks: Option<u64>,

        /// Override the scenario's encounter seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run a batch of encounters for balance testing
    Batch {
        /// Scenario file to load (built-in skirmish when omitted)
        #[arg(short, long)]
        scenario: Option<String>,

        /// Number of runs
        #[arg(short, long, default_value = "100")]
        runs: usize,

        /// Give each run its own seed
        #[arg(long)]
        vary_seed: bool,

        /// Include per-run metrics in the output
        #[arg(long)]
        full: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Run {
            scenario,
            ticks,
            seed,
        } => {
            let mut scenario = load_scenario(scenario.as_deref())?;
            if let Some(ticks) = ticks {
                scenario.ticks = ticks;
            }
            if let Some(seed) = seed {
                scenario.seed = seed;
            }
            tracing::info!(name = %scenario.name, ticks = scenario.ticks, "Running encounter");

            let mut runner = HeadlessRunner::new(scenario)?;
            let metrics = runner.run();
            println!("{}", serde_json::to_string_pretty(&metrics)?);
        }
        Commands::Batch {
            scenario,
            runs,
            vary_seed,
            full,
        } => {
            let scenario = load_scenario(scenario.as_deref())?;
            let config = BatchConfig { runs, vary_seed };
            let results = run_batch(&scenario, &config)?;
            if full {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&results.summary)?);
            }
        }
    }

    Ok(())
}

fn load_scenario(path: Option<&str>) -> Result<Scenario, combat_headless::ScenarioError> {
    match path {
        Some(path) => Scenario::load(path),
        None => Ok(Scenario::skirmish()),
    }
}
