//! Headless encounter runner for CI verification and balance batches.
//!
//! This crate drives the combat core without graphics:
//!
//! - **CI verification**: scripted encounters run to completion and the
//!   final state hash is compared across runs
//! - **Balance batches**: many seeds of one scenario run in parallel and
//!   the aggregated metrics show damage/death distributions
//! - **Soak runs**: long encounters exercise the scheduler and registry
//!
//! # Example
//!
//! ```bash
//! # Run the built-in skirmish for 400 ticks
//! cargo run -p combat_headless -- run --ticks 400
//!
//! # Run a scenario file
//! cargo run -p combat_headless -- run --scenario scenarios/rat_pod.ron
//!
//! # Run a 100-seed balance batch
//! cargo run -p combat_headless -- batch --runs 100 --vary-seed
//! ```

pub mod batch;
pub mod metrics;
pub mod runner;
pub mod scenario;

pub use batch::{run_batch, BatchConfig, BatchResults};
pub use metrics::{BatchSummary, EncounterMetrics};
pub use runner::HeadlessRunner;
pub use scenario::{Scenario, ScenarioError, ScriptedAction, TargetRef};
