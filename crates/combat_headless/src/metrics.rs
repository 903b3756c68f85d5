//! Encounter metrics collection for balance analysis.

use serde::{Deserialize, Serialize};

/// Complete metrics for a single encounter run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EncounterMetrics {
    /// Scenario name.
    pub scenario: String,
    /// Encounter seed used.
    pub seed: u64,
    /// Ticks simulated.
    pub duration_ticks: u64,
    /// Total damage applied across the run.
    pub total_damage: u64,
    /// Combatants that died.
    pub deaths: u32,
    /// Loot-drop intents emitted.
    pub loot_drops: u32,
    /// Visual-cue transitions observed.
    pub cue_changes: u32,
    /// Effect instances that expired.
    pub effects_expired: u32,
    /// Casts that resolved without a living target.
    pub casts_fizzled: u32,
    /// Combatants still alive at the end.
    pub survivors: u32,
    /// Final simulation state hash (for determinism validation).
    pub final_state_hash: u64,
}

impl EncounterMetrics {
    /// Create metrics for a named scenario run.
    #[must_use]
    pub fn new(scenario: impl Into<String>, seed: u64) -> Self {
        Self {
            scenario: scenario.into(),
            seed,
            ..Default::default()
        }
    }

    /// Fold one tick's events into the totals.
    pub fn record(&mut self, events: &combat_core::events::TickEvents) {
        self.total_damage += events.total_damage();
        self.deaths += events.deaths.len() as u32;
        self.loot_drops += events.loot_drops.len() as u32;
        self.cue_changes += events.cue_changes.len() as u32;
        self.effects_expired += events.effects_expired.len() as u32;
        self.casts_fizzled += events.casts_fizzled.len() as u32;
    }
}

/// Aggregated results across a batch of runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Scenario name.
    pub scenario: String,
    /// Number of runs.
    pub runs: usize,
    /// Distinct final state hashes (1 means fully deterministic when the
    /// seed was fixed).
    pub unique_hashes: usize,
    /// Lowest total damage across runs.
    pub min_damage: u64,
    /// Highest total damage across runs.
    pub max_damage: u64,
    /// Mean total damage across runs.
    pub mean_damage: f64,
    /// Mean death count across runs.
    pub mean_deaths: f64,
}

impl BatchSummary {
    /// Summarize a slice of per-run metrics.
    #[must_use]
    pub fn from_runs(scenario: &str, runs: &[EncounterMetrics]) -> Self {
        if runs.is_empty() {
            return Self {
                scenario: scenario.to_string(),
                ..Default::default()
            };
        }

        let mut hashes: Vec<u64> = runs.iter().map(|run| run.final_state_hash).collect();
        hashes.sort_unstable();
        hashes.dedup();

        let total: u64 = runs.iter().map(|run| run.total_damage).sum();
        let deaths: u64 = runs.iter().map(|run| u64::from(run.deaths)).sum();

        Self {
            scenario: scenario.to_string(),
            runs: runs.len(),
            unique_hashes: hashes.len(),
            min_damage: runs.iter().map(|run| run.total_damage).min().unwrap_or(0),
            max_damage: runs.iter().map(|run| run.total_damage).max().unwrap_or(0),
            mean_damage: total as f64 / runs.len() as f64,
            mean_deaths: deaths as f64 / runs.len() as f64,
        }
    }
}
