//! Determinism testing utilities.
//!
//! Provides a harness for verifying that the simulation produces
//! identical results given identical inputs.
//!
//! # Testing Strategy
//!
//! The combat core must be 100% deterministic so headless soak runs and
//! replays are trustworthy. Sources of non-determinism include:
//!
//! - **Floating-point math**: Different CPUs can produce different
//!   results. Every timer uses fixed-point [`combat_core::time::Seconds`].
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   The core iterates slot-ordered registries and `BTreeMap` cooldown
//!   tables instead.
//!
//! - **System randomness**: Damage rolls derive from the encounter seed
//!   and a roll counter; nothing reads system entropy.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: Individual component determinism (effects, cooldowns)
//! 2. **Property tests**: Random inputs must still produce deterministic outputs
//! 3. **Integration tests**: Full encounter scenarios are reproducible

use combat_core::simulation::Simulation;
use combat_core::time::Seconds;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of ticks simulated.
    pub ticks: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic simulation).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the simulation was deterministic, with a detailed
    /// error message.
    ///
    /// # Panics
    ///
    /// Panics if the simulation produced different hashes across runs.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Simulation is non-deterministic!\n\
                 Runs: {}\n\
                 Ticks: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.ticks,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a simulation multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run the simulation
/// * `ticks` - Number of ticks to simulate per run
/// * `setup` - Function to create initial simulation state
/// * `step` - Function to advance simulation by one tick
/// * `hash` - Function to compute state hash
///
/// # Example
///
/// ```
/// use combat_test_utils::determinism::verify_determinism;
/// use combat_test_utils::fixtures;
///
/// let result = verify_determinism(
///     3,   // Run 3 times
///     100, // 100 ticks each
///     || fixtures::rat_pod_encounter(42).0,
///     |sim| {
///         sim.tick(fixtures::secs_f(0.05));
///     },
///     |sim| sim.state_hash(),
/// );
/// result.assert_deterministic();
/// ```
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    ticks: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for _ in 0..ticks {
            step(&mut state);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        ticks,
    }
}

/// Simplified determinism verification for the [`Simulation`] type.
///
/// Runs the scenario twice with identical setup, stepping at the
/// standard tick rate, and verifies the final state hashes match.
pub fn verify_simulation_determinism<Setup>(setup: Setup, num_ticks: u64) -> bool
where
    Setup: Fn() -> Simulation,
{
    let dt = Seconds::from_num(1) / Seconds::from_num(combat_core::time::TICK_RATE);
    let result = verify_determinism(
        2,
        num_ticks,
        setup,
        |sim| {
            sim.tick(dt);
        },
        Simulation::state_hash,
    );
    result.is_deterministic
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use combat_core::ability::CasterId;

    #[test]
    fn test_standard_encounter_is_deterministic() {
        let is_deterministic = verify_simulation_determinism(
            || {
                let (mut sim, _, members) = fixtures::rat_pod_encounter(7);
                let bolt = sim.register_ability(fixtures::fire_bolt_template()).unwrap();
                sim.use_ability(CasterId(0), bolt, members[0]).unwrap();
                sim.apply_status_effect(&fixtures::burning_template(), members[3]);
                sim
            },
            200,
        );
        assert!(is_deterministic);
    }

    #[test]
    fn test_detects_divergent_hashes() {
        let toggle = std::cell::Cell::new(0u64);
        let result = verify_determinism(
            2,
            1,
            || (),
            |_| {},
            |_| {
                toggle.set(toggle.get() + 1);
                toggle.get()
            },
        );
        assert!(!result.is_deterministic);
        assert_eq!(result.unique_hashes().len(), 2);
    }
}
