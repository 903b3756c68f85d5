//! Fixed-point time utilities for deterministic simulation.
//!
//! All timers in the simulation (effect durations, tick intervals,
//! cooldowns, cue windows) are fixed-point seconds. Floating-point
//! operations can produce different results on different CPUs, which
//! would make otherwise-identical encounters drift apart.

use fixed::types::I32F32;

/// Fixed-point seconds, used for every timer in the simulation.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
pub type Seconds = I32F32;

/// Ticks per second the external loop is expected to drive.
pub const TICK_RATE: u32 = 20;

/// Duration of one tick in milliseconds.
pub const TICK_DURATION_MS: u32 = 1000 / TICK_RATE;

/// The delta-time of one standard tick.
#[must_use]
pub fn tick_delta() -> Seconds {
    Seconds::from_num(1) / Seconds::from_num(TICK_RATE)
}

/// Serde support for fixed-point seconds.
///
/// Serializes fixed-point numbers as their raw bit representation (i64)
/// to preserve exact precision across serialization boundaries.
pub mod fixed_serde {
    use super::Seconds;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a fixed-point number as its raw bit representation.
    pub fn serialize<S>(value: &Seconds, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.to_bits().serialize(serializer)
    }

    /// Deserialize a fixed-point number from its raw bit representation.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Seconds, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = i64::deserialize(deserializer)?;
        Ok(Seconds::from_bits(bits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_delta_matches_rate() {
        // 1/20 is not exactly representable in binary fixed-point
        let error = tick_delta() * Seconds::from_num(TICK_RATE) - Seconds::ONE;
        assert!(error.abs() < Seconds::from_num(1e-6));
    }
}
