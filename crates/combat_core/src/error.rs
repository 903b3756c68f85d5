//! Error types for the combat simulation.

use thiserror::Error;

use crate::registry::CombatantId;

/// Result type alias using [`CombatError`].
pub type Result<T> = std::result::Result<T, CombatError>;

/// Top-level error type for all combat simulation errors.
#[derive(Debug, Error)]
pub enum CombatError {
    /// Invalid combatant reference (never spawned, despawned, or stale
    /// generation).
    #[error("Combatant not found: {0}")]
    CombatantNotFound(CombatantId),

    /// Damage or health mutation requested on a combatant that is already
    /// at zero health. Callers must check liveness first.
    #[error("Combatant {0} is already dead")]
    AlreadyDead(CombatantId),

    /// Health value outside the `0..=max` range.
    #[error("Health value {value} exceeds maximum {max}")]
    HealthOutOfRange {
        /// Requested health value.
        value: u32,
        /// Maximum health of the combatant.
        max: u32,
    },

    /// Cooldowns must run for a positive duration.
    #[error("Cooldown duration must be positive, got {0} seconds")]
    InvalidCooldown(f64),

    /// A pod cannot hold more members than its configured capacity.
    /// Callers log this and skip the insert; it must not abort the tick loop.
    #[error("Pod {pod} is full: capacity {capacity}")]
    PodFull {
        /// Index of the full pod.
        pod: u32,
        /// Configured member capacity.
        capacity: usize,
    },

    /// Unknown pod index.
    #[error("Pod not found: {0}")]
    PodNotFound(u32),

    /// Ability id not present in the simulation's ability table.
    #[error("Unknown ability: {0}")]
    UnknownAbility(u32),

    /// Failed to parse a RON template definition.
    #[error("Failed to parse template: {0}")]
    TemplateParse(#[from] ron::error::SpannedError),

    /// Invalid simulation state.
    #[error("Invalid simulation state: {0}")]
    InvalidState(String),
}
