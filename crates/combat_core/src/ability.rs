//! Data-driven ability definitions.
//!
//! Abilities are authored as templates (RON-friendly serde structs) and
//! registered with the simulation, which hands back a typed index. Using
//! an ability is gated by its cooldown; on success a pending cast is
//! scheduled that resolves after the cast duration, rolling direct damage
//! and applying the ability's status effect, if any.

use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::effect::EffectTemplate;
use crate::error::{CombatError, Result};
use crate::registry::CombatantId;
use crate::time::{fixed_serde, Seconds};

/// Opaque token identifying an ability user (players are not combatants).
/// Cooldowns are keyed per `(CasterId, AbilityId)` pair.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CasterId(pub u32);

/// Typed index into the simulation's ability table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct AbilityId(pub(crate) u32);

impl AbilityId {
    /// Raw table index.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for AbilityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Data-driven ability definition.
///
/// # Example RON
///
/// ```ron
/// AbilityTemplate(
///     id: "fire_bolt",
///     name: "fireBolt",
///     damage_min: 8,
///     damage_max: 14,
///     cast_duration: 2147483648,   // Fixed-point for 0.5
///     base_cooldown: 12884901888,  // Fixed-point for 3.0
///     requires_target: true,
///     effect: Some(EffectTemplate(
///         id: "burning",
///         name: "burning",
///         duration: 21474836480,   // Fixed-point for 5.0
///         kind: DamageOverTime(
///             damage_per_second: 10,
///             tick_interval: 4294967296,  // Fixed-point for 1.0
///         ),
///     )),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Hash, Serialize, Deserialize)]
pub struct AbilityTemplate {
    /// Unique string identifier for this ability.
    pub id: String,

    /// Base name as authored; formatted for display by consumers.
    pub name: String,

    /// Minimum direct damage on cast resolution.
    pub damage_min: u32,

    /// Maximum direct damage on cast resolution (inclusive).
    pub damage_max: u32,

    /// Time between the use request and the cast resolving.
    #[serde(with = "fixed_serde")]
    pub cast_duration: Seconds,

    /// Cooldown applied on use, on top of the cast duration.
    #[serde(with = "fixed_serde")]
    pub base_cooldown: Seconds,

    /// Whether the ability needs a combatant target (false for
    /// area abilities resolved by the caller).
    #[serde(default)]
    pub requires_target: bool,

    /// Status effect applied to the target when the cast resolves.
    #[serde(default)]
    pub effect: Option<EffectTemplate>,
}

impl AbilityTemplate {
    /// Parse a template from a RON string.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::TemplateParse`] on malformed input.
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        Ok(ron::from_str(ron)?)
    }

    /// Total cooldown started on use: casting time plus base cooldown.
    #[must_use]
    pub fn total_cooldown(&self) -> Seconds {
        self.cast_duration + self.base_cooldown
    }

    /// Validate authoring invariants.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::InvalidState`] when the damage range is
    /// inverted or timings are negative, and
    /// [`CombatError::InvalidCooldown`] when the total cooldown is not
    /// positive.
    pub fn validate(&self) -> Result<()> {
        if self.damage_min > self.damage_max {
            return Err(CombatError::InvalidState(format!(
                "Ability '{}': damage_min {} exceeds damage_max {}",
                self.id, self.damage_min, self.damage_max
            )));
        }
        if self.cast_duration < Seconds::ZERO || self.base_cooldown < Seconds::ZERO {
            return Err(CombatError::InvalidState(format!(
                "Ability '{}': negative timing",
                self.id
            )));
        }
        if self.total_cooldown() <= Seconds::ZERO {
            return Err(CombatError::InvalidCooldown(self.total_cooldown().to_num()));
        }
        Ok(())
    }
}

/// An ability as registered with the simulation: the template plus its
/// effect promoted to a shared handle so every application reuses one
/// immutable config.
#[derive(Debug, Clone, Hash, Serialize, Deserialize)]
pub struct RegisteredAbility {
    /// The authored template.
    pub template: Arc<AbilityTemplate>,
    /// Shared status-effect config, if the ability applies one.
    pub effect: Option<Arc<EffectTemplate>>,
}

impl RegisteredAbility {
    pub(crate) fn new(template: AbilityTemplate) -> Self {
        let effect = template.effect.clone().map(Arc::new);
        Self {
            template: Arc::new(template),
            effect,
        }
    }
}

/// A cast in flight: scheduled by `use_ability`, resolved by the
/// scheduler once the remaining time runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PendingCast {
    /// Who is casting.
    pub caster: CasterId,
    /// Which ability.
    pub ability: AbilityId,
    /// Who gets hit.
    pub target: CombatantId,
    /// Time until resolution.
    #[serde(with = "fixed_serde")]
    pub remaining: Seconds,
}

/// Deterministic damage-roll source.
///
/// Every roll draws from a fresh `SmallRng` stream derived from the base
/// seed and the roll index, so snapshot/restore only needs two words of
/// state and replays continue the sequence exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DamageRoller {
    seed: u64,
    rolls: u64,
}

impl DamageRoller {
    /// Create a roller from an encounter seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { seed, rolls: 0 }
    }

    /// Roll uniformly in `min..=max`.
    pub fn roll(&mut self, min: u32, max: u32) -> u32 {
        let stream = self
            .seed
            .wrapping_add(self.rolls.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        self.rolls += 1;
        if min >= max {
            return min;
        }
        let mut rng = SmallRng::seed_from_u64(stream);
        rng.gen_range(min..=max)
    }

    /// Number of rolls drawn so far.
    #[must_use]
    pub const fn rolls(&self) -> u64 {
        self.rolls
    }

    /// The base seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bolt() -> AbilityTemplate {
        AbilityTemplate {
            id: "fire_bolt".to_string(),
            name: "fireBolt".to_string(),
            damage_min: 8,
            damage_max: 14,
            cast_duration: Seconds::from_num(0.5),
            base_cooldown: Seconds::from_num(3),
            requires_target: true,
            effect: None,
        }
    }

    #[test]
    fn test_total_cooldown_includes_cast() {
        assert_eq!(bolt().total_cooldown(), Seconds::from_num(3.5));
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let mut ability = bolt();
        ability.damage_min = 20;
        assert!(ability.validate().is_err());
    }

    #[test]
    fn test_roller_is_deterministic() {
        let mut a = DamageRoller::new(42);
        let mut b = DamageRoller::new(42);
        for _ in 0..32 {
            assert_eq!(a.roll(8, 14), b.roll(8, 14));
        }
        assert_ne!(
            DamageRoller::new(1).roll(0, u32::MAX - 1),
            DamageRoller::new(2).roll(0, u32::MAX - 1)
        );
    }

    #[test]
    fn test_roller_stays_in_range() {
        let mut roller = DamageRoller::new(7);
        for _ in 0..100 {
            let damage = roller.roll(8, 14);
            assert!((8..=14).contains(&damage));
        }
        assert_eq!(roller.roll(5, 5), 5);
    }
}
