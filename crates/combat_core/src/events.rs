//! Events emitted toward external collaborators.
//!
//! The core never renders, spawns items, or plays particles; it reports
//! what happened each tick and lets the game layer react.

use serde::{Deserialize, Serialize};

use crate::ability::{AbilityId, CasterId};
use crate::combatant::Category;
use crate::registry::CombatantId;

/// Where a damage application came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageSource {
    /// Direct damage from a resolved ability cast.
    Ability {
        /// The caster.
        caster: CasterId,
        /// The ability used.
        ability: AbilityId,
    },
    /// A damage-over-time tick, identified by the effect template id.
    Effect {
        /// Effect template id (e.g. `"burning"`).
        effect: String,
    },
    /// Damage applied through the direct entry point.
    Direct,
}

/// A single damage application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DamageEvent {
    /// Who took the damage.
    pub target: CombatantId,
    /// Amount applied (before clamping at zero health).
    pub amount: u32,
    /// Origin of the damage.
    pub source: DamageSource,
    /// Whether this application brought the target to zero health.
    pub killed: bool,
}

/// Loot-drop intent, emitted exactly once per combatant death.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LootDrop {
    /// The dead combatant.
    pub target: CombatantId,
    /// What kind of loot table to roll (external).
    pub category: Category,
}

/// Visual-cue toggle for an effect on a combatant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CueChange {
    /// The affected combatant.
    pub target: CombatantId,
    /// Effect template id the cue belongs to.
    pub effect: String,
    /// New cue state.
    pub active: bool,
}

/// A status-effect instance reached the end of its duration (or its
/// target went away).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EffectExpired {
    /// The combatant the instance was attached to.
    pub target: CombatantId,
    /// Effect template id.
    pub effect: String,
}

/// A pending cast resolved against a target that was gone or dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CastFizzle {
    /// Who cast.
    pub caster: CasterId,
    /// The ability that fizzled.
    pub ability: AbilityId,
}

/// A cooldown finished this tick; the ability is usable again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CooldownExpired {
    /// The cooldown owner.
    pub caster: CasterId,
    /// The ability back off cooldown.
    pub ability: AbilityId,
}

/// Everything that happened during one simulation tick.
///
/// Event order across different activities carries no meaning; consumers
/// must not rely on it.
#[derive(Debug, Clone, Default, PartialEq, Hash, Serialize, Deserialize)]
pub struct TickEvents {
    /// Damage applications.
    pub damage: Vec<DamageEvent>,
    /// Combatants that died this tick.
    pub deaths: Vec<CombatantId>,
    /// Loot-drop intents.
    pub loot_drops: Vec<LootDrop>,
    /// Visual-cue transitions.
    pub cue_changes: Vec<CueChange>,
    /// Effect instances that terminated.
    pub effects_expired: Vec<EffectExpired>,
    /// Casts that resolved without a living target.
    pub casts_fizzled: Vec<CastFizzle>,
    /// Cooldowns that completed.
    pub cooldowns_expired: Vec<CooldownExpired>,
}

impl TickEvents {
    /// Check if nothing happened.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.damage.is_empty()
            && self.deaths.is_empty()
            && self.loot_drops.is_empty()
            && self.cue_changes.is_empty()
            && self.effects_expired.is_empty()
            && self.casts_fizzled.is_empty()
            && self.cooldowns_expired.is_empty()
    }

    /// Total damage applied this tick.
    #[must_use]
    pub fn total_damage(&self) -> u64 {
        self.damage.iter().map(|event| u64::from(event.amount)).sum()
    }
}
