//! Cooperative timer engine.
//!
//! The scheduler owns every live timed activity: status-effect instances,
//! pending ability casts, and cooldown entries. [`EffectScheduler::tick`]
//! advances each activity exactly once per simulation tick. There is no
//! ordering guarantee *across* activities — only the step order *inside*
//! one activity is fixed — and activities scheduled from within a tick
//! (e.g. an effect created by a resolving cast) first run on the next
//! tick boundary.
//!
//! Cancellation is cooperative: activities whose target handle has gone
//! stale terminate at the top of their next tick. Nothing is interrupted
//! mid-step.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ability::{AbilityId, CasterId, DamageRoller, PendingCast, RegisteredAbility};
use crate::cooldown::Cooldown;
use crate::effect::EffectInstance;
use crate::error::Result;
use crate::events::{CastFizzle, CooldownExpired, DamageEvent, DamageSource, TickEvents};
use crate::registry::{CombatantId, CombatantRegistry};
use crate::time::Seconds;

/// Cooldown table key: one timer per caster per ability.
pub type CooldownKey = (CasterId, AbilityId);

/// Cooperative scheduler for all timed combat activities.
///
/// Cooldown entries live in a `BTreeMap` so per-tick iteration (and the
/// resulting event order) is deterministic.
#[derive(Debug, Clone, Default, Hash, Serialize, Deserialize)]
pub struct EffectScheduler {
    effects: Vec<EffectInstance>,
    casts: Vec<PendingCast>,
    cooldowns: BTreeMap<CooldownKey, Cooldown>,
}

impl EffectScheduler {
    /// Create an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new effect instance. It first advances on the next tick.
    pub fn register_effect(&mut self, instance: EffectInstance) {
        tracing::debug!(
            effect = %instance.template().id,
            combatant = %instance.target(),
            "Status effect registered"
        );
        self.effects.push(instance);
    }

    /// Schedule a pending ability cast.
    pub fn schedule_cast(&mut self, cast: PendingCast) {
        self.casts.push(cast);
    }

    /// Look up a cooldown entry.
    #[must_use]
    pub fn cooldown(&self, caster: CasterId, ability: AbilityId) -> Option<&Cooldown> {
        self.cooldowns.get(&(caster, ability))
    }

    /// Check whether an ability is gated for a caster.
    #[must_use]
    pub fn is_on_cooldown(&self, caster: CasterId, ability: AbilityId) -> bool {
        self.cooldowns
            .get(&(caster, ability))
            .is_some_and(Cooldown::is_active)
    }

    /// Start or lengthen a cooldown; never shortens a running one.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::CombatError::InvalidCooldown`] for
    /// non-positive durations.
    pub fn extend_cooldown(
        &mut self,
        caster: CasterId,
        ability: AbilityId,
        duration: Seconds,
    ) -> Result<()> {
        self.cooldowns
            .entry((caster, ability))
            .or_default()
            .extend(duration)
    }

    /// All live effect instances, in registration order.
    #[must_use]
    pub fn active_effects(&self) -> &[EffectInstance] {
        &self.effects
    }

    /// Live effect instances attached to one combatant.
    pub fn effects_on(&self, target: CombatantId) -> impl Iterator<Item = &EffectInstance> {
        self.effects
            .iter()
            .filter(move |instance| instance.target() == target)
    }

    /// Casts still waiting to resolve.
    #[must_use]
    pub fn pending_casts(&self) -> &[PendingCast] {
        &self.casts
    }

    /// Advance every live activity by one tick.
    ///
    /// Sweep order: pending casts, then effect instances, then cooldowns.
    /// Effects spawned by resolving casts are appended after the effect
    /// sweep so they first advance next tick. Finished instances are
    /// pruned at the end.
    pub fn tick(
        &mut self,
        dt: Seconds,
        registry: &mut CombatantRegistry,
        abilities: &[RegisteredAbility],
        roller: &mut DamageRoller,
        events: &mut TickEvents,
    ) {
        let mut spawned: Vec<EffectInstance> = Vec::new();

        let casts = std::mem::take(&mut self.casts);
        let mut unresolved = Vec::with_capacity(casts.len());
        for mut cast in casts {
            cast.remaining -= dt;
            if cast.remaining > Seconds::ZERO {
                unresolved.push(cast);
            } else {
                Self::resolve_cast(&cast, registry, abilities, roller, &mut spawned, events);
            }
        }
        self.casts = unresolved;

        for instance in &mut self.effects {
            instance.advance(dt, registry, events);
        }
        self.effects.append(&mut spawned);

        for ((caster, ability), cooldown) in &mut self.cooldowns {
            if cooldown.tick(dt) {
                events.cooldowns_expired.push(CooldownExpired {
                    caster: *caster,
                    ability: *ability,
                });
            }
        }

        self.effects.retain(|instance| !instance.is_finished());
    }

    /// Resolve a cast whose timer ran out: roll direct damage, then apply
    /// the ability's status effect. Resolving against a dead or despawned
    /// target fizzles.
    fn resolve_cast(
        cast: &PendingCast,
        registry: &mut CombatantRegistry,
        abilities: &[RegisteredAbility],
        roller: &mut DamageRoller,
        spawned: &mut Vec<EffectInstance>,
        events: &mut TickEvents,
    ) {
        let Some(ability) = abilities.get(cast.ability.index() as usize) else {
            return;
        };

        if !registry.get(cast.target).is_some_and(|c| c.is_alive()) {
            tracing::debug!(
                ability = %ability.template.id,
                combatant = %cast.target,
                "Cast fizzled: target gone or dead"
            );
            events.casts_fizzled.push(CastFizzle {
                caster: cast.caster,
                ability: cast.ability,
            });
            return;
        }

        let amount = roller.roll(ability.template.damage_min, ability.template.damage_max);
        let mut killed = false;
        if amount > 0 {
            if let Some(combatant) = registry.get_mut(cast.target) {
                killed = combatant.health.apply_damage(amount);
                events.damage.push(DamageEvent {
                    target: cast.target,
                    amount,
                    source: DamageSource::Ability {
                        caster: cast.caster,
                        ability: cast.ability,
                    },
                    killed,
                });
            }
        }

        // A cast that kills does not then attach an effect to the corpse.
        if !killed {
            if let Some(effect) = &ability.effect {
                if let Some(instance) =
                    EffectInstance::try_new(effect.clone(), cast.target, registry, events)
                {
                    spawned.push(instance);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::ability::AbilityTemplate;
    use crate::combatant::{Category, Combatant};
    use crate::effect::{EffectKind, EffectTemplate};

    fn secs(n: f64) -> Seconds {
        Seconds::from_num(n)
    }

    fn burning() -> EffectTemplate {
        EffectTemplate {
            id: "burning".to_string(),
            name: "burning".to_string(),
            tooltip: String::new(),
            duration: secs(3.0),
            cue_up_time: secs(0.2),
            cue_down_time: secs(1.0),
            kind: EffectKind::DamageOverTime {
                damage_per_second: 10,
                tick_interval: secs(1.0),
            },
        }
    }

    fn fire_bolt() -> RegisteredAbility {
        RegisteredAbility::new(AbilityTemplate {
            id: "fire_bolt".to_string(),
            name: "fireBolt".to_string(),
            damage_min: 5,
            damage_max: 5,
            cast_duration: secs(0.5),
            base_cooldown: secs(2.0),
            requires_target: true,
            effect: Some(burning()),
        })
    }

    #[test]
    fn test_cast_resolves_after_cast_duration() {
        let mut scheduler = EffectScheduler::new();
        let mut registry = CombatantRegistry::new();
        let abilities = vec![fire_bolt()];
        let mut roller = DamageRoller::new(1);

        let target = registry.insert(Combatant::new("rat", Category::Rat, 100));
        scheduler.schedule_cast(PendingCast {
            caster: CasterId(0),
            ability: AbilityId(0),
            target,
            remaining: secs(0.5),
        });

        let mut events = TickEvents::default();
        scheduler.tick(secs(0.25), &mut registry, &abilities, &mut roller, &mut events);
        assert!(events.damage.is_empty());
        assert_eq!(scheduler.pending_casts().len(), 1);

        let mut events = TickEvents::default();
        scheduler.tick(secs(0.25), &mut registry, &abilities, &mut roller, &mut events);
        assert_eq!(events.damage.len(), 1);
        assert_eq!(events.damage[0].amount, 5);
        assert_eq!(scheduler.pending_casts().len(), 0);
        assert_eq!(scheduler.active_effects().len(), 1);
    }

    #[test]
    fn test_cast_fizzles_on_dead_target() {
        let mut scheduler = EffectScheduler::new();
        let mut registry = CombatantRegistry::new();
        let abilities = vec![fire_bolt()];
        let mut roller = DamageRoller::new(1);

        let target = registry.insert(Combatant::new("rat", Category::Rat, 100));
        registry.get_mut(target).unwrap().health.apply_damage(100);
        scheduler.schedule_cast(PendingCast {
            caster: CasterId(0),
            ability: AbilityId(0),
            target,
            remaining: secs(0.1),
        });

        let mut events = TickEvents::default();
        scheduler.tick(secs(1.0), &mut registry, &abilities, &mut roller, &mut events);
        assert!(events.damage.is_empty());
        assert_eq!(events.casts_fizzled.len(), 1);
        assert!(scheduler.active_effects().is_empty());
    }

    #[test]
    fn test_effect_spawned_by_cast_advances_next_tick() {
        let mut scheduler = EffectScheduler::new();
        let mut registry = CombatantRegistry::new();
        let abilities = vec![fire_bolt()];
        let mut roller = DamageRoller::new(1);

        let target = registry.insert(Combatant::new("rat", Category::Rat, 100));
        scheduler.schedule_cast(PendingCast {
            caster: CasterId(0),
            ability: AbilityId(0),
            target,
            remaining: secs(1.0),
        });

        // Resolution tick: direct damage only, no DOT tick yet
        let mut events = TickEvents::default();
        scheduler.tick(secs(1.0), &mut registry, &abilities, &mut roller, &mut events);
        assert_eq!(events.damage.len(), 1);

        // Next tick: the spawned instance runs and its first DOT fires
        let mut events = TickEvents::default();
        scheduler.tick(secs(1.0), &mut registry, &abilities, &mut roller, &mut events);
        assert_eq!(events.damage.len(), 1);
        assert!(matches!(
            events.damage[0].source,
            DamageSource::Effect { .. }
        ));
    }

    #[test]
    fn test_cooldown_expiry_emits_event() {
        let mut scheduler = EffectScheduler::new();
        let mut registry = CombatantRegistry::new();
        let mut roller = DamageRoller::new(1);

        scheduler
            .extend_cooldown(CasterId(3), AbilityId(0), secs(1.0))
            .unwrap();
        assert!(scheduler.is_on_cooldown(CasterId(3), AbilityId(0)));

        let mut events = TickEvents::default();
        scheduler.tick(secs(1.0), &mut registry, &[], &mut roller, &mut events);
        assert_eq!(events.cooldowns_expired.len(), 1);
        assert!(!scheduler.is_on_cooldown(CasterId(3), AbilityId(0)));
    }
}
