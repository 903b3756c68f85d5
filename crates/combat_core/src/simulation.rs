//! Core simulation facade.
//!
//! [`Simulation`] owns all combat state — the combatant registry, the
//! pods, the scheduler, the ability table and the damage-roll source —
//! and advances it deterministically, one tick at a time. The external
//! game loop calls [`tick`](Simulation::tick) exactly once per frame and
//! reacts to the returned [`TickEvents`].
//!
//! # Determinism
//!
//! All operations in this module are fully deterministic:
//! - No floating-point math (timers are fixed-point [`Seconds`])
//! - No system randomness (damage rolls derive from the encounter seed)
//! - Consistent iteration order (slot-ordered registry, sorted cooldowns)
//! - Same inputs always produce same outputs
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use combat_core::prelude::*;
//!
//! let mut sim = Simulation::new(42);
//! let pod = sim.create_pod(8);
//! let rat = sim.spawn(Combatant::new("caveRat", Category::Rat, 50));
//! sim.pod_add(pod, rat).unwrap();
//!
//! let burning = Arc::new(EffectTemplate {
//!     id: "burning".to_string(),
//!     name: "burning".to_string(),
//!     tooltip: String::new(),
//!     duration: Seconds::from_num(5),
//!     cue_up_time: Seconds::from_num(0.2),
//!     cue_down_time: Seconds::from_num(1),
//!     kind: EffectKind::DamageOverTime {
//!         damage_per_second: 10,
//!         tick_interval: Seconds::from_num(1),
//!     },
//! });
//! assert!(sim.apply_status_effect(&burning, rat));
//!
//! for _ in 0..5 {
//!     sim.tick(Seconds::from_num(1));
//! }
//! assert!(sim.combatant(rat).unwrap().health.is_dead());
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ability::{
    AbilityId, AbilityTemplate, CasterId, DamageRoller, PendingCast, RegisteredAbility,
};
use crate::combatant::Combatant;
use crate::effect::{EffectInstance, EffectTemplate};
use crate::error::{CombatError, Result};
use crate::events::{DamageEvent, DamageSource, LootDrop, TickEvents};
use crate::pod::{Pod, PodId};
use crate::registry::{CombatantId, CombatantRegistry};
use crate::scheduler::EffectScheduler;
use crate::time::Seconds;

/// The core combat simulation.
///
/// This struct owns all encounter state and advances it deterministically.
/// Events generated between ticks (e.g. the immediate cue of a status
/// effect application, or a death from direct damage) are buffered and
/// delivered with the next tick's [`TickEvents`].
#[derive(Debug, Clone, Hash, Serialize, Deserialize)]
pub struct Simulation {
    /// Current simulation tick.
    tick: u64,
    /// All combatants in the encounter.
    registry: CombatantRegistry,
    /// Pods, addressed by [`PodId`] index.
    pods: Vec<Pod>,
    /// All live timed activities.
    scheduler: EffectScheduler,
    /// Registered ability table, addressed by [`AbilityId`] index.
    abilities: Vec<RegisteredAbility>,
    /// Deterministic damage-roll source.
    roller: DamageRoller,
    /// Events produced between ticks, flushed into the next tick.
    pending: TickEvents,
}

impl Simulation {
    /// Create a new empty simulation from an encounter seed.
    ///
    /// The seed drives every damage roll; two simulations with the same
    /// seed and call sequence evolve identically.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            tick: 0,
            registry: CombatantRegistry::new(),
            pods: Vec::new(),
            scheduler: EffectScheduler::new(),
            abilities: Vec::new(),
            roller: DamageRoller::new(seed),
            pending: TickEvents::default(),
        }
    }

    /// Get the current tick number.
    #[must_use]
    pub const fn get_tick(&self) -> u64 {
        self.tick
    }

    /// The combatant registry.
    #[must_use]
    pub fn registry(&self) -> &CombatantRegistry {
        &self.registry
    }

    /// The activity scheduler (for effect/cast introspection).
    #[must_use]
    pub fn scheduler(&self) -> &EffectScheduler {
        &self.scheduler
    }

    // ------------------------------------------------------------------
    // Combatants
    // ------------------------------------------------------------------

    /// Add a combatant to the encounter.
    pub fn spawn(&mut self, combatant: Combatant) -> CombatantId {
        let name = combatant.display_name.clone();
        let id = self.registry.insert(combatant);
        tracing::debug!(combatant = %id, %name, "Combatant spawned");
        id
    }

    /// Remove a combatant from the encounter.
    ///
    /// Its pod slot is freed and every activity targeting it terminates
    /// on the next tick boundary.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::CombatantNotFound`] if the handle is stale.
    pub fn despawn(&mut self, id: CombatantId) -> Result<()> {
        let membership = self
            .registry
            .get(id)
            .ok_or(CombatError::CombatantNotFound(id))?
            .membership;

        if let Some(membership) = membership {
            if let Some(pod) = self.pods.get_mut(membership.pod.index() as usize) {
                pod.remove_member(&mut self.registry, id);
            }
        }

        self.registry.remove(id);
        tracing::debug!(combatant = %id, "Combatant despawned");
        Ok(())
    }

    /// Look up a combatant.
    #[must_use]
    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.registry.get(id)
    }

    /// Apply direct damage to a living combatant.
    ///
    /// Returns whether the target is now at zero health. Death, loot and
    /// pod bookkeeping happen immediately; the events are delivered with
    /// the next tick.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::CombatantNotFound`] for stale handles and
    /// [`CombatError::AlreadyDead`] when the target is already at zero
    /// health — damaging the dead is a programmer error, not a
    /// recoverable condition.
    pub fn damage(&mut self, target: CombatantId, amount: u32) -> Result<bool> {
        let combatant = self
            .registry
            .get_mut(target)
            .ok_or(CombatError::CombatantNotFound(target))?;
        if !combatant.is_alive() {
            return Err(CombatError::AlreadyDead(target));
        }

        let killed = combatant.health.apply_damage(amount);
        let mut events = std::mem::take(&mut self.pending);
        events.damage.push(DamageEvent {
            target,
            amount,
            source: DamageSource::Direct,
            killed,
        });
        if killed {
            self.finalize_death(target, &mut events);
        }
        self.pending = events;
        Ok(killed)
    }

    /// Set a living combatant's health directly (for effects that are
    /// not plain damage). Returns the same killed signal as
    /// [`damage`](Self::damage).
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::CombatantNotFound`], [`CombatError::AlreadyDead`]
    /// or [`CombatError::HealthOutOfRange`].
    pub fn set_health(&mut self, target: CombatantId, value: u32) -> Result<bool> {
        let combatant = self
            .registry
            .get_mut(target)
            .ok_or(CombatError::CombatantNotFound(target))?;
        if !combatant.is_alive() {
            return Err(CombatError::AlreadyDead(target));
        }

        let killed = combatant.health.set_health(value)?;
        if killed {
            let mut events = std::mem::take(&mut self.pending);
            self.finalize_death(target, &mut events);
            self.pending = events;
        }
        Ok(killed)
    }

    /// Heal a living combatant, returning the amount actually restored.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::CombatantNotFound`] or
    /// [`CombatError::AlreadyDead`] (healing does not resurrect).
    pub fn heal(&mut self, target: CombatantId, amount: u32) -> Result<u32> {
        let combatant = self
            .registry
            .get_mut(target)
            .ok_or(CombatError::CombatantNotFound(target))?;
        if !combatant.is_alive() {
            return Err(CombatError::AlreadyDead(target));
        }
        Ok(combatant.health.heal(amount))
    }

    // ------------------------------------------------------------------
    // Pods
    // ------------------------------------------------------------------

    /// Create a new pod with the given member capacity.
    pub fn create_pod(&mut self, capacity: usize) -> PodId {
        let id = PodId(self.pods.len() as u32);
        self.pods.push(Pod::new(id, capacity));
        id
    }

    /// Look up a pod.
    #[must_use]
    pub fn pod(&self, id: PodId) -> Option<&Pod> {
        self.pods.get(id.index() as usize)
    }

    /// Add a combatant to a pod, assigning slot index and display tag.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::PodNotFound`] for unknown pods, and
    /// propagates [`CombatError::PodFull`] (logged here — a full pod is a
    /// spawn-placement configuration problem and must not abort the tick
    /// loop) or [`CombatError::CombatantNotFound`].
    pub fn pod_add(&mut self, pod: PodId, id: CombatantId) -> Result<usize> {
        let pod_ref = self
            .pods
            .get_mut(pod.index() as usize)
            .ok_or(CombatError::PodNotFound(pod.index()))?;
        match pod_ref.add_member(&mut self.registry, id) {
            Err(error @ CombatError::PodFull { .. }) => {
                tracing::warn!(%pod, combatant = %id, %error, "Skipping pod insert");
                Err(error)
            }
            result => result,
        }
    }

    /// Remove a combatant from a pod. Returns whether it was a member.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::PodNotFound`] for unknown pods.
    pub fn pod_remove(&mut self, pod: PodId, id: CombatantId) -> Result<bool> {
        let pod_ref = self
            .pods
            .get_mut(pod.index() as usize)
            .ok_or(CombatError::PodNotFound(pod.index()))?;
        Ok(pod_ref.remove_member(&mut self.registry, id))
    }

    /// Find the next alive member of a pod after `from` (target cycling).
    #[must_use]
    pub fn pod_next(&self, pod: PodId, from: usize) -> Option<(usize, CombatantId)> {
        self.pods
            .get(pod.index() as usize)?
            .next_member(&self.registry, from)
    }

    // ------------------------------------------------------------------
    // Abilities & status effects
    // ------------------------------------------------------------------

    /// Register an ability, returning its typed table index.
    ///
    /// # Errors
    ///
    /// Propagates validation failures from [`AbilityTemplate::validate`].
    pub fn register_ability(&mut self, template: AbilityTemplate) -> Result<AbilityId> {
        template.validate()?;
        let id = AbilityId(self.abilities.len() as u32);
        tracing::debug!(ability = %template.id, index = %id, "Ability registered");
        self.abilities.push(RegisteredAbility::new(template));
        Ok(id)
    }

    /// Look up a registered ability.
    #[must_use]
    pub fn ability(&self, id: AbilityId) -> Option<&RegisteredAbility> {
        self.abilities.get(id.index() as usize)
    }

    /// Request an ability use against a target.
    ///
    /// Returns `Ok(false)` — rejected outright — while the ability is on
    /// cooldown for this caster. On success the total cooldown
    /// (cast duration + base cooldown) starts, the caster's other
    /// abilities are locked out for the cast duration, and a pending cast
    /// is scheduled that resolves after the cast duration.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::UnknownAbility`] for unregistered ids and
    /// [`CombatError::CombatantNotFound`] for stale targets.
    pub fn use_ability(
        &mut self,
        caster: CasterId,
        ability: AbilityId,
        target: CombatantId,
    ) -> Result<bool> {
        let registered = self
            .abilities
            .get(ability.index() as usize)
            .ok_or(CombatError::UnknownAbility(ability.index()))?;
        let template = Arc::clone(&registered.template);

        if !self.registry.contains(target) {
            return Err(CombatError::CombatantNotFound(target));
        }
        if self.scheduler.is_on_cooldown(caster, ability) {
            return Ok(false);
        }

        self.scheduler
            .extend_cooldown(caster, ability, template.total_cooldown())?;

        // Casting locks the caster's other abilities for its duration
        if template.cast_duration > Seconds::ZERO {
            for index in 0..self.abilities.len() as u32 {
                if index != ability.index() {
                    self.scheduler.extend_cooldown(
                        caster,
                        AbilityId(index),
                        template.cast_duration,
                    )?;
                }
            }
        }

        self.scheduler.schedule_cast(PendingCast {
            caster,
            ability,
            target,
            remaining: template.cast_duration,
        });
        tracing::debug!(ability = %template.id, combatant = %target, "Cast started");
        Ok(true)
    }

    /// Apply a status effect to a target.
    ///
    /// Entry point for ability/attack resolution code. Returns `false`
    /// (the call is a no-op) when the target is gone or its category is
    /// not affectable. The visual cue activates immediately; its event is
    /// delivered with the next tick.
    pub fn apply_status_effect(
        &mut self,
        template: &Arc<EffectTemplate>,
        target: CombatantId,
    ) -> bool {
        match EffectInstance::try_new(
            Arc::clone(template),
            target,
            &self.registry,
            &mut self.pending,
        ) {
            Some(instance) => {
                self.scheduler.register_effect(instance);
                true
            }
            None => false,
        }
    }

    /// Live effect instances attached to a combatant.
    pub fn effects_on(&self, target: CombatantId) -> impl Iterator<Item = &EffectInstance> {
        self.scheduler.effects_on(target)
    }

    // ------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------

    /// Advance the simulation by one tick.
    ///
    /// Must be called exactly once per simulation frame by the external
    /// game loop. Runs the scheduler sweep (pending casts, effect
    /// instances, cooldowns), then death processing, and returns every
    /// event generated — including any buffered since the previous tick.
    pub fn tick(&mut self, dt: Seconds) -> TickEvents {
        let mut events = std::mem::take(&mut self.pending);

        self.scheduler.tick(
            dt,
            &mut self.registry,
            &self.abilities,
            &mut self.roller,
            &mut events,
        );

        // Deaths from this tick's damage (direct-damage deaths were
        // finalized eagerly and are already in `events.deaths`)
        let killed: Vec<CombatantId> = events
            .damage
            .iter()
            .filter(|event| event.killed)
            .map(|event| event.target)
            .collect();
        for id in killed {
            if !events.deaths.contains(&id) {
                self.finalize_death(id, &mut events);
            }
        }

        self.tick += 1;

        #[cfg(debug_assertions)]
        {
            let hash = self.state_hash();
            tracing::debug!(tick = self.tick, state_hash = hash, "Simulation state hash");
        }

        events
    }

    /// Emit the one-time death consequences: death event, loot-drop
    /// intent (latched), and the owning pod's naming bookkeeping.
    fn finalize_death(&mut self, id: CombatantId, events: &mut TickEvents) {
        events.deaths.push(id);

        let Some(combatant) = self.registry.get_mut(id) else {
            return;
        };
        let category = combatant.category;
        let membership = combatant.membership;
        if combatant.latch_loot_drop() {
            events.loot_drops.push(LootDrop {
                target: id,
                category,
            });
        }
        tracing::debug!(combatant = %id, name = %combatant.display_name, "Combatant died");

        if let Some(membership) = membership {
            if let Some(pod) = self.pods.get_mut(membership.pod.index() as usize) {
                pod.handle_death(&mut self.registry, id);
            }
        }
    }

    // ------------------------------------------------------------------
    // Determinism tooling
    // ------------------------------------------------------------------

    /// Calculate a hash of the current simulation state.
    ///
    /// Two simulations with identical state produce identical hashes;
    /// used by the determinism harness and replay verification.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }

    /// Serialize the simulation state for replay verification.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| CombatError::InvalidState(format!("Failed to serialize simulation: {e}")))
    }

    /// Deserialize simulation state from bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        bincode::deserialize(data).map_err(|e| {
            CombatError::InvalidState(format!("Failed to deserialize simulation: {e}"))
        })
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::Category;
    use crate::effect::EffectKind;

    fn secs(n: f64) -> Seconds {
        Seconds::from_num(n)
    }

    fn burning(duration: f64, interval: f64, dps: u32) -> Arc<EffectTemplate> {
        Arc::new(EffectTemplate {
            id: "burning".to_string(),
            name: "burning".to_string(),
            tooltip: String::new(),
            duration: secs(duration),
            cue_up_time: secs(0.2),
            cue_down_time: secs(1.0),
            kind: EffectKind::DamageOverTime {
                damage_per_second: dps,
                tick_interval: secs(interval),
            },
        })
    }

    fn fire_bolt() -> AbilityTemplate {
        AbilityTemplate {
            id: "fire_bolt".to_string(),
            name: "fireBolt".to_string(),
            damage_min: 5,
            damage_max: 9,
            cast_duration: secs(0.5),
            base_cooldown: secs(2.5),
            requires_target: true,
            effect: None,
        }
    }

    #[test]
    fn test_tick_increments() {
        let mut sim = Simulation::new(0);
        assert_eq!(sim.get_tick(), 0);
        sim.tick(secs(0.05));
        assert_eq!(sim.get_tick(), 1);
        sim.tick(secs(0.05));
        assert_eq!(sim.get_tick(), 2);
    }

    #[test]
    fn test_direct_damage_and_death_events() {
        let mut sim = Simulation::new(0);
        let rat = sim.spawn(Combatant::new("rat", Category::Rat, 20));

        assert!(!sim.damage(rat, 15).unwrap());
        assert!(sim.damage(rat, 15).unwrap());
        assert!(matches!(
            sim.damage(rat, 1),
            Err(CombatError::AlreadyDead(_))
        ));

        let events = sim.tick(secs(0.05));
        assert_eq!(events.deaths, vec![rat]);
        assert_eq!(events.loot_drops.len(), 1);
        assert_eq!(events.damage.len(), 2);
        // Dead but still addressable until despawned
        assert!(sim.combatant(rat).is_some());
    }

    #[test]
    fn test_death_events_not_duplicated() {
        let mut sim = Simulation::new(0);
        let rat = sim.spawn(Combatant::new("rat", Category::Rat, 10));
        let template = burning(5.0, 1.0, 10);
        assert!(sim.apply_status_effect(&template, rat));

        let mut deaths = 0;
        let mut drops = 0;
        for _ in 0..6 {
            let events = sim.tick(secs(1.0));
            deaths += events.deaths.len();
            drops += events.loot_drops.len();
        }
        assert_eq!(deaths, 1);
        assert_eq!(drops, 1);
    }

    #[test]
    fn test_dot_data_flow_through_facade() {
        let mut sim = Simulation::new(0);
        let rat = sim.spawn(Combatant::new("rat", Category::Rat, 100));
        let template = burning(5.0, 1.0, 10);
        assert!(sim.apply_status_effect(&template, rat));
        assert_eq!(sim.effects_on(rat).count(), 1);

        for _ in 0..5 {
            sim.tick(secs(1.0));
        }
        assert_eq!(sim.combatant(rat).unwrap().health.current, 50);
        assert_eq!(sim.effects_on(rat).count(), 0);
    }

    #[test]
    fn test_effect_on_chest_is_noop() {
        let mut sim = Simulation::new(0);
        let chest = sim.spawn(Combatant::new("lootChest", Category::LootChest, 20));
        let template = burning(5.0, 1.0, 10);
        assert!(!sim.apply_status_effect(&template, chest));
        assert_eq!(sim.scheduler().active_effects().len(), 0);
    }

    #[test]
    fn test_use_ability_gated_by_cooldown() {
        let mut sim = Simulation::new(7);
        let rat = sim.spawn(Combatant::new("rat", Category::Rat, 100));
        let bolt = sim.register_ability(fire_bolt()).unwrap();
        let caster = CasterId(0);

        assert!(sim.use_ability(caster, bolt, rat).unwrap());
        // Rejected outright while cooling down
        assert!(!sim.use_ability(caster, bolt, rat).unwrap());

        // Total cooldown = 0.5 cast + 2.5 base = 3s
        for _ in 0..12 {
            sim.tick(secs(0.25));
        }
        assert!(sim.use_ability(caster, bolt, rat).unwrap());
    }

    #[test]
    fn test_cast_resolves_with_rolled_damage() {
        let mut sim = Simulation::new(1234);
        let rat = sim.spawn(Combatant::new("rat", Category::Rat, 100));
        let bolt = sim.register_ability(fire_bolt()).unwrap();
        sim.use_ability(CasterId(0), bolt, rat).unwrap();

        let mut total = 0u32;
        for _ in 0..20 {
            let events = sim.tick(secs(0.05));
            total += events.damage.iter().map(|d| d.amount).sum::<u32>();
        }
        assert!((5..=9).contains(&total));
        assert_eq!(sim.combatant(rat).unwrap().health.current, 100 - total);
    }

    #[test]
    fn test_despawn_terminates_activities() {
        let mut sim = Simulation::new(0);
        let rat = sim.spawn(Combatant::new("rat", Category::Rat, 100));
        let template = burning(5.0, 1.0, 10);
        sim.apply_status_effect(&template, rat);

        sim.despawn(rat).unwrap();
        assert!(sim.combatant(rat).is_none());

        let events = sim.tick(secs(1.0));
        assert_eq!(events.effects_expired.len(), 1);
        assert!(events.damage.is_empty());
        assert_eq!(sim.scheduler().active_effects().len(), 0);
    }

    #[test]
    fn test_pod_wiring_through_facade() {
        let mut sim = Simulation::new(0);
        let pod = sim.create_pod(4);
        let a = sim.spawn(Combatant::new("caveRat", Category::Rat, 30));
        let b = sim.spawn(Combatant::new("caveRat", Category::Rat, 30));
        sim.pod_add(pod, a).unwrap();
        sim.pod_add(pod, b).unwrap();
        assert_eq!(sim.combatant(a).unwrap().display_name, "Cave Rat A");

        // Death frees the naming slot via the pod wiring
        sim.damage(a, 30).unwrap();
        sim.tick(secs(0.05));
        let c = sim.spawn(Combatant::new("caveRat", Category::Rat, 30));
        sim.pod_add(pod, c).unwrap();
        assert_eq!(sim.combatant(c).unwrap().display_name, "Cave Rat A");

        // Target cycling skips the dead member
        let (slot, next) = sim.pod_next(pod, 2).unwrap();
        assert_eq!((slot, next), (1, b));
    }

    #[test]
    fn test_pod_capacity_skips_insert() {
        let mut sim = Simulation::new(0);
        let pod = sim.create_pod(1);
        let a = sim.spawn(Combatant::new("rat", Category::Rat, 10));
        let b = sim.spawn(Combatant::new("rat", Category::Rat, 10));
        sim.pod_add(pod, a).unwrap();
        assert!(matches!(
            sim.pod_add(pod, b),
            Err(CombatError::PodFull { .. })
        ));
        // The tick loop keeps running regardless
        sim.tick(secs(0.05));
    }

    #[test]
    fn test_deterministic_hash() {
        let build = || {
            let mut sim = Simulation::new(99);
            let pod = sim.create_pod(8);
            let rat = sim.spawn(Combatant::new("caveRat", Category::Rat, 120));
            sim.pod_add(pod, rat).unwrap();
            let bolt = sim.register_ability(fire_bolt()).unwrap();
            sim.use_ability(CasterId(0), bolt, rat).unwrap();
            let template = burning(4.0, 0.5, 6);
            sim.apply_status_effect(&template, rat);
            for _ in 0..100 {
                sim.tick(secs(0.05));
            }
            sim
        };

        assert_eq!(build().state_hash(), build().state_hash());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let mut sim = Simulation::new(5);
        let pod = sim.create_pod(4);
        let rat = sim.spawn(Combatant::new("caveRat", Category::Rat, 75));
        sim.pod_add(pod, rat).unwrap();
        let template = burning(5.0, 1.0, 10);
        sim.apply_status_effect(&template, rat);
        sim.tick(secs(1.0));

        let bytes = sim.serialize().unwrap();
        let restored = Simulation::deserialize(&bytes).unwrap();

        assert_eq!(sim.get_tick(), restored.get_tick());
        assert_eq!(sim.state_hash(), restored.state_hash());
    }

    #[test]
    fn test_cast_lockout_extends_other_cooldowns() {
        let mut sim = Simulation::new(0);
        let rat = sim.spawn(Combatant::new("rat", Category::Rat, 100));
        let bolt = sim.register_ability(fire_bolt()).unwrap();
        let mut other = fire_bolt();
        other.id = "frost_bolt".to_string();
        let frost = sim.register_ability(other).unwrap();
        let caster = CasterId(0);

        sim.use_ability(caster, bolt, rat).unwrap();
        // Other abilities are locked for the 0.5s cast
        assert!(!sim.use_ability(caster, frost, rat).unwrap());
        for _ in 0..2 {
            sim.tick(secs(0.25));
        }
        assert!(sim.use_ability(caster, frost, rat).unwrap());
    }
}
