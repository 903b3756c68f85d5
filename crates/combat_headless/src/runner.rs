//! Scenario execution against the combat core.
//!
//! The runner builds a [`Simulation`] from a [`Scenario`], fires the
//! scripted actions at their ticks, and folds every tick's events into
//! [`EncounterMetrics`].

use std::collections::HashMap;
use std::sync::Arc;

use combat_core::ability::{AbilityId, CasterId};
use combat_core::combatant::Combatant;
use combat_core::effect::EffectTemplate;
use combat_core::pod::PodId;
use combat_core::registry::CombatantId;
use combat_core::simulation::Simulation;
use combat_core::time::tick_delta;

use crate::metrics::EncounterMetrics;
use crate::scenario::{Scenario, ScenarioError, ScriptedAction, TargetRef};

/// Drives one scenario to completion without graphics.
#[derive(Debug)]
pub struct HeadlessRunner {
    scenario: Scenario,
    sim: Simulation,
    ability_ids: HashMap<String, AbilityId>,
    effect_handles: HashMap<String, Arc<EffectTemplate>>,
    pod_ids: Vec<PodId>,
}

impl HeadlessRunner {
    /// Build the initial encounter state from a scenario.
    ///
    /// # Errors
    ///
    /// Returns a [`ScenarioError`] when a template fails validation.
    pub fn new(scenario: Scenario) -> Result<Self, ScenarioError> {
        let mut sim = Simulation::new(scenario.seed);

        let mut ability_ids = HashMap::new();
        for template in &scenario.abilities {
            let id = sim.register_ability(template.clone())?;
            ability_ids.insert(template.id.clone(), id);
        }

        let mut effect_handles = HashMap::new();
        for template in &scenario.effects {
            effect_handles.insert(template.id.clone(), Arc::new(template.clone()));
        }

        let mut pod_ids = Vec::new();
        for setup in &scenario.pods {
            let pod = sim.create_pod(setup.capacity);
            pod_ids.push(pod);
            for entry in &setup.spawns {
                for _ in 0..entry.count {
                    let id = sim.spawn(Combatant::new(
                        entry.name.clone(),
                        entry.category,
                        entry.max_health,
                    ));
                    if sim.pod_add(pod, id).is_err() {
                        // Over-capacity spawns are skipped, not fatal
                        let _ = sim.despawn(id);
                    }
                }
            }
        }

        Ok(Self {
            scenario,
            sim,
            ability_ids,
            effect_handles,
            pod_ids,
        })
    }

    /// The simulation under the runner (for inspection in tests).
    #[must_use]
    pub fn sim(&self) -> &Simulation {
        &self.sim
    }

    /// Run the scenario to its configured tick count.
    pub fn run(&mut self) -> EncounterMetrics {
        let dt = tick_delta();
        let mut metrics = EncounterMetrics::new(self.scenario.name.clone(), self.scenario.seed);

        let mut script = self.scenario.script.clone();
        script.sort_by_key(ScriptedAction::at_tick);
        let mut next = 0;

        for tick in 0..self.scenario.ticks {
            while next < script.len() && script[next].at_tick() <= tick {
                self.execute(&script[next]);
                next += 1;
            }
            let events = self.sim.tick(dt);
            metrics.record(&events);
        }

        metrics.duration_ticks = self.scenario.ticks;
        metrics.survivors = self
            .sim
            .registry()
            .iter()
            .filter(|(_, combatant)| combatant.is_alive())
            .count() as u32;
        metrics.final_state_hash = self.sim.state_hash();
        metrics
    }

    /// Resolve a script target to a live pod member.
    fn resolve(&self, target: TargetRef) -> Option<CombatantId> {
        let pod = self.pod_ids.get(target.pod)?;
        self.sim
            .pod(*pod)?
            .slots()
            .get(target.slot)
            .copied()
            .flatten()
    }

    /// Fire one scripted action. Lookup misses and rejections are logged
    /// and skipped; the tick loop must keep running.
    fn execute(&mut self, action: &ScriptedAction) {
        match action {
            ScriptedAction::UseAbility {
                caster,
                ability,
                target,
                ..
            } => {
                let (Some(&id), Some(target)) =
                    (self.ability_ids.get(ability), self.resolve(*target))
                else {
                    tracing::warn!(%ability, "Skipping cast: unknown ability or target gone");
                    return;
                };
                match self.sim.use_ability(CasterId(*caster), id, target) {
                    Ok(true) => {}
                    Ok(false) => tracing::debug!(%ability, "Cast rejected: on cooldown"),
                    Err(error) => tracing::warn!(%ability, %error, "Cast request failed"),
                }
            }
            ScriptedAction::ApplyEffect { effect, target, .. } => {
                let (Some(handle), Some(target)) =
                    (self.effect_handles.get(effect), self.resolve(*target))
                else {
                    tracing::warn!(%effect, "Skipping effect: unknown id or target gone");
                    return;
                };
                let handle = Arc::clone(handle);
                if !self.sim.apply_status_effect(&handle, target) {
                    tracing::debug!(%effect, "Effect application was a no-op");
                }
            }
            ScriptedAction::Despawn { target, .. } => {
                if let Some(target) = self.resolve(*target) {
                    if let Err(error) = self.sim.despawn(target) {
                        tracing::warn!(%error, "Despawn failed");
                    }
                }
            }
        }
    }
}
