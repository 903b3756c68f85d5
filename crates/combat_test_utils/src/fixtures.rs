//! Test fixtures and helpers.
//!
//! Pre-built templates and encounter configurations for consistent
//! testing across crates.

use std::sync::Arc;

use fixed::types::I32F32;

use combat_core::ability::AbilityTemplate;
use combat_core::combatant::{Category, Combatant};
use combat_core::effect::{EffectKind, EffectTemplate};
use combat_core::pod::PodId;
use combat_core::registry::CombatantId;
use combat_core::simulation::Simulation;
use combat_core::time::Seconds;

/// Create a fixed-point number of seconds from an integer.
#[must_use]
pub fn secs(n: i32) -> Seconds {
    I32F32::from_num(n)
}

/// Create a fixed-point number of seconds from a float (for tests only).
///
/// Note: In real simulation code, never use floats.
/// This is only for convenient test setup.
#[must_use]
pub fn secs_f(n: f64) -> Seconds {
    I32F32::from_num(n)
}

/// A standard burning DOT: 5 seconds, 1-second ticks, 10 damage per
/// second.
#[must_use]
pub fn burning_template() -> Arc<EffectTemplate> {
    Arc::new(EffectTemplate {
        id: "burning".to_string(),
        name: "burning".to_string(),
        tooltip: "Takes fire damage over time".to_string(),
        duration: secs(5),
        cue_up_time: secs_f(0.2),
        cue_down_time: secs(1),
        kind: EffectKind::DamageOverTime {
            damage_per_second: 10,
            tick_interval: secs(1),
        },
    })
}

/// A cue-only blessing lasting 3 seconds.
#[must_use]
pub fn blessing_template() -> Arc<EffectTemplate> {
    Arc::new(EffectTemplate {
        id: "blessed".to_string(),
        name: "blessed".to_string(),
        tooltip: String::new(),
        duration: secs(3),
        cue_up_time: secs(3),
        cue_down_time: secs(1),
        kind: EffectKind::Cue,
    })
}

/// A fire bolt: 0.5s cast, 2.5s cooldown, 8-14 direct damage plus the
/// standard burning DOT.
#[must_use]
pub fn fire_bolt_template() -> AbilityTemplate {
    AbilityTemplate {
        id: "fire_bolt".to_string(),
        name: "fireBolt".to_string(),
        damage_min: 8,
        damage_max: 14,
        cast_duration: secs_f(0.5),
        base_cooldown: secs_f(2.5),
        requires_target: true,
        effect: Some(burning_template().as_ref().clone()),
    }
}

/// Spawn a standard 50-health cave rat.
pub fn spawn_rat(sim: &mut Simulation) -> CombatantId {
    sim.spawn(Combatant::new("caveRat", Category::Rat, 50))
}

/// Spawn a 500-health boss.
pub fn spawn_boss(sim: &mut Simulation) -> CombatantId {
    sim.spawn(Combatant::new("boneKing", Category::Boss, 500))
}

/// Build a small standard encounter: one pod with three rats and a boss.
///
/// Returns the simulation, the pod, and the member handles in spawn
/// order.
#[must_use]
pub fn rat_pod_encounter(seed: u64) -> (Simulation, PodId, Vec<CombatantId>) {
    let mut sim = Simulation::new(seed);
    let pod = sim.create_pod(8);
    let mut members = Vec::new();
    for _ in 0..3 {
        let rat = spawn_rat(&mut sim);
        sim.pod_add(pod, rat).expect("pod has room");
        members.push(rat);
    }
    let boss = spawn_boss(&mut sim);
    sim.pod_add(pod, boss).expect("pod has room");
    members.push(boss);
    (sim, pod, members)
}
