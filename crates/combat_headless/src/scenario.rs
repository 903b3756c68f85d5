//! Scenario loading and configuration.
//!
//! Scenarios define the initial encounter state for headless runs:
//! pods, spawns, ability and effect templates, and a scripted action
//! list keyed by tick number.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use combat_core::ability::AbilityTemplate;
use combat_core::combatant::Category;
use combat_core::effect::{EffectKind, EffectTemplate};
use combat_core::time::Seconds;

/// Error type for scenario operations.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// File not found.
    #[error("Scenario file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read scenario file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse scenario: {0}")]
    ParseError(#[from] ron::error::SpannedError),
    /// Scenario references an unknown ability or effect id.
    #[error("Scenario references unknown id '{0}'")]
    UnknownId(String),
    /// The core rejected part of the scenario (template validation).
    #[error(transparent)]
    Core(#[from] combat_core::error::CombatError),
}

/// A combatant spawn line inside a pod.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnEntry {
    /// Base name (camel case; the pod formats and tags it).
    pub name: String,
    /// Loot / naming category.
    pub category: Category,
    /// Maximum health.
    pub max_health: u32,
    /// How many copies to spawn.
    #[serde(default = "default_count")]
    pub count: u32,
}

const fn default_count() -> u32 {
    1
}

/// One pod and its initial members.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodSetup {
    /// Member capacity.
    pub capacity: usize,
    /// Spawn lines, processed in order.
    pub spawns: Vec<SpawnEntry>,
}

/// Reference to a pod member by pod index and main-sequence slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRef {
    /// Index into the scenario's pod list.
    pub pod: usize,
    /// Main-sequence slot inside the pod.
    pub slot: usize,
}

/// A scripted action, executed just before the given tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScriptedAction {
    /// Request an ability use.
    UseAbility {
        /// Tick to fire on.
        at_tick: u64,
        /// Caster token.
        caster: u32,
        /// Ability template id.
        ability: String,
        /// Target pod member.
        target: TargetRef,
    },
    /// Apply a standalone status effect.
    ApplyEffect {
        /// Tick to fire on.
        at_tick: u64,
        /// Effect template id.
        effect: String,
        /// Target pod member.
        target: TargetRef,
    },
    /// Explicitly remove a combatant mid-encounter.
    Despawn {
        /// Tick to fire on.
        at_tick: u64,
        /// Target pod member.
        target: TargetRef,
    },
}

impl ScriptedAction {
    /// The tick this action fires on.
    #[must_use]
    pub const fn at_tick(&self) -> u64 {
        match self {
            Self::UseAbility { at_tick, .. }
            | Self::ApplyEffect { at_tick, .. }
            | Self::Despawn { at_tick, .. } => *at_tick,
        }
    }
}

/// A complete scenario configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Encounter seed for damage rolls.
    pub seed: u64,
    /// Ticks to simulate.
    pub ticks: u64,
    /// Pods and their spawns.
    pub pods: Vec<PodSetup>,
    /// Ability templates available to the script.
    #[serde(default)]
    pub abilities: Vec<AbilityTemplate>,
    /// Standalone effect templates available to the script.
    #[serde(default)]
    pub effects: Vec<EffectTemplate>,
    /// Scripted actions, any order; fired by tick number.
    #[serde(default)]
    pub script: Vec<ScriptedAction>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::skirmish()
    }
}

impl Scenario {
    /// Load a scenario from a RON file.
    ///
    /// # Errors
    ///
    /// Returns a [`ScenarioError`] when the file is missing, unreadable
    /// or malformed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        let scenario: Scenario = ron::from_str(&contents)?;
        Ok(scenario)
    }

    /// Load from a RON string (useful for embedded scenarios).
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::ParseError`] on malformed input.
    pub fn from_ron_str(ron: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = ron::from_str(ron)?;
        Ok(scenario)
    }

    /// The built-in standard skirmish: one pod of three cave rats and a
    /// boss, a fire bolt recast on cooldown by the script, and a burning
    /// effect on the boss.
    #[must_use]
    pub fn skirmish() -> Self {
        let burning = EffectTemplate {
            id: "burning".to_string(),
            name: "burning".to_string(),
            tooltip: "Takes fire damage over time".to_string(),
            duration: Seconds::from_num(5),
            cue_up_time: Seconds::from_num(0.25),
            cue_down_time: Seconds::from_num(1),
            kind: EffectKind::DamageOverTime {
                damage_per_second: 10,
                tick_interval: Seconds::from_num(1),
            },
        };
        let fire_bolt = AbilityTemplate {
            id: "fire_bolt".to_string(),
            name: "fireBolt".to_string(),
            damage_min: 8,
            damage_max: 14,
            cast_duration: Seconds::from_num(0.5),
            base_cooldown: Seconds::from_num(2.5),
            requires_target: true,
            effect: Some(burning.clone()),
        };

        let script = (0..10)
            .map(|n| ScriptedAction::UseAbility {
                // Total cooldown is 3s = 60 ticks at the standard rate
                at_tick: n * 61,
                caster: 0,
                ability: "fire_bolt".to_string(),
                target: TargetRef { pod: 0, slot: 0 },
            })
            .chain(std::iter::once(ScriptedAction::ApplyEffect {
                at_tick: 5,
                effect: "burning".to_string(),
                target: TargetRef { pod: 0, slot: 3 },
            }))
            .collect();

        Self {
            name: "Standard Skirmish".to_string(),
            description: "One rat pod under sustained fire bolt pressure".to_string(),
            seed: 42,
            ticks: 800,
            pods: vec![PodSetup {
                capacity: 8,
                spawns: vec![
                    SpawnEntry {
                        name: "caveRat".to_string(),
                        category: Category::Rat,
                        max_health: 50,
                        count: 3,
                    },
                    SpawnEntry {
                        name: "boneKing".to_string(),
                        category: Category::Boss,
                        max_health: 400,
                        count: 1,
                    },
                ],
            }],
            abilities: vec![fire_bolt],
            effects: vec![burning],
            script,
        }
    }

    /// Total number of combatants this scenario spawns.
    #[must_use]
    pub fn spawn_count(&self) -> u32 {
        self.pods
            .iter()
            .flat_map(|pod| pod.spawns.iter())
            .map(|entry| entry.count)
            .sum()
    }
}
