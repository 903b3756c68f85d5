//! Combatant definitions.
//!
//! A combatant is any targetable participant in an encounter: enemies,
//! destructibles, loot chests. Combatants are pure data; behavior lives in
//! the simulation systems that mutate them.

use serde::{Deserialize, Serialize};

use crate::health::Health;
use crate::pod::PodId;

/// Loot / naming category of a combatant.
///
/// Determines the loot-drop intent emitted on death and the bucket used
/// for duplicate-name disambiguation inside a pod.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum Category {
    /// Humanoid melee enemy.
    Swordsman,
    /// Stationary lootable chest. Damageable but not affectable by
    /// status effects.
    LootChest,
    /// Small vermin enemy.
    #[default]
    Rat,
    /// Encounter boss.
    Boss,
    /// Breakable scenery (crates, barricades). Not affectable.
    WoodenDestructible,
}

impl Category {
    /// Check whether status effects may be applied to this category.
    ///
    /// Effects on scenery and chests are a no-op by contract.
    #[must_use]
    pub const fn is_affectable(&self) -> bool {
        matches!(self, Self::Swordsman | Self::Rat | Self::Boss)
    }
}

/// A combatant's membership in a pod.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PodMembership {
    /// The owning pod.
    pub pod: PodId,
    /// Main-sequence slot index inside the pod. Stable until removal.
    pub slot: usize,
}

/// A targetable participant in an encounter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Combatant {
    /// Base name as authored (e.g. `"caveRat"`).
    pub name: String,
    /// Human-readable name shown to players, including any pod tag
    /// (e.g. `"Cave Rat B"`). Owned by the pod naming bookkeeping.
    pub display_name: String,
    /// Loot / naming category.
    pub category: Category,
    /// Health state.
    pub health: Health,
    /// Pod membership, if any. The pod does not own the combatant's
    /// lifetime; the registry does.
    pub membership: Option<PodMembership>,
    /// Loot-drop latch: set once when the death intent is emitted.
    loot_dropped: bool,
}

impl Combatant {
    /// Create a combatant at full health with a formatted display name.
    #[must_use]
    pub fn new(name: impl Into<String>, category: Category, max_health: u32) -> Self {
        let name = name.into();
        let display_name = format_name(&name);
        Self {
            name,
            display_name,
            category,
            health: Health::new(max_health),
            membership: None,
            loot_dropped: false,
        }
    }

    /// Check if the combatant is alive.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.health.is_alive()
    }

    /// Check whether the loot-drop intent has already been emitted.
    #[must_use]
    pub const fn has_dropped_loot(&self) -> bool {
        self.loot_dropped
    }

    /// Latch the loot drop. Returns `false` if it was already latched,
    /// so a second death notification can never emit a second drop.
    pub fn latch_loot_drop(&mut self) -> bool {
        if self.loot_dropped {
            return false;
        }
        self.loot_dropped = true;
        true
    }
}

/// Format a camel- or title-case identifier as a display name.
///
/// Capitalizes the first letter and inserts spaces before capitals and
/// digits: `"caveRat"` -> `"Cave Rat"`, `"HPShrine2"` -> `"HP Shrine 2"`.
#[must_use]
pub fn format_name(raw: &str) -> String {
    if raw.is_empty() {
        return "No Name".to_string();
    }

    let chars: Vec<char> = raw.chars().collect();
    let mut result = String::with_capacity(raw.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if i == 0 {
            result.extend(c.to_uppercase());
            continue;
        }
        let prev = chars[i - 1];
        let boundary = (prev.is_lowercase() && (c.is_uppercase() || c.is_ascii_digit()))
            || (prev.is_uppercase()
                && c.is_uppercase()
                && chars.get(i + 1).is_some_and(|n| n.is_lowercase()));
        if boundary {
            result.push(' ');
        }
        result.push(c);
    }

    result
}
