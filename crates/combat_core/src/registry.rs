//! Generational arena for combatants.
//!
//! Timed activities (effect instances, pending casts) run for many ticks
//! and must never hold a direct reference to a combatant that could be
//! despawned between ticks. They hold a [`CombatantId`] instead: a
//! `(slot, generation)` pair. When a slot is recycled its generation is
//! bumped, so a stale handle dereferences to `None` ("target gone") and
//! the activity terminates cleanly instead of addressing a new occupant.

use serde::{Deserialize, Serialize};

use crate::combatant::Combatant;

/// Handle to a combatant in the registry.
///
/// Copyable and cheap; never dangles. A handle from a previous occupant of
/// a recycled slot fails to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CombatantId {
    index: u32,
    generation: u32,
}

impl CombatantId {
    /// Slot index inside the registry.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Generation the handle was issued for.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

impl std::fmt::Display for CombatantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// One arena slot: the occupant plus the generation it was issued under.
#[derive(Debug, Clone, Default, PartialEq, Hash, Serialize, Deserialize)]
struct Slot {
    generation: u32,
    occupant: Option<Combatant>,
}

/// Storage for all combatants in the simulation.
///
/// Iteration is in slot order, which is deterministic: the same sequence
/// of spawns and despawns always yields the same layout.
#[derive(Debug, Clone, Default, PartialEq, Hash, Serialize, Deserialize)]
pub struct CombatantRegistry {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl CombatantRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a combatant and return its handle.
    ///
    /// Recycles the most recently freed slot if one exists; the slot's
    /// generation was bumped on removal, so handles to the previous
    /// occupant stay stale.
    pub fn insert(&mut self, combatant: Combatant) -> CombatantId {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };
        let slot = &mut self.slots[index as usize];
        slot.occupant = Some(combatant);
        self.len += 1;
        CombatantId {
            index,
            generation: slot.generation,
        }
    }

    /// Remove a combatant by handle, returning it if the handle was live.
    pub fn remove(&mut self, id: CombatantId) -> Option<Combatant> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let removed = slot.occupant.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(removed)
    }

    /// Get a combatant by handle. Stale handles yield `None`.
    #[must_use]
    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.occupant.as_ref()
    }

    /// Get a mutable reference to a combatant by handle.
    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.occupant.as_mut()
    }

    /// Check if a handle is live.
    #[must_use]
    pub fn contains(&self, id: CombatantId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live combatants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate over live combatants in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (CombatantId, &Combatant)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.occupant.as_ref().map(|combatant| {
                (
                    CombatantId {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    combatant,
                )
            })
        })
    }

    /// Iterate mutably over live combatants in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (CombatantId, &mut Combatant)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(index, slot)| {
                let generation = slot.generation;
                slot.occupant.as_mut().map(|combatant| {
                    (
                        CombatantId {
                            index: index as u32,
                            generation,
                        },
                        combatant,
                    )
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::Category;

    fn rat() -> Combatant {
        Combatant::new("rat", Category::Rat, 50)
    }

    #[test]
    fn test_insert_and_get() {
        let mut registry = CombatantRegistry::new();
        let id = registry.insert(rat());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(id).unwrap().name, "rat");
    }

    #[test]
    fn test_stale_handle_after_remove() {
        let mut registry = CombatantRegistry::new();
        let id = registry.insert(rat());
        assert!(registry.remove(id).is_some());
        assert!(registry.get(id).is_none());
        assert!(registry.remove(id).is_none());
    }

    #[test]
    fn test_recycled_slot_gets_new_generation() {
        let mut registry = CombatantRegistry::new();
        let first = registry.insert(rat());
        registry.remove(first);

        let second = registry.insert(rat());
        assert_eq!(second.index(), first.index());
        assert_ne!(second.generation(), first.generation());

        // Old handle must not alias the new occupant
        assert!(registry.get(first).is_none());
        assert!(registry.get(second).is_some());
    }

    #[test]
    fn test_iteration_in_slot_order() {
        let mut registry = CombatantRegistry::new();
        let a = registry.insert(rat());
        let b = registry.insert(rat());
        let c = registry.insert(rat());
        registry.remove(b);

        let ids: Vec<CombatantId> = registry.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, c]);
    }
}
