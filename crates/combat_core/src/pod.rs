//! Pods: slot-addressed combatant groups with naming disambiguation.
//!
//! A pod owns two pieces of bookkeeping:
//!
//! - the **main sequence**: an ordered list of member slots. A member's
//!   slot index is stable for its whole membership; removal tombstones
//!   the slot (or truncates, if it was the last) so other indices never
//!   shift. Main-sequence indices are never reused.
//! - the **naming table**: per-category slot lists used only to generate
//!   disambiguating tags ("Cave Rat A", "Cave Rat B", ...). Naming slots
//!   *are* reused: a later arrival of the same category takes the first
//!   tombstoned slot and with it the tag.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::combatant::{format_name, Category, PodMembership};
use crate::error::{CombatError, Result};
use crate::registry::{CombatantId, CombatantRegistry};

/// Identifier of a pod inside a simulation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PodId(pub(crate) u32);

impl PodId {
    /// Raw pod index.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for PodId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A slot-addressed group of combatants.
#[derive(Debug, Clone, PartialEq, Hash, Serialize, Deserialize)]
pub struct Pod {
    id: PodId,
    capacity: usize,
    members: Vec<Option<CombatantId>>,
    naming: BTreeMap<Category, Vec<Option<CombatantId>>>,
}

impl Pod {
    /// Create an empty pod with a member capacity (derived from the
    /// pod's spatial footprint in the originating game).
    #[must_use]
    pub fn new(id: PodId, capacity: usize) -> Self {
        Self {
            id,
            capacity,
            members: Vec::new(),
            naming: BTreeMap::new(),
        }
    }

    /// The pod's identifier.
    #[must_use]
    pub const fn id(&self) -> PodId {
        self.id
    }

    /// Configured member capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of occupied member slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.iter().filter(|slot| slot.is_some()).count()
    }

    /// Check if the pod has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The main sequence, tombstones included.
    #[must_use]
    pub fn slots(&self) -> &[Option<CombatantId>] {
        &self.members
    }

    /// Main-sequence slot of a member, if present.
    #[must_use]
    pub fn slot_of(&self, id: CombatantId) -> Option<usize> {
        self.members.iter().position(|slot| *slot == Some(id))
    }

    /// Add a combatant to the pod, assigning its slot index and display
    /// tag. Idempotent: re-adding a present member returns its existing
    /// slot.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::CombatantNotFound`] for stale handles and
    /// [`CombatError::PodFull`] when the capacity is reached (callers
    /// log and skip — spawn placement issues must not abort the tick
    /// loop).
    pub fn add_member(
        &mut self,
        registry: &mut CombatantRegistry,
        id: CombatantId,
    ) -> Result<usize> {
        if let Some(slot) = self.slot_of(id) {
            return Ok(slot);
        }
        if !registry.contains(id) {
            return Err(CombatError::CombatantNotFound(id));
        }
        if self.len() >= self.capacity {
            return Err(CombatError::PodFull {
                pod: self.id.0,
                capacity: self.capacity,
            });
        }

        self.members.push(Some(id));
        let slot = self.members.len() - 1;

        self.assign_name(registry, id);

        if let Some(combatant) = registry.get_mut(id) {
            combatant.membership = Some(PodMembership { pod: self.id, slot });
            tracing::debug!(
                pod = %self.id,
                slot,
                name = %combatant.display_name,
                "Combatant joined pod"
            );
        }
        Ok(slot)
    }

    /// Remove a combatant: tombstone (or truncate, if last) its
    /// main-sequence slot and its naming slot, and detach the membership
    /// wiring. Returns whether the combatant was a member.
    pub fn remove_member(&mut self, registry: &mut CombatantRegistry, id: CombatantId) -> bool {
        let Some(slot) = self.slot_of(id) else {
            return false;
        };

        if slot == self.members.len() - 1 {
            self.members.pop();
        } else {
            self.members[slot] = None;
        }

        self.clear_naming_slot(registry, id);

        if let Some(combatant) = registry.get_mut(id) {
            combatant.membership = None;
        }
        true
    }

    /// Handle a member's death: free its naming slot for reuse. The
    /// main-sequence slot is untouched — dead members stay addressable
    /// until explicitly removed, and are skipped by [`next_member`](Self::next_member).
    pub fn handle_death(&mut self, registry: &mut CombatantRegistry, id: CombatantId) {
        tracing::debug!(pod = %self.id, combatant = %id, "Pod member died");
        self.clear_naming_slot(registry, id);
    }

    /// Find the next *alive* member strictly after `from`, scanning
    /// cyclically through the full sequence exactly once. Returns the
    /// slot index and handle, or `None` when no alive member exists.
    #[must_use]
    pub fn next_member(
        &self,
        registry: &CombatantRegistry,
        from: usize,
    ) -> Option<(usize, CombatantId)> {
        if self.members.is_empty() {
            return None;
        }
        let len = self.members.len();
        debug_assert!(from < len, "from index {from} out of range");
        let mut index = from % len;

        for _ in 0..len {
            index = if index + 1 < len { index + 1 } else { 0 };
            if let Some(id) = self.members[index] {
                if registry.get(id).is_some_and(|c| c.is_alive()) {
                    return Some((index, id));
                }
            }
        }
        None
    }

    /// Assign a naming slot and display tag to a newly added member.
    ///
    /// The first member of a category keeps its base name. The second
    /// retroactively tags the first (" A") and takes " B". Later
    /// arrivals reuse the first tombstoned naming slot, else append.
    fn assign_name(&mut self, registry: &mut CombatantRegistry, id: CombatantId) {
        let Some(category) = registry.get(id).map(|c| c.category) else {
            return;
        };
        let bucket = self.naming.entry(category).or_default();

        if bucket.is_empty() {
            bucket.push(Some(id));
            return;
        }

        if bucket.len() == 1 {
            let first = bucket[0];
            bucket.push(Some(id));
            if let Some(first_id) = first {
                Self::apply_tag(registry, first_id, 0);
            }
            Self::apply_tag(registry, id, 1);
            return;
        }

        let naming_slot = match bucket.iter().position(|slot| slot.is_none()) {
            Some(free) => {
                bucket[free] = Some(id);
                free
            }
            None => {
                bucket.push(Some(id));
                bucket.len() - 1
            }
        };
        Self::apply_tag(registry, id, naming_slot);
    }

    /// Tombstone a member's naming slot, or truncate it if it is the
    /// last entry of its category bucket.
    fn clear_naming_slot(&mut self, registry: &CombatantRegistry, id: CombatantId) {
        let category = registry.get(id).map(|c| c.category);
        // Fall back to a bucket scan when the combatant is already gone
        let buckets: Vec<Category> = match category {
            Some(category) => vec![category],
            None => self.naming.keys().copied().collect(),
        };

        for category in buckets {
            let Some(bucket) = self.naming.get_mut(&category) else {
                continue;
            };
            if let Some(index) = bucket.iter().position(|slot| *slot == Some(id)) {
                if index == bucket.len() - 1 {
                    bucket.pop();
                } else {
                    bucket[index] = None;
                }
                return;
            }
        }
    }

    /// Set a member's display name to its base name plus a slot tag.
    fn apply_tag(registry: &mut CombatantRegistry, id: CombatantId, naming_slot: usize) {
        if let Some(combatant) = registry.get_mut(id) {
            combatant.display_name =
                format!("{} {}", format_name(&combatant.name), format_tag(naming_slot));
        }
    }
}

/// Encode a naming-slot index as a base-26 alphabetic tag.
///
/// 0 -> "A", 25 -> "Z", 26 -> "AA", 51 -> "AZ", 52 -> "BA".
#[must_use]
pub fn format_tag(index: usize) -> String {
    let mut tag = String::new();
    if index / 26 > 0 {
        tag.push_str(&format_tag(index / 26 - 1));
    }
    tag.push((b'A' + (index % 26) as u8) as char);
    tag
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::Combatant;
    use proptest::prelude::*;

    fn setup() -> (CombatantRegistry, Pod) {
        (CombatantRegistry::new(), Pod::new(PodId(0), 16))
    }

    fn spawn_rat(registry: &mut CombatantRegistry) -> CombatantId {
        registry.insert(Combatant::new("caveRat", Category::Rat, 50))
    }

    fn display(registry: &CombatantRegistry, id: CombatantId) -> String {
        registry.get(id).unwrap().display_name.clone()
    }

    #[test]
    fn test_tag_encoding() {
        assert_eq!(format_tag(0), "A");
        assert_eq!(format_tag(25), "Z");
        assert_eq!(format_tag(26), "AA");
        assert_eq!(format_tag(51), "AZ");
        assert_eq!(format_tag(52), "BA");
    }

    proptest! {
        #[test]
        fn prop_tag_round_trips(index in 0usize..100_000) {
            let tag = format_tag(index);
            prop_assert!(!tag.is_empty());
            prop_assert!(tag.bytes().all(|b| b.is_ascii_uppercase()));

            // Decode: the encoding is bijective
            let mut decoded = 0usize;
            for byte in tag.bytes() {
                decoded = decoded * 26 + (byte - b'A') as usize + 1;
            }
            prop_assert_eq!(decoded - 1, index);
        }
    }

    #[test]
    fn test_first_member_keeps_base_name() {
        let (mut registry, mut pod) = setup();
        let rat = spawn_rat(&mut registry);
        pod.add_member(&mut registry, rat).unwrap();
        assert_eq!(display(&registry, rat), "Cave Rat");
    }

    #[test]
    fn test_second_member_retroactively_tags_first() {
        let (mut registry, mut pod) = setup();
        let first = spawn_rat(&mut registry);
        let second = spawn_rat(&mut registry);
        pod.add_member(&mut registry, first).unwrap();
        pod.add_member(&mut registry, second).unwrap();

        assert_eq!(display(&registry, first), "Cave Rat A");
        assert_eq!(display(&registry, second), "Cave Rat B");
    }

    #[test]
    fn test_tombstoned_naming_slot_is_reused() {
        let (mut registry, mut pod) = setup();
        let a = spawn_rat(&mut registry);
        let b = spawn_rat(&mut registry);
        let c = spawn_rat(&mut registry);
        pod.add_member(&mut registry, a).unwrap();
        pod.add_member(&mut registry, b).unwrap();
        pod.add_member(&mut registry, c).unwrap();
        assert_eq!(display(&registry, c), "Cave Rat C");

        // Tombstone B's naming slot (not last: C holds the last slot)
        pod.remove_member(&mut registry, b);

        let d = spawn_rat(&mut registry);
        pod.add_member(&mut registry, d).unwrap();
        assert_eq!(display(&registry, d), "Cave Rat B");
    }

    #[test]
    fn test_categories_are_tagged_independently() {
        let (mut registry, mut pod) = setup();
        let rat = spawn_rat(&mut registry);
        let sword = registry.insert(Combatant::new("swordsman", Category::Swordsman, 80));
        pod.add_member(&mut registry, rat).unwrap();
        pod.add_member(&mut registry, sword).unwrap();

        assert_eq!(display(&registry, rat), "Cave Rat");
        assert_eq!(display(&registry, sword), "Swordsman");
    }

    #[test]
    fn test_add_is_idempotent() {
        let (mut registry, mut pod) = setup();
        let rat = spawn_rat(&mut registry);
        let slot = pod.add_member(&mut registry, rat).unwrap();
        assert_eq!(pod.add_member(&mut registry, rat).unwrap(), slot);
        assert_eq!(pod.len(), 1);
        assert_eq!(display(&registry, rat), "Cave Rat");
    }

    #[test]
    fn test_capacity_is_enforced() {
        let mut registry = CombatantRegistry::new();
        let mut pod = Pod::new(PodId(0), 2);
        let a = spawn_rat(&mut registry);
        let b = spawn_rat(&mut registry);
        let c = spawn_rat(&mut registry);
        pod.add_member(&mut registry, a).unwrap();
        pod.add_member(&mut registry, b).unwrap();
        assert!(matches!(
            pod.add_member(&mut registry, c),
            Err(CombatError::PodFull { capacity: 2, .. })
        ));
    }

    #[test]
    fn test_remove_tombstones_non_last_slot() {
        let (mut registry, mut pod) = setup();
        let a = spawn_rat(&mut registry);
        let b = spawn_rat(&mut registry);
        let c = spawn_rat(&mut registry);
        pod.add_member(&mut registry, a).unwrap();
        let slot_b = pod.add_member(&mut registry, b).unwrap();
        let slot_c = pod.add_member(&mut registry, c).unwrap();

        pod.remove_member(&mut registry, b);
        assert_eq!(pod.slots()[slot_b], None);
        // Other members' indices do not shift
        assert_eq!(pod.slot_of(c), Some(slot_c));

        // Removing the last slot truncates
        pod.remove_member(&mut registry, c);
        assert_eq!(pod.slots().len(), 2);
    }

    #[test]
    fn test_readd_gets_fresh_main_slot_but_reuses_tag() {
        let (mut registry, mut pod) = setup();
        let a = spawn_rat(&mut registry);
        let b = spawn_rat(&mut registry);
        let c = spawn_rat(&mut registry);
        pod.add_member(&mut registry, a).unwrap();
        let old_slot = pod.add_member(&mut registry, b).unwrap();
        pod.add_member(&mut registry, c).unwrap();

        pod.remove_member(&mut registry, b);
        let new_slot = pod.add_member(&mut registry, b).unwrap();

        assert_ne!(new_slot, old_slot);
        assert_eq!(display(&registry, b), "Cave Rat B");
    }

    #[test]
    fn test_next_member_skips_dead_and_cycles_once() {
        let (mut registry, mut pod) = setup();
        let a = spawn_rat(&mut registry);
        let b = spawn_rat(&mut registry);
        let c = spawn_rat(&mut registry);
        pod.add_member(&mut registry, a).unwrap();
        pod.add_member(&mut registry, b).unwrap();
        pod.add_member(&mut registry, c).unwrap();

        registry.get_mut(b).unwrap().health.apply_damage(50);

        let (slot, id) = pod.next_member(&registry, 0).unwrap();
        assert_eq!((slot, id), (2, c));

        // Wraps around past the dead member
        let (slot, id) = pod.next_member(&registry, 2).unwrap();
        assert_eq!((slot, id), (0, a));

        registry.get_mut(a).unwrap().health.apply_damage(50);
        registry.get_mut(c).unwrap().health.apply_damage(50);
        assert!(pod.next_member(&registry, 0).is_none());
    }

    #[test]
    fn test_death_frees_naming_slot_but_not_main_slot() {
        let (mut registry, mut pod) = setup();
        let a = spawn_rat(&mut registry);
        let b = spawn_rat(&mut registry);
        pod.add_member(&mut registry, a).unwrap();
        let slot_b = pod.add_member(&mut registry, b).unwrap();

        registry.get_mut(a).unwrap().health.apply_damage(50);
        pod.handle_death(&mut registry, a);

        // Main sequence untouched, dead member still addressable
        assert_eq!(pod.slot_of(a), Some(0));
        // Naming slot A freed: a newcomer takes the "A" tag
        let c = spawn_rat(&mut registry);
        pod.add_member(&mut registry, c).unwrap();
        assert_eq!(display(&registry, c), "Cave Rat A");

        // The dead member is skipped when cycling targets
        let (slot, _) = pod.next_member(&registry, 0).unwrap();
        assert_eq!(slot, slot_b);
    }
}
