//! Status-effect templates and running instances.
//!
//! A template is immutable shared configuration (one `Arc` per authored
//! effect); an instance is one application of a template to one target.
//! Instances are explicit state machines holding only the counters needed
//! to resume: remaining duration, remaining damage interval, and the
//! visual-cue timers. The scheduler advances each instance once per tick.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::events::{CueChange, DamageEvent, DamageSource, EffectExpired, TickEvents};
use crate::registry::{CombatantId, CombatantRegistry};
use crate::time::{fixed_serde, Seconds};

/// What an effect does while it runs.
#[derive(Debug, Clone, Copy, PartialEq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Purely visual effect: cue on application, expiry after the
    /// duration, nothing else.
    Cue,
    /// Periodic damage for the whole duration.
    DamageOverTime {
        /// Damage rate; each tick applies `damage_per_second * tick_interval`
        /// (floored).
        damage_per_second: u32,
        /// Time between damage applications.
        #[serde(with = "fixed_serde")]
        tick_interval: Seconds,
    },
}

/// Immutable, shared status-effect configuration.
///
/// Templates hold no per-target state: any number of instances may run
/// concurrently against one template.
#[derive(Debug, Clone, PartialEq, Hash, Serialize, Deserialize)]
pub struct EffectTemplate {
    /// Unique string identifier (used in events).
    pub id: String,

    /// Base name as authored.
    pub name: String,

    /// Tooltip shown by external UI.
    #[serde(default)]
    pub tooltip: String,

    /// Total duration of one application.
    #[serde(with = "fixed_serde")]
    pub duration: Seconds,

    /// How long the visual cue stays on once triggered.
    #[serde(with = "fixed_serde", default = "default_cue_up_time")]
    pub cue_up_time: Seconds,

    /// Minimum off-time between cue re-triggers. Non-positive means the
    /// cue re-triggers on every damaging tick.
    #[serde(with = "fixed_serde", default = "default_cue_down_time")]
    pub cue_down_time: Seconds,

    /// Behavior while running.
    pub kind: EffectKind,
}

fn default_cue_up_time() -> Seconds {
    Seconds::from_num(0.2)
}

fn default_cue_down_time() -> Seconds {
    Seconds::from_num(1)
}

impl EffectTemplate {
    /// Parse a template from a RON string.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::CombatError::TemplateParse`] on malformed
    /// input.
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        Ok(ron::from_str(ron)?)
    }
}

/// One running application of an effect template to one target.
///
/// The target is addressed only through its generational handle; if the
/// combatant is despawned mid-run the instance terminates at its next
/// tick instead of touching a recycled slot.
#[derive(Debug, Clone, Hash, Serialize, Deserialize)]
pub struct EffectInstance {
    template: Arc<EffectTemplate>,
    target: CombatantId,
    /// Remaining total duration.
    #[serde(with = "fixed_serde")]
    main_timer: Seconds,
    /// Time until the next damage application (DOT only).
    #[serde(with = "fixed_serde")]
    dot_timer: Seconds,
    /// Time until the cue may re-trigger.
    #[serde(with = "fixed_serde")]
    cue_timer: Seconds,
    /// Time until an active cue switches off.
    #[serde(with = "fixed_serde")]
    cue_up_timer: Seconds,
    cue_active: bool,
    damage_per_tick: u32,
    finished: bool,
}

impl EffectInstance {
    /// Create an instance against a live, affectable target.
    ///
    /// Returns `None` (the whole application is a no-op) when the handle
    /// is stale or the target's category does not take status effects.
    /// The visual cue activates immediately; the resulting [`CueChange`]
    /// is pushed into `events`.
    pub fn try_new(
        template: Arc<EffectTemplate>,
        target: CombatantId,
        registry: &CombatantRegistry,
        events: &mut TickEvents,
    ) -> Option<Self> {
        let combatant = registry.get(target)?;
        if !combatant.category.is_affectable() {
            return None;
        }

        let (dot_timer, damage_per_tick) = match template.kind {
            EffectKind::Cue => (Seconds::ZERO, 0),
            EffectKind::DamageOverTime {
                damage_per_second,
                tick_interval,
            } => {
                let per_tick = (Seconds::from_num(damage_per_second) * tick_interval)
                    .floor()
                    .to_num::<u32>();
                (tick_interval, per_tick)
            }
        };

        events.cue_changes.push(CueChange {
            target,
            effect: template.id.clone(),
            active: true,
        });

        Some(Self {
            main_timer: template.duration,
            dot_timer,
            cue_timer: template.cue_down_time,
            cue_up_timer: template.cue_up_time,
            cue_active: true,
            damage_per_tick,
            template,
            target,
            finished: false,
        })
    }

    /// The shared template.
    #[must_use]
    pub fn template(&self) -> &Arc<EffectTemplate> {
        &self.template
    }

    /// The target handle.
    #[must_use]
    pub const fn target(&self) -> CombatantId {
        self.target
    }

    /// Remaining duration.
    #[must_use]
    pub const fn remaining(&self) -> Seconds {
        self.main_timer
    }

    /// Whether the visual cue is currently on.
    #[must_use]
    pub const fn cue_active(&self) -> bool {
        self.cue_active
    }

    /// Whether the instance has terminated and can be pruned.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Damage applied per DOT tick (zero for cue-only effects).
    #[must_use]
    pub const fn damage_per_tick(&self) -> u32 {
        self.damage_per_tick
    }

    /// Advance the instance by one tick.
    ///
    /// Step order within the instance is fixed: damage interval first,
    /// then cue re-trigger, then cue up-timer, then the main duration.
    /// A dead target stops damage but not the timers; a stale target
    /// terminates the instance.
    pub(crate) fn advance(
        &mut self,
        dt: Seconds,
        registry: &mut CombatantRegistry,
        events: &mut TickEvents,
    ) {
        if self.finished {
            return;
        }

        // Cooperative cancellation: target despawned since last tick.
        if !registry.contains(self.target) {
            self.cue_active = false;
            self.finished = true;
            events.effects_expired.push(EffectExpired {
                target: self.target,
                effect: self.template.id.clone(),
            });
            return;
        }

        if let EffectKind::DamageOverTime { tick_interval, .. } = self.template.kind {
            self.dot_timer -= dt;
            let mut fired = false;
            if self.dot_timer <= Seconds::ZERO {
                fired = true;
                self.deal_dot_damage(registry, events);
                self.dot_timer = tick_interval;
            }

            if fired {
                if self.template.cue_down_time <= Seconds::ZERO {
                    self.trigger_cue(events);
                } else if self.cue_timer <= Seconds::ZERO {
                    self.trigger_cue(events);
                    self.cue_timer = self.template.cue_down_time;
                }
            }
            self.cue_timer -= dt;
        }

        if self.cue_active {
            self.cue_up_timer -= dt;
            if self.cue_up_timer <= Seconds::ZERO {
                self.cue_active = false;
                events.cue_changes.push(CueChange {
                    target: self.target,
                    effect: self.template.id.clone(),
                    active: false,
                });
            }
        }

        self.main_timer -= dt;
        if self.main_timer <= Seconds::ZERO {
            self.expire(events);
        }
    }

    /// Apply one DOT tick. Dead targets take no damage; the instance
    /// keeps running to its natural end.
    fn deal_dot_damage(&mut self, registry: &mut CombatantRegistry, events: &mut TickEvents) {
        let Some(combatant) = registry.get_mut(self.target) else {
            return;
        };
        if !combatant.is_alive() {
            return;
        }
        let killed = combatant.health.apply_damage(self.damage_per_tick);
        events.damage.push(DamageEvent {
            target: self.target,
            amount: self.damage_per_tick,
            source: DamageSource::Effect {
                effect: self.template.id.clone(),
            },
            killed,
        });
    }

    /// Switch the cue on (transition event only) and restart its up-timer.
    fn trigger_cue(&mut self, events: &mut TickEvents) {
        if !self.cue_active {
            self.cue_active = true;
            events.cue_changes.push(CueChange {
                target: self.target,
                effect: self.template.id.clone(),
                active: true,
            });
        }
        self.cue_up_timer = self.template.cue_up_time;
    }

    /// Terminate the instance, destroying its cue.
    fn expire(&mut self, events: &mut TickEvents) {
        if self.cue_active {
            self.cue_active = false;
            events.cue_changes.push(CueChange {
                target: self.target,
                effect: self.template.id.clone(),
                active: false,
            });
        }
        self.finished = true;
        events.effects_expired.push(EffectExpired {
            target: self.target,
            effect: self.template.id.clone(),
        });
    }
}
