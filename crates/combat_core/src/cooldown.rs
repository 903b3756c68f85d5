//! Ability reuse gating.
//!
//! A cooldown is a remaining-time counter checked once per tick. Extending
//! a running cooldown only ever lengthens it; an ability use request is
//! rejected outright while the cooldown is active.

use serde::{Deserialize, Serialize};

use crate::error::{CombatError, Result};
use crate::time::{fixed_serde, Seconds};

/// Per-ability, per-caster reuse timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cooldown {
    /// Total length of the current run, in seconds.
    #[serde(with = "fixed_serde")]
    total: Seconds,
    /// Remaining time of the current run, in seconds.
    #[serde(with = "fixed_serde")]
    remaining: Seconds,
    active: bool,
}

impl Cooldown {
    /// Create an idle cooldown.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the cooldown.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::InvalidCooldown`] for non-positive durations.
    pub fn start(&mut self, duration: Seconds) -> Result<()> {
        if duration <= Seconds::ZERO {
            return Err(CombatError::InvalidCooldown(duration.to_num()));
        }
        self.total = duration;
        self.remaining = duration;
        self.active = true;
        Ok(())
    }

    /// Extend the cooldown: starts it if idle, otherwise raises the
    /// remaining time to `max(remaining, duration)`. Never shortens.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::InvalidCooldown`] for non-positive durations.
    pub fn extend(&mut self, duration: Seconds) -> Result<()> {
        if duration <= Seconds::ZERO {
            return Err(CombatError::InvalidCooldown(duration.to_num()));
        }
        if !self.active {
            return self.start(duration);
        }
        if duration > self.remaining {
            self.remaining = duration;
        }
        if self.remaining > self.total {
            self.total = self.remaining;
        }
        Ok(())
    }

    /// Check if the cooldown is running.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Remaining time of the current run. Zero when idle.
    #[must_use]
    pub const fn remaining(&self) -> Seconds {
        self.remaining
    }

    /// Fraction of the current run still remaining, for reuse indicators.
    /// Zero when idle.
    #[must_use]
    pub fn fraction_remaining(&self) -> Seconds {
        if !self.active || self.total <= Seconds::ZERO {
            Seconds::ZERO
        } else {
            self.remaining / self.total
        }
    }

    /// Advance the cooldown by one tick. Returns `true` exactly on the
    /// tick the cooldown completes.
    pub fn tick(&mut self, dt: Seconds) -> bool {
        if !self.active {
            return false;
        }
        self.remaining -= dt;
        if self.remaining <= Seconds::ZERO {
            self.remaining = Seconds::ZERO;
            self.active = false;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: f64) -> Seconds {
        Seconds::from_num(n)
    }

    #[test]
    fn test_start_rejects_non_positive() {
        let mut cooldown = Cooldown::new();
        assert!(cooldown.start(Seconds::ZERO).is_err());
        assert!(cooldown.start(secs(-1.0)).is_err());
        assert!(!cooldown.is_active());
    }

    #[test]
    fn test_extend_never_shortens() {
        let mut cooldown = Cooldown::new();
        cooldown.start(secs(3.0)).unwrap();
        cooldown.extend(secs(1.0)).unwrap();
        assert_eq!(cooldown.remaining(), secs(3.0));
        cooldown.extend(secs(5.0)).unwrap();
        assert_eq!(cooldown.remaining(), secs(5.0));
    }

    #[test]
    fn test_extend_starts_idle_cooldown() {
        let mut cooldown = Cooldown::new();
        cooldown.extend(secs(2.0)).unwrap();
        assert!(cooldown.is_active());
        assert_eq!(cooldown.remaining(), secs(2.0));
    }

    #[test]
    fn test_tick_completes_once() {
        let mut cooldown = Cooldown::new();
        cooldown.start(secs(1.0)).unwrap();
        assert!(!cooldown.tick(secs(0.5)));
        assert!(cooldown.tick(secs(0.5)));
        assert!(!cooldown.is_active());
        assert!(!cooldown.tick(secs(0.5)));
    }

    #[test]
    fn test_fraction_remaining() {
        let mut cooldown = Cooldown::new();
        cooldown.start(secs(4.0)).unwrap();
        cooldown.tick(secs(1.0));
        assert_eq!(cooldown.fraction_remaining(), secs(0.75));
    }
}
