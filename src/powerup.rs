//! Power-ups: limited uses per round, one active at a time, expiring on round time.
//!
//! Expiry is a stored timestamp compared against the round clock on every tick,
//! so a reset simply drops it; nothing is left scheduled.

use std::fmt;

const POWER_UP_COUNT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    Sunlight,
    Frozen,
}

impl PowerUpKind {
    pub const ALL: [Self; POWER_UP_COUNT] = [Self::Sunlight, Self::Frozen];

    /// Uses granted at the start of each round.
    pub const fn uses_per_round(self) -> u32 {
        match self {
            Self::Sunlight => 2,
            Self::Frozen => 1,
        }
    }

    /// Harvest value multiplier while active.
    pub const fn multiplier(self) -> u64 {
        match self {
            Self::Sunlight => 2,
            Self::Frozen => 3,
        }
    }

    pub const fn duration_ms(self) -> u64 {
        8_000
    }

    const fn index(self) -> usize {
        match self {
            Self::Sunlight => 0,
            Self::Frozen => 1,
        }
    }
}

impl fmt::Display for PowerUpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sunlight => "Sunlight",
            Self::Frozen => "Frozen",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePowerUp {
    pub kind: PowerUpKind,
    pub multiplier: u64,
    /// Round time (ms) at which the effect ends.
    pub expires_at: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerUpController {
    uses: [u32; POWER_UP_COUNT],
    active: Option<ActivePowerUp>,
}

impl PowerUpController {
    pub fn new() -> Self {
        Self {
            uses: PowerUpKind::ALL.map(PowerUpKind::uses_per_round),
            active: None,
        }
    }

    pub fn uses_remaining(&self, kind: PowerUpKind) -> u32 {
        self.uses[kind.index()]
    }

    pub fn active(&self) -> Option<ActivePowerUp> {
        self.active
    }

    /// Current harvest multiplier (1 when nothing is active).
    pub fn multiplier(&self) -> u64 {
        self.active.map_or(1, |a| a.multiplier)
    }

    /// Start `kind` at round time `now`. Rejected while another power-up is active
    /// or when no uses are left.
    pub fn activate(&mut self, kind: PowerUpKind, now: u64) -> bool {
        if self.active.is_some() || self.uses[kind.index()] == 0 {
            return false;
        }
        self.uses[kind.index()] -= 1;
        self.active = Some(ActivePowerUp {
            kind,
            multiplier: kind.multiplier(),
            expires_at: now + kind.duration_ms(),
        });
        true
    }

    /// Clear the active power-up if `now` has reached its expiry. Returns the expired kind.
    pub fn expire(&mut self, now: u64) -> Option<PowerUpKind> {
        match self.active {
            Some(a) if now >= a.expires_at => {
                self.active = None;
                Some(a.kind)
            }
            _ => None,
        }
    }

    /// Drop any active effect without firing its expiry.
    pub fn cancel(&mut self) {
        self.active = None;
    }

    pub fn remaining_ms(&self, now: u64) -> Option<u64> {
        self.active.map(|a| a.expires_at.saturating_sub(now))
    }
}

impl Default for PowerUpController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activation_consumes_one_use() {
        let mut p = PowerUpController::new();
        assert!(p.activate(PowerUpKind::Sunlight, 0));
        assert_eq!(p.uses_remaining(PowerUpKind::Sunlight), 1);
        assert_eq!(p.uses_remaining(PowerUpKind::Frozen), 1);
        assert_eq!(p.multiplier(), 2);
        assert_eq!(p.active().map(|a| a.expires_at), Some(8_000));
    }

    #[test]
    fn only_one_active_at_a_time() {
        let mut p = PowerUpController::new();
        assert!(p.activate(PowerUpKind::Sunlight, 1_000));
        assert!(!p.activate(PowerUpKind::Frozen, 1_500));
        assert!(!p.activate(PowerUpKind::Sunlight, 1_500));
        assert_eq!(p.uses_remaining(PowerUpKind::Frozen), 1);
        assert_eq!(p.uses_remaining(PowerUpKind::Sunlight), 1);
    }

    #[test]
    fn expires_at_deadline() {
        let mut p = PowerUpController::new();
        p.activate(PowerUpKind::Frozen, 500);
        assert_eq!(p.expire(8_400), None);
        assert_eq!(p.remaining_ms(8_400), Some(100));
        assert_eq!(p.expire(8_500), Some(PowerUpKind::Frozen));
        assert_eq!(p.active(), None);
        assert_eq!(p.multiplier(), 1);
        // One-shot: nothing left to expire.
        assert_eq!(p.expire(9_000), None);
    }

    #[test]
    fn uses_run_out() {
        let mut p = PowerUpController::new();
        assert!(p.activate(PowerUpKind::Frozen, 0));
        p.expire(8_000);
        assert!(!p.activate(PowerUpKind::Frozen, 9_000));
        assert!(p.active().is_none());
    }

    #[test]
    fn cancel_discards_pending_expiry() {
        let mut p = PowerUpController::new();
        p.activate(PowerUpKind::Sunlight, 0);
        p.cancel();
        assert_eq!(p.expire(10_000), None);
        assert_eq!(p.uses_remaining(PowerUpKind::Sunlight), 1);
    }
}
