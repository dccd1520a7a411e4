//! Round clock: elapsed round time, restock boundaries and the one-way end of a round.

/// Inventory is restocked whenever elapsed round time lands on a multiple of this.
pub const REFILL_INTERVAL_MS: u64 = 30_000;

/// Default round length (3 minutes).
pub const DEFAULT_ROUND_MS: u64 = 180_000;

/// What a single clock step crossed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockStep {
    /// Post-step elapsed time is a positive multiple of `REFILL_INTERVAL_MS`.
    pub refill_due: bool,
    /// This step ended the round. Reported at most once per round.
    pub ended_now: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundClock {
    elapsed_ms: u64,
    duration_ms: u64,
    ended: bool,
}

impl RoundClock {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            elapsed_ms: 0,
            duration_ms,
            ended: false,
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn remaining_ms(&self) -> u64 {
        self.duration_ms.saturating_sub(self.elapsed_ms)
    }

    pub fn ended(&self) -> bool {
        self.ended
    }

    /// Advance by `delta_ms`. Time only moves forward and stops at the round duration.
    /// A clock that has already ended does not move.
    pub fn step(&mut self, delta_ms: u64) -> ClockStep {
        if self.ended {
            return ClockStep::default();
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms);
        // Checked against the unclamped post-step value. A step that overshoots the
        // duration ends the round without a refill even if the duration is a multiple.
        let refill_due = self.elapsed_ms > 0 && self.elapsed_ms % REFILL_INTERVAL_MS == 0;
        let ended_now = self.elapsed_ms >= self.duration_ms;
        if ended_now {
            self.elapsed_ms = self.duration_ms;
            self.ended = true;
        }
        ClockStep {
            refill_due,
            ended_now,
        }
    }
}

impl Default for RoundClock {
    fn default() -> Self {
        Self::new(DEFAULT_ROUND_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refill_fires_on_exact_multiples_only() {
        let mut clock = RoundClock::default();
        let mut refills = Vec::new();
        for _ in 0..1_200 {
            if clock.step(100).refill_due {
                refills.push(clock.elapsed_ms());
            }
        }
        assert_eq!(refills, vec![30_000, 60_000, 90_000, 120_000]);
    }

    #[test]
    fn irregular_steps_only_refill_when_landing_on_boundary() {
        let mut clock = RoundClock::default();
        assert!(!clock.step(29_950).refill_due);
        // Jumps over 30_000 without landing on it.
        assert!(!clock.step(100).refill_due);
        assert!(clock.step(29_950).refill_due);
        assert_eq!(clock.elapsed_ms(), 60_000);
    }

    #[test]
    fn ends_exactly_once_and_clamps() {
        let mut clock = RoundClock::new(1_000);
        assert!(!clock.step(900).ended_now);
        assert!(!clock.ended());
        let step = clock.step(250);
        assert!(step.ended_now);
        assert!(clock.ended());
        assert_eq!(clock.elapsed_ms(), 1_000);
        assert_eq!(clock.remaining_ms(), 0);
        assert_eq!(clock.step(100), ClockStep::default());
        assert_eq!(clock.elapsed_ms(), 1_000);
    }

    #[test]
    fn overshooting_the_end_skips_the_refill() {
        let mut clock = RoundClock::default();
        clock.step(150_000);
        let step = clock.step(40_000);
        assert!(step.ended_now);
        assert!(!step.refill_due);
        assert_eq!(clock.elapsed_ms(), DEFAULT_ROUND_MS);
    }

    #[test]
    fn end_at_exact_duration_not_before() {
        let mut clock = RoundClock::new(300);
        assert!(!clock.step(100).ended_now);
        assert!(!clock.step(100).ended_now);
        assert!(clock.step(100).ended_now);
    }
}
