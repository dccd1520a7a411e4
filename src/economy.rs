//! Wallet and harvest pricing.

/// Money the player starts each round with.
pub const STARTING_MONEY: u64 = 50;

/// Watered plants sell for 130% (kept as a ratio so values floor exactly).
const WATER_BONUS_NUM: u64 = 13;
const WATER_BONUS_DEN: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wallet {
    money: u64,
}

impl Wallet {
    pub fn new(money: u64) -> Self {
        Self { money }
    }

    pub fn money(&self) -> u64 {
        self.money
    }

    pub fn can_spend(&self, amount: u64) -> bool {
        self.money >= amount
    }

    /// Debit `amount`. Refused (no change) when the balance is short.
    pub fn spend(&mut self, amount: u64) -> bool {
        if !self.can_spend(amount) {
            return false;
        }
        self.money -= amount;
        true
    }

    pub fn credit(&mut self, amount: u64) {
        self.money = self.money.saturating_add(amount);
    }
}

impl Default for Wallet {
    fn default() -> Self {
        Self::new(STARTING_MONEY)
    }
}

/// `floor(base × 1.3? × multiplier)`, computed in integers.
pub fn harvest_value(base: u64, watered: bool, multiplier: u64) -> u64 {
    let (num, den) = if watered {
        (WATER_BONUS_NUM, WATER_BONUS_DEN)
    } else {
        (1, 1)
    };
    base.saturating_mul(num).saturating_mul(multiplier) / den
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spend_requires_enough_money() {
        let mut w = Wallet::default();
        assert!(w.spend(25));
        assert_eq!(w.money(), 25);
        assert!(!w.spend(26));
        assert_eq!(w.money(), 25);
        assert!(w.spend(25));
        assert_eq!(w.money(), 0);
        w.credit(40);
        assert_eq!(w.money(), 40);
    }

    #[test]
    fn value_without_bonuses_is_base() {
        assert_eq!(harvest_value(47, false, 1), 47);
    }

    #[test]
    fn water_bonus_floors() {
        assert_eq!(harvest_value(30, true, 1), 39);
        assert_eq!(harvest_value(31, true, 1), 40); // 40.3
        assert_eq!(harvest_value(33, true, 1), 42); // 42.9
    }

    #[test]
    fn multiplier_applies_before_flooring() {
        // 33 × 1.3 × 2 = 85.8, whereas floor(42.9) × 2 would be 84.
        assert_eq!(harvest_value(31, true, 3), 120);
        assert_eq!(harvest_value(33, true, 2), 85);
        assert_eq!(harvest_value(60, false, 2), 120);
    }

    #[test]
    fn upper_bound_for_carrot() {
        assert_eq!(harvest_value(60, true, 3), 234);
    }
}
