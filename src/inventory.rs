//! Seed stock per plant kind.

use crate::plants::{KIND_COUNT, PlantKind};

/// Stock level every kind starts at and is reset to on each refill.
pub const RESTOCK_LEVEL: u32 = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    stock: [u32; KIND_COUNT],
}

impl Inventory {
    pub fn new() -> Self {
        Self {
            stock: [RESTOCK_LEVEL; KIND_COUNT],
        }
    }

    /// Reset every kind to `RESTOCK_LEVEL`, whatever it was before.
    pub fn refill(&mut self) {
        self.stock = [RESTOCK_LEVEL; KIND_COUNT];
    }

    pub fn stock(&self, kind: PlantKind) -> u32 {
        self.stock[kind.index()]
    }

    pub fn can_afford(&self, kind: PlantKind) -> bool {
        self.stock(kind) > 0
    }

    /// Take one seed. Returns false (and changes nothing) when out of stock.
    pub fn consume(&mut self, kind: PlantKind) -> bool {
        let slot = &mut self.stock[kind.index()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    /// (kind, count) in catalog order.
    pub fn counts(&self) -> Vec<(PlantKind, u32)> {
        PlantKind::ALL.iter().map(|&k| (k, self.stock(k))).collect()
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consume_until_empty() {
        let mut inv = Inventory::new();
        for _ in 0..RESTOCK_LEVEL {
            assert!(inv.consume(PlantKind::Corn));
        }
        assert!(!inv.can_afford(PlantKind::Corn));
        assert!(!inv.consume(PlantKind::Corn));
        assert_eq!(inv.stock(PlantKind::Corn), 0);
        assert_eq!(inv.stock(PlantKind::Carrot), RESTOCK_LEVEL);
    }

    #[test]
    fn refill_resets_rather_than_adds() {
        let mut inv = Inventory::new();
        inv.consume(PlantKind::Carrot);
        inv.consume(PlantKind::Carrot);
        inv.refill();
        assert!(inv.counts().iter().all(|&(_, n)| n == RESTOCK_LEVEL));
        // Refilling a full inventory does not overflow the level.
        inv.refill();
        assert_eq!(inv.stock(PlantKind::Pepper), RESTOCK_LEVEL);
    }
}
