//! Plant catalog: the static, immutable description of every seed the shop sells.

use std::fmt;

/// Number of growth stages a planting goes through (0 = seedling, 2 = mature).
pub const STAGE_COUNT: usize = 3;

/// Number of plant kinds in the catalog.
pub const KIND_COUNT: usize = 6;

/// Highest stage; only cells at this stage can be harvested.
pub const MATURE_STAGE: u8 = 2;

/// Plant kinds available in the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlantKind {
    Carrot,
    CherryBlossom,
    Corn,
    Sunflower,
    Pepper,
    Pumpkin,
}

/// Static numbers for one plant kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlantSpec {
    pub name: &'static str,
    /// Price of one seed.
    pub cost: u64,
    /// Time from planting to maturity when not watered.
    pub growth_ms: u64,
    /// Inclusive range of the base harvest value.
    pub value_min: u64,
    pub value_max: u64,
    /// Glyph per growth stage.
    pub stages: [&'static str; STAGE_COUNT],
}

impl PlantKind {
    pub const ALL: [Self; KIND_COUNT] = [
        Self::Carrot,
        Self::CherryBlossom,
        Self::Corn,
        Self::Sunflower,
        Self::Pepper,
        Self::Pumpkin,
    ];

    pub const fn spec(self) -> PlantSpec {
        match self {
            Self::Carrot => PlantSpec {
                name: "Carrot",
                cost: 25,
                growth_ms: 3_000,
                value_min: 30,
                value_max: 60,
                stages: ["🌱", "🌿", "🥕"],
            },
            Self::CherryBlossom => PlantSpec {
                name: "Cherry Blossom",
                cost: 30_000,
                growth_ms: 12_000,
                value_min: 45_000,
                value_max: 75_000,
                stages: ["🌱", "🌿", "🌸"],
            },
            Self::Corn => PlantSpec {
                name: "Corn",
                cost: 5_000,
                growth_ms: 8_000,
                value_min: 7_500,
                value_max: 12_000,
                stages: ["🌱", "🌿", "🌽"],
            },
            Self::Sunflower => PlantSpec {
                name: "Sunflower",
                cost: 400,
                growth_ms: 7_000,
                value_min: 600,
                value_max: 1_000,
                stages: ["🌱", "🌿", "🌻"],
            },
            Self::Pepper => PlantSpec {
                name: "Pepper",
                cost: 10_000,
                growth_ms: 5_500,
                value_min: 15_000,
                value_max: 23_000,
                stages: ["🌱", "🌿", "🌶"],
            },
            Self::Pumpkin => PlantSpec {
                name: "Pumpkin",
                cost: 2_000,
                growth_ms: 10_000,
                value_min: 2_500,
                value_max: 4_500,
                stages: ["🌱", "🌿", "🎃"],
            },
        }
    }

    /// Position in `ALL`; used as a dense index by the inventory and the shop keys.
    pub const fn index(self) -> usize {
        match self {
            Self::Carrot => 0,
            Self::CherryBlossom => 1,
            Self::Corn => 2,
            Self::Sunflower => 3,
            Self::Pepper => 4,
            Self::Pumpkin => 5,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }

    /// Glyph for a growth stage (clamped to the mature glyph).
    pub fn glyph(self, stage: u8) -> &'static str {
        let stages = self.spec().stages;
        stages[(stage as usize).min(STAGE_COUNT - 1)]
    }
}

impl fmt::Display for PlantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spec().name)
    }
}
