//! Garden grid and growth: cells, planting, watering and stage advancement.

use crate::plants::{MATURE_STAGE, PlantKind};

/// Stage thresholds in percent of the plant's growth time: (stage 1, stage 2).
const DRY_THRESHOLDS: (u64, u64) = (50, 100);
const WATERED_THRESHOLDS: (u64, u64) = (33, 66);

/// A growing plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Planting {
    pub kind: PlantKind,
    /// 0 = seedling, 1 = growing, 2 = mature.
    pub stage: u8,
    /// Round time (ms) at which it was planted.
    pub planted_at: u64,
    /// Once set, stays set until harvest.
    pub watered: bool,
}

impl Planting {
    pub fn is_mature(&self) -> bool {
        self.stage >= MATURE_STAGE
    }
}

/// Single cell: empty soil or a planting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Planted(Planting),
}

impl Cell {
    pub fn planting(&self) -> Option<&Planting> {
        match self {
            Self::Empty => None,
            Self::Planted(p) => Some(p),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Stage reached after `since_ms` of growth. Integer math so that e.g. 990 ms of a
/// 3000 ms plant counts as exactly 33%.
pub fn stage_for(since_ms: u64, growth_ms: u64, watered: bool) -> u8 {
    let (first, second) = if watered {
        WATERED_THRESHOLDS
    } else {
        DRY_THRESHOLDS
    };
    let progress = since_ms.saturating_mul(100);
    if progress >= growth_ms.saturating_mul(second) {
        2
    } else if progress >= growth_ms.saturating_mul(first) {
        1
    } else {
        0
    }
}

/// Square grid of cells. `rows[r][c]`, row 0 at the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Garden {
    pub size: usize,
    rows: Vec<Vec<Cell>>,
}

impl Garden {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            rows: vec![vec![Cell::Empty; size]; size],
        }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn is_vacant(&self, row: usize, col: usize) -> bool {
        self.get(row, col).is_some_and(|c| c.is_empty())
    }

    pub fn occupied(&self) -> usize {
        self.rows.iter().flatten().filter(|c| !c.is_empty()).count()
    }

    /// Put a fresh seedling on an empty cell. False if occupied or out of bounds.
    pub fn plant(&mut self, row: usize, col: usize, kind: PlantKind, now: u64) -> bool {
        match self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell @ Cell::Empty) => {
                *cell = Cell::Planted(Planting {
                    kind,
                    stage: 0,
                    planted_at: now,
                    watered: false,
                });
                true
            }
            _ => false,
        }
    }

    /// Mark a planting as watered. False if empty or already watered.
    pub fn water(&mut self, row: usize, col: usize) -> bool {
        match self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(Cell::Planted(p)) if !p.watered => {
                p.watered = true;
                true
            }
            _ => false,
        }
    }

    /// Remove and return a mature planting, leaving the cell empty.
    pub fn take_mature(&mut self, row: usize, col: usize) -> Option<Planting> {
        let cell = self.rows.get_mut(row).and_then(|r| r.get_mut(col))?;
        match *cell {
            Cell::Planted(p) if p.is_mature() => {
                *cell = Cell::Empty;
                Some(p)
            }
            _ => None,
        }
    }

    /// Positions of every mature planting, row-major.
    pub fn mature_positions(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for (r, row) in self.rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if cell.planting().is_some_and(Planting::is_mature) {
                    out.push((r, c));
                }
            }
        }
        out
    }

    /// Recompute stages at round time `now`. Stages only move forward.
    /// Returns how many cells changed stage.
    pub fn advance(&mut self, now: u64) -> usize {
        let mut changed = 0;
        for cell in self.rows.iter_mut().flatten() {
            if let Cell::Planted(p) = cell {
                let growth_ms = p.kind.spec().growth_ms;
                let computed = stage_for(now.saturating_sub(p.planted_at), growth_ms, p.watered);
                if computed > p.stage {
                    p.stage = computed;
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Empty every cell. Returns how many plantings were discarded.
    pub fn clear(&mut self) -> usize {
        let n = self.occupied();
        for cell in self.rows.iter_mut().flatten() {
            *cell = Cell::Empty;
        }
        n
    }
}
