//! Game state: one round of the garden (clock, grid, wallet, stock, power-ups)
//! plus the leaderboard, which outlives rounds.
//!
//! `tick` is the only thing that moves time. Player actions are plain calls that
//! either apply fully or leave everything untouched; a rejected action is never an error.

use crate::GameConfig;
use crate::clock::RoundClock;
use crate::economy::{Wallet, harvest_value};
use crate::garden::{Cell, Garden};
use crate::inventory::Inventory;
use crate::plants::PlantKind;
use crate::powerup::{PowerUpController, PowerUpKind};
use crate::rng::ValueSource;
use crate::scoreboard::{ScoreBoard, ScoreEntry, ScoreError};
use chrono::{Local, NaiveDate};
use tracing::{debug, info};

/// What one tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub refilled: bool,
    pub expired: Option<PowerUpKind>,
    pub stage_changes: usize,
    /// Set only on the tick that ended the round.
    pub round_ended: bool,
    /// Plantings discarded (unpaid) because the round ended.
    pub forfeited: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestSummary {
    /// Harvested cells, row-major.
    pub cells: Vec<(usize, usize)>,
    pub total: u64,
}

impl HarvestSummary {
    pub fn count(&self) -> usize {
        self.cells.len()
    }
}

/// Everything a frontend needs to draw one frame. Owns its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub grid: Vec<Vec<Cell>>,
    pub money: u64,
    pub stock: Vec<(PlantKind, u32)>,
    pub power_up_uses: Vec<(PowerUpKind, u32)>,
    /// Active power-up and the round time it has left.
    pub active_power_up: Option<(PowerUpKind, u64)>,
    pub elapsed_ms: u64,
    pub remaining_ms: u64,
    pub duration_ms: u64,
    pub ended: bool,
    pub score_submitted: bool,
    pub leaderboard: Vec<ScoreEntry>,
}

#[derive(Debug)]
pub struct GameState {
    config: GameConfig,
    garden: Garden,
    wallet: Wallet,
    inventory: Inventory,
    power_ups: PowerUpController,
    clock: RoundClock,
    score_submitted: bool,
    scoreboard: ScoreBoard,
    rng: Box<dyn ValueSource>,
}

impl GameState {
    pub fn new(config: &GameConfig, rng: Box<dyn ValueSource>) -> Self {
        Self {
            config: config.clone(),
            garden: Garden::new(config.grid_size),
            wallet: Wallet::new(config.starting_money),
            inventory: Inventory::new(),
            power_ups: PowerUpController::new(),
            clock: RoundClock::new(config.round_ms),
            score_submitted: false,
            scoreboard: ScoreBoard::new(),
            rng,
        }
    }

    /// Start a fresh round. The leaderboard and the value source carry over.
    pub fn reset(&mut self) {
        self.garden = Garden::new(self.config.grid_size);
        self.wallet = Wallet::new(self.config.starting_money);
        self.inventory = Inventory::new();
        self.power_ups = PowerUpController::new();
        self.clock = RoundClock::new(self.config.round_ms);
        self.score_submitted = false;
        info!(entries = self.scoreboard.entries().len(), "round reset");
    }

    pub fn garden(&self) -> &Garden {
        &self.garden
    }

    pub fn money(&self) -> u64 {
        self.wallet.money()
    }

    pub fn stock(&self, kind: PlantKind) -> u32 {
        self.inventory.stock(kind)
    }

    pub fn power_ups(&self) -> &PowerUpController {
        &self.power_ups
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.clock.elapsed_ms()
    }

    pub fn ended(&self) -> bool {
        self.clock.ended()
    }

    pub fn score_submitted(&self) -> bool {
        self.score_submitted
    }

    pub fn scoreboard(&self) -> &ScoreBoard {
        &self.scoreboard
    }

    /// Advance round time by `delta_ms`: restock on refill boundaries, end the round
    /// when time is up, otherwise expire power-ups and grow plants.
    pub fn tick(&mut self, delta_ms: u64) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        if self.clock.ended() || delta_ms == 0 {
            return outcome;
        }
        let step = self.clock.step(delta_ms);
        let now = self.clock.elapsed_ms();

        if step.refill_due {
            self.inventory.refill();
            outcome.refilled = true;
            info!(elapsed_ms = now, "inventory restocked");
        }

        if step.ended_now {
            // Whatever is still in the ground is lost, unpaid.
            outcome.forfeited = self.garden.clear();
            self.power_ups.cancel();
            outcome.round_ended = true;
            info!(
                money = self.wallet.money(),
                forfeited = outcome.forfeited,
                "round ended"
            );
            return outcome;
        }

        outcome.expired = self.power_ups.expire(now);
        if let Some(kind) = outcome.expired {
            info!(%kind, elapsed_ms = now, "power-up expired");
        }
        outcome.stage_changes = self.garden.advance(now);
        outcome
    }

    pub fn plant(&mut self, row: usize, col: usize, kind: PlantKind) -> bool {
        if self.clock.ended() {
            debug!(row, col, %kind, reason = "round over", "plant rejected");
            return false;
        }
        if !self.garden.is_vacant(row, col) {
            debug!(row, col, %kind, reason = "cell occupied or out of bounds", "plant rejected");
            return false;
        }
        if !self.inventory.can_afford(kind) {
            debug!(row, col, %kind, reason = "out of stock", "plant rejected");
            return false;
        }
        let cost = kind.spec().cost;
        if !self.wallet.can_spend(cost) {
            debug!(row, col, %kind, cost, reason = "not enough money", "plant rejected");
            return false;
        }
        let now = self.clock.elapsed_ms();
        let spent = self.wallet.spend(cost);
        let consumed = self.inventory.consume(kind);
        let planted = self.garden.plant(row, col, kind, now);
        debug_assert!(spent && consumed && planted, "plant checks out of sync");
        debug!(row, col, %kind, cost, money = self.wallet.money(), "planted");
        true
    }

    pub fn water(&mut self, row: usize, col: usize) -> bool {
        if self.clock.ended() {
            return false;
        }
        let watered = self.garden.water(row, col);
        if watered {
            debug!(row, col, "watered");
        } else {
            debug!(row, col, reason = "empty or already watered", "water rejected");
        }
        watered
    }

    /// Harvest a mature cell. Returns the amount credited.
    pub fn harvest(&mut self, row: usize, col: usize) -> Option<u64> {
        if self.clock.ended() {
            return None;
        }
        let Some(planting) = self.garden.take_mature(row, col) else {
            debug!(row, col, reason = "empty or not mature", "harvest rejected");
            return None;
        };
        let spec = planting.kind.spec();
        let base = self.rng.roll(spec.value_min, spec.value_max);
        let multiplier = self.power_ups.multiplier();
        let value = harvest_value(base, planting.watered, multiplier);
        self.wallet.credit(value);
        debug!(
            row,
            col,
            kind = %planting.kind,
            base,
            watered = planting.watered,
            multiplier,
            value,
            "harvested"
        );
        Some(value)
    }

    /// Harvest every mature cell. Each harvest is independent of the others.
    pub fn harvest_all(&mut self) -> HarvestSummary {
        let mut summary = HarvestSummary::default();
        for (row, col) in self.garden.mature_positions() {
            if let Some(value) = self.harvest(row, col) {
                summary.cells.push((row, col));
                summary.total += value;
            }
        }
        if summary.count() > 0 {
            info!(count = summary.count(), total = summary.total, "harvested all");
        }
        summary
    }

    pub fn activate_power_up(&mut self, kind: PowerUpKind) -> bool {
        if self.clock.ended() {
            return false;
        }
        let now = self.clock.elapsed_ms();
        let activated = self.power_ups.activate(kind, now);
        if activated {
            info!(%kind, elapsed_ms = now, uses_left = self.power_ups.uses_remaining(kind), "power-up activated");
        } else {
            debug!(%kind, reason = "active already or no uses left", "power-up rejected");
        }
        activated
    }

    /// Record the final balance under `name`. Allowed once per round, after it ended.
    pub fn submit_score(&mut self, name: &str) -> Result<Option<usize>, ScoreError> {
        self.submit_score_on(name, Local::now().date_naive())
    }

    fn submit_score_on(&mut self, name: &str, date: NaiveDate) -> Result<Option<usize>, ScoreError> {
        if !self.clock.ended() {
            return Err(ScoreError::RoundInProgress);
        }
        if self.score_submitted {
            return Err(ScoreError::AlreadySubmitted);
        }
        let score = self.wallet.money();
        let rank = self.scoreboard.submit(name, score, date)?;
        self.score_submitted = true;
        info!(name = name.trim(), score, ?rank, "score submitted");
        Ok(rank)
    }

    pub fn snapshot(&self) -> Snapshot {
        let now = self.clock.elapsed_ms();
        Snapshot {
            grid: self.garden.rows().to_vec(),
            money: self.wallet.money(),
            stock: self.inventory.counts(),
            power_up_uses: PowerUpKind::ALL
                .iter()
                .map(|&k| (k, self.power_ups.uses_remaining(k)))
                .collect(),
            active_power_up: self
                .power_ups
                .active()
                .zip(self.power_ups.remaining_ms(now))
                .map(|(a, left)| (a.kind, left)),
            elapsed_ms: now,
            remaining_ms: self.clock.remaining_ms(),
            duration_ms: self.clock.duration_ms(),
            ended: self.clock.ended(),
            score_submitted: self.score_submitted,
            leaderboard: self.scoreboard.entries().to_vec(),
        }
    }
}
