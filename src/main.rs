//! Gardentui: plant, water and harvest against the clock in the terminal.

mod app;
mod clock;
mod economy;
mod game;
mod garden;
mod input;
mod inventory;
mod plants;
mod powerup;
mod rng;
mod scoreboard;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Largest grid the UI lays out.
pub const MAX_GRID_SIZE: usize = 16;

/// Round-scoped parameters handed to `GameState::new`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub grid_size: usize,
    pub starting_money: u64,
    pub round_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 8,
            starting_money: economy::STARTING_MONEY,
            round_ms: clock::DEFAULT_ROUND_MS,
        }
    }
}

impl From<&Args> for GameConfig {
    fn from(args: &Args) -> Self {
        Self {
            grid_size: args.grid_size.clamp(1, MAX_GRID_SIZE),
            starting_money: args.starting_money,
            round_ms: args.round_secs.saturating_mul(1_000).max(1),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = args.log_file.as_deref() {
        init_logging(path)?;
    }
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_default();
    let config = GameConfig::from(&args);
    info!(?config, seed = ?args.seed, "starting");
    let mut app = App::new(args, config, theme);
    app.run()?;
    Ok(())
}

/// Send tracing output to `path`; stdout belongs to the UI.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gardentui=info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();
    Ok(())
}

/// Timed garden-growing economy game in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "gardentui",
    version,
    about = "Timed garden-growing economy game in the terminal. Buy seeds, grow them, sell the harvest before time runs out.",
    long_about = "Gardentui is a terminal garden economy game.\n\n\
        Plant seeds on the grid, water them to speed up growth, and harvest mature plants \
        for money. Seed stock refills every 30 seconds. Sunlight and Frozen power-ups \
        multiply harvest value for a few seconds. Whatever is still in the ground when \
        the round ends is lost.\n\n\
        CONTROLS:\n  Arrows/hjkl Move cursor   Space/Enter Use tool   1-6   Select plant\n  \
        p / w / x   Plant / Water / Harvest tool    a     Harvest all\n  \
        s / f       Sunlight / Frozen               r     New round   q / Esc  Quit\n\n\
        The mouse works too: click to use the tool, drag to plant or water a row of cells."
)]
pub struct Args {
    /// Grid is N×N cells (1 to 16).
    #[arg(long, default_value = "8", value_name = "N")]
    pub grid_size: usize,

    /// Money at the start of each round.
    #[arg(long, default_value = "50", value_name = "N")]
    pub starting_money: u64,

    /// Round length in seconds.
    #[arg(long, default_value = "180", value_name = "SECS")]
    pub round_secs: u64,

    /// Game tick cadence in milliseconds.
    #[arg(long, default_value = "100", value_name = "MS")]
    pub tick_ms: u64,

    /// Seed for harvest values (random if not set).
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Disable the harvest flash.
    #[arg(long)]
    pub no_animation: bool,

    /// Write logs to this file (filter with RUST_LOG).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_match_core_constants() {
        let args = Args::parse_from(["gardentui"]);
        assert_eq!(GameConfig::from(&args), GameConfig::default());
        assert_eq!(args.tick_ms, 100);
        assert_eq!(args.palette, Palette::Normal);
    }

    #[test]
    fn grid_size_is_clamped() {
        let args = Args::parse_from(["gardentui", "--grid-size", "40", "--round-secs", "0"]);
        let config = GameConfig::from(&args);
        assert_eq!(config.grid_size, MAX_GRID_SIZE);
        assert_eq!(config.round_ms, 1);
        let args = Args::parse_from(["gardentui", "--grid-size", "0"]);
        assert_eq!(GameConfig::from(&args).grid_size, 1);
    }

    #[test]
    fn palette_aliases() {
        let args = Args::parse_from(["gardentui", "--palette", "colourblind"]);
        assert_eq!(args.palette, Palette::Colorblind);
    }
}
