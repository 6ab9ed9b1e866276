//! Sandfall — falling-sand screensaver in the terminal.

mod app;
mod grid;
mod input;
mod phase;
mod theme;
mod ui;

use anyhow::Result;
use app::App;
use clap::{Parser, ValueEnum};

/// Options derived from CLI that drive the simulation (spawn budget, wait
/// ticks, pacing, spawn policy).
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Ticks per cycle during which the top row gets new sand. None = grid height.
    pub spawn_frames: Option<u32>,
    /// Idle ticks between the pile settling and the clearing sweep. None = height / 4.
    pub wait_frames: Option<u32>,
    pub tick_ms: u64,
    pub policy: PolicyKind,
    pub spawn_chance: u32,
    pub seed: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let theme = theme::Theme::load(args.theme.as_deref()).unwrap_or_default();
    let config = SimConfig {
        spawn_frames: args.spawn_frames,
        wait_frames: args.wait_frames,
        tick_ms: args.tick_ms,
        policy: args.policy,
        spawn_chance: args.spawn_chance,
        seed: args.seed,
    };
    let mut app = App::new(&args, config, theme)?;
    app.run()?;
    Ok(())
}

/// Falling-sand screensaver in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "sandfall",
    version,
    about = "Falling-sand screensaver: sand rains from the top, settles into piles, and sweeps away.",
    long_about = "Sandfall animates a falling-sand cycle in your terminal.\n\n\
        Sand spawns along the top row, falls (straight down, else down-left, else \
        down-right), and piles up. Once the pile settles, the whole field scrolls \
        off the bottom edge and the cycle starts over.\n\n\
        CONTROLS:\n  p / Space   Pause    q / Esc / Ctrl-C   Quit\n\n\
        Use --policy to pick a spawn variant (random rain, a single trickle, or a \
        pre-filled field that only drains) and --theme to load a btop-style theme."
)]
pub struct Args {
    /// Ticks per cycle during which new sand is injected on the top row. Default: field height.
    #[arg(short = 's', long, value_name = "N")]
    pub spawn_frames: Option<u32>,

    /// Idle ticks between the pile settling and clearing starting. Default: height / 4.
    #[arg(short = 'w', long, value_name = "N")]
    pub wait_frames: Option<u32>,

    /// Milliseconds per simulation tick.
    #[arg(long, default_value = "25", value_name = "MS")]
    pub tick_ms: u64,

    /// Spawn policy: random (rain, 1-in-N per cell), trickle (single grain at the
    /// top centre), or none (field starts full and only drains).
    #[arg(short, long, default_value = "random")]
    pub policy: PolicyKind,

    /// In policy 'random': each top-row cell spawns with probability 1-in-N.
    #[arg(long, default_value = "4", value_name = "N")]
    pub spawn_chance: u32,

    /// RNG seed for reproducible runs. Random when not set.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Path to theme file (btop-style theme[key]="value"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<std::path::PathBuf>,

    /// Field width in cells. Default: terminal columns / 2 (cells are double-wide).
    #[arg(long, value_name = "COLS")]
    pub width: Option<u32>,

    /// Field height in cells. Default: terminal rows.
    #[arg(long, value_name = "ROWS")]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PolicyKind {
    #[default]
    Random,
    Trickle,
    #[value(alias = "prefilled")]
    None,
}
