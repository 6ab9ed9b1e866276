//! App: terminal init, main loop, tick pacing and key handling.

use crate::grid::SandGrid;
use crate::input::{Action, QuitToken, key_to_action};
use crate::phase::{PhaseController, SpawnPolicy};
use crate::theme::Theme;
use crate::{Args, PolicyKind, SimConfig};
use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};

pub struct App {
    config: SimConfig,
    theme: Theme,
    /// Field size overrides from --width/--height; otherwise terminal-derived.
    forced_width: Option<u32>,
    forced_height: Option<u32>,
    controller: PhaseController,
    extend_edge: bool,
    rng: StdRng,
    quit: QuitToken,
    paused: bool,
    tick_interval: Duration,
    last_tick: Instant,
}

impl App {
    pub fn new(args: &Args, config: SimConfig, theme: Theme) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        // Placeholder field; run() rebuilds at the real terminal size.
        let controller = build_controller(&config, 1, 1)?;
        let tick_interval = Duration::from_millis(config.tick_ms.max(1));
        Ok(Self {
            config,
            theme,
            forced_width: args.width,
            forced_height: args.height,
            controller,
            extend_edge: false,
            rng,
            quit: QuitToken::new(),
            paused: false,
            tick_interval,
            last_tick: Instant::now(),
        })
    }

    /// Rebuild grid and controller for the given terminal size. Discards the
    /// current pile; the cycle restarts with a full spawn budget.
    fn rebuild_field(&mut self, term_cols: u16, term_rows: u16) -> Result<()> {
        let (mut width, mut height, mut extend_edge) =
            crate::ui::field_dims_for_terminal(term_cols, term_rows);
        if let Some(w) = self.forced_width {
            width = w;
            extend_edge = false;
        }
        if let Some(h) = self.forced_height {
            height = h;
        }
        self.controller = build_controller(&self.config, width, height)?;
        self.extend_edge = extend_edge;
        Ok(())
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{
                EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
                size,
            },
        };

        let (term_cols, term_rows) = size().context("querying terminal size")?;

        enable_raw_mode()?;
        let stdout = std::io::stdout();
        execute!(std::io::stdout(), EnterAlternateScreen)?;
        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self
            .rebuild_field(term_cols, term_rows)
            .and_then(|()| self.run_loop(&mut terminal));

        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            // Quit is observed only here, at the tick boundary; a tick's grid
            // mutation is never interrupted mid-step.
            if self.quit.is_requested() {
                return Ok(());
            }

            terminal.draw(|f| {
                crate::ui::draw(
                    f,
                    self.controller.grid(),
                    &self.theme,
                    self.extend_edge,
                    self.paused,
                )
            })?;

            let timeout = self.tick_interval.saturating_sub(self.last_tick.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    match event::read()? {
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            match key_to_action(key) {
                                Action::Quit => self.quit.request(),
                                Action::Pause => self.paused = !self.paused,
                                Action::None => {}
                            }
                        }
                        Event::Resize(cols, rows) => {
                            self.rebuild_field(cols, rows)?;
                        }
                        _ => {}
                    }
                }
            }

            if !self.paused && self.last_tick.elapsed() >= self.tick_interval {
                self.last_tick = Instant::now();
                self.controller.tick(&mut self.rng)?;
            }
        }
    }
}

/// Grid + controller for a field of the given size, per the configured
/// policy. The 'none' policy starts from a fully occupied field.
fn build_controller(config: &SimConfig, width: u32, height: u32) -> Result<PhaseController> {
    let prefill = config.policy == PolicyKind::None;
    let grid = SandGrid::new(width, height, prefill).context("creating sand grid")?;
    let policy = match config.policy {
        PolicyKind::Random => SpawnPolicy::Random {
            chance: config.spawn_chance.max(1),
        },
        PolicyKind::Trickle => SpawnPolicy::Trickle,
        PolicyKind::None => SpawnPolicy::None,
    };
    let spawn_frames = config.spawn_frames.unwrap_or(height);
    let wait_frames = config.wait_frames.unwrap_or(height / 4);
    Ok(PhaseController::new(grid, policy, spawn_frames, wait_frames))
}
