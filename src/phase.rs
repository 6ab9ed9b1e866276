//! Phase machine: spawn sand, let it settle, pause, sweep it away, repeat.

use crate::grid::{GridError, SandGrid};
use rand::Rng;

/// How the top row gets new sand while spawning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnPolicy {
    /// Each top-row cell gets a grain with probability `1/chance`.
    Random { chance: u32 },
    /// A single grain at the top centre each spawn tick.
    Trickle,
    /// No injection; pairs with a pre-filled grid that drains once per cycle.
    None,
}

impl SpawnPolicy {
    /// Fill `row` (one value per column) with this tick's spawn pattern.
    fn fill(&self, row: &mut [bool], rng: &mut impl Rng) {
        match *self {
            Self::Random { chance } => {
                for cell in row.iter_mut() {
                    *cell = rng.gen_range(0..chance.max(1)) == 0;
                }
            }
            Self::Trickle => {
                row.fill(false);
                row[row.len() / 2] = true;
            }
            // Never reached from the controller; kept total for direct use.
            Self::None => row.fill(false),
        }
    }
}

/// Where the cycle currently is. Spawning also covers the tail where the
/// budget is spent but grains are still falling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Spawning { remaining: u32 },
    Waiting { remaining: u32 },
    Clearing,
}

/// Owns the grid and drives one phase transition per external tick.
#[derive(Debug)]
pub struct PhaseController {
    grid: SandGrid,
    phase: Phase,
    policy: SpawnPolicy,
    spawn_budget: u32,
    wait_frames: u32,
    row_buf: Vec<bool>,
}

impl PhaseController {
    pub fn new(grid: SandGrid, policy: SpawnPolicy, spawn_budget: u32, wait_frames: u32) -> Self {
        let row_buf = vec![false; grid.width() as usize];
        Self {
            grid,
            phase: Phase::Spawning {
                remaining: spawn_budget,
            },
            policy,
            spawn_budget,
            wait_frames,
            row_buf,
        }
    }

    /// Read-only view for the renderer; the controller keeps the only
    /// mutable handle.
    pub fn grid(&self) -> &SandGrid {
        &self.grid
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Advance one tick. The whole grid mutation for the tick completes
    /// here, before the caller hands the grid to the renderer.
    pub fn tick(&mut self, rng: &mut impl Rng) -> Result<(), GridError> {
        match self.phase {
            Phase::Spawning { remaining } => {
                if remaining > 0 {
                    if self.policy != SpawnPolicy::None {
                        self.policy.fill(&mut self.row_buf, rng);
                        self.grid.fill_row(0, &self.row_buf);
                    }
                    self.phase = Phase::Spawning {
                        remaining: remaining - 1,
                    };
                }
                let changed = self.grid.step()?;
                if !changed {
                    self.phase = if self.wait_frames > 0 {
                        Phase::Waiting {
                            remaining: self.wait_frames,
                        }
                    } else {
                        Phase::Clearing
                    };
                }
            }
            Phase::Waiting { remaining } => {
                // Idle tick; the settled pile stays on screen.
                self.phase = if remaining > 1 {
                    Phase::Waiting {
                        remaining: remaining - 1,
                    }
                } else {
                    Phase::Clearing
                };
            }
            Phase::Clearing => {
                let changed = self.grid.sweep()?;
                if !changed {
                    self.phase = Phase::Spawning {
                        remaining: self.spawn_budget,
                    };
                }
            }
        }
        Ok(())
    }
}
