//! Sand grid: dense cell buffer, gravity step, clearing sweep.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("grid dimensions must be non-zero (got {width}x{height})")]
    ZeroDimension { width: u32, height: u32 },
    #[error("failed to allocate grid buffer of {cells} cells")]
    Alloc { cells: usize },
}

/// Grid of sand cells. y=0 is the top row; cells are stored row-major,
/// index `y * width + x`. Every index holds a defined occupied/empty value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandGrid {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl SandGrid {
    /// Create a grid filled with `default`. Zero dimensions are rejected,
    /// never clamped; allocation failure surfaces as `GridError::Alloc`.
    pub fn new(width: u32, height: u32, default: bool) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::ZeroDimension { width, height });
        }
        let len = width as usize * height as usize;
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|_| GridError::Alloc { cells: len })?;
        cells.resize(len, default);
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn idx(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height, "cell ({x},{y}) out of bounds");
        (y * self.width + x) as usize
    }

    /// Bounds are caller-guaranteed; checked only in debug builds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.cells[self.idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        let i = self.idx(x, y);
        self.cells[i] = value;
    }

    /// Copy of the cell buffer, for rendering and tests.
    pub fn snapshot(&self) -> Vec<bool> {
        self.cells.clone()
    }

    /// Bulk-set an entire row. `values` must be exactly `width` long.
    pub fn fill_row(&mut self, y: u32, values: &[bool]) {
        debug_assert_eq!(values.len(), self.width as usize);
        let start = self.idx(0, y);
        self.cells[start..start + self.width as usize].copy_from_slice(values);
    }

    /// Number of occupied cells.
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Scratch buffer seeded from the current cells. Allocated per call so a
    /// failed tick leaves the live buffer untouched.
    fn scratch(&self) -> Result<Vec<bool>, GridError> {
        let mut next = Vec::new();
        next.try_reserve_exact(self.cells.len())
            .map_err(|_| GridError::Alloc {
                cells: self.cells.len(),
            })?;
        next.extend_from_slice(&self.cells);
        Ok(next)
    }

    /// One gravity step. Each occupied cell tries to move straight down,
    /// then down-left, then down-right, in that fixed order. Occupancy is
    /// read from the prior frame, but move targets are checked against the
    /// mutating `next` buffer, so a cell that just landed blocks later cells
    /// in the same pass. Returns whether anything moved; `false` means the
    /// pile has settled.
    pub fn step(&mut self) -> Result<bool, GridError> {
        let mut next = self.scratch()?;
        let w = self.width as usize;
        let mut changed = false;

        for y in 0..self.height as usize - 1 {
            for x in 0..w {
                if !self.cells[y * w + x] {
                    continue;
                }
                let below = (y + 1) * w + x;
                if !next[below] {
                    next[y * w + x] = false;
                    next[below] = true;
                    changed = true;
                    continue;
                }
                if x > 0 && !next[below - 1] {
                    next[y * w + x] = false;
                    next[below - 1] = true;
                    changed = true;
                    continue;
                }
                if x < w - 1 && !next[below + 1] {
                    next[y * w + x] = false;
                    next[below + 1] = true;
                    changed = true;
                }
            }
        }

        self.cells = next;
        Ok(changed)
    }

    /// One clearing sweep: every row shifts down by exactly one, overwriting
    /// whatever was below; row 0 ends empty. Returns whether any occupied
    /// cell was copied. Content in row `y` leaves after `height - y` sweeps,
    /// so `height` sweeps drain any grid.
    pub fn sweep(&mut self) -> Result<bool, GridError> {
        let len = self.cells.len();
        let mut next = Vec::new();
        next.try_reserve_exact(len)
            .map_err(|_| GridError::Alloc { cells: len })?;
        next.resize(len, false);

        let w = self.width as usize;
        let mut changed = false;
        for y in 0..self.height as usize - 1 {
            for x in 0..w {
                let value = self.cells[y * w + x];
                next[(y + 1) * w + x] = value;
                if value {
                    changed = true;
                }
            }
        }

        self.cells = next;
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from_rows(rows: &[&[u8]]) -> SandGrid {
        let height = rows.len() as u32;
        let width = rows[0].len() as u32;
        let mut g = SandGrid::new(width, height, false).unwrap();
        for (y, row) in rows.iter().enumerate() {
            for (x, &c) in row.iter().enumerate() {
                g.set(x as u32, y as u32, c == b'#');
            }
        }
        g
    }

    fn rows_of(g: &SandGrid) -> Vec<String> {
        let snap = g.snapshot();
        (0..g.height())
            .map(|y| {
                (0..g.width())
                    .map(|x| {
                        if snap[(y * g.width() + x) as usize] {
                            '#'
                        } else {
                            '.'
                        }
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(
            SandGrid::new(0, 5, false),
            Err(GridError::ZeroDimension { .. })
        ));
        assert!(matches!(
            SandGrid::new(5, 0, false),
            Err(GridError::ZeroDimension { .. })
        ));
    }

    #[test]
    fn test_new_default_fill() {
        let g = SandGrid::new(3, 2, true).unwrap();
        assert_eq!(g.occupied(), 6);
        let g = SandGrid::new(3, 2, false).unwrap();
        assert_eq!(g.occupied(), 0);
    }

    #[test]
    fn test_fill_row_and_snapshot() {
        let mut g = SandGrid::new(4, 3, false).unwrap();
        g.fill_row(0, &[true, false, true, false]);
        assert_eq!(rows_of(&g), vec!["#.#.", "....", "...."]);
        assert_eq!(g.snapshot().len(), 12);
    }

    #[test]
    fn test_step_conserves_particle_count() {
        let mut g = grid_from_rows(&[b"#.##.", b".....", b"..#..", b".....", b"#####"]);
        let before = g.occupied();
        for _ in 0..10 {
            g.step().unwrap();
            assert_eq!(g.occupied(), before);
        }
    }

    #[test]
    fn test_single_particle_falls_straight_down() {
        // Both diagonals and straight down open: straight down wins.
        let mut g = grid_from_rows(&[b"...", b".#.", b"..."]);
        assert!(g.step().unwrap());
        assert_eq!(rows_of(&g), vec!["...", "...", ".#."]);
    }

    #[test]
    fn test_blocked_below_slides_down_left_first() {
        let mut g = grid_from_rows(&[b".#.", b".#.", b"###"]);
        assert!(g.step().unwrap());
        // Top particle blocked below, down-left open: it goes left.
        assert_eq!(rows_of(&g), vec!["...", "##.", "###"]);
    }

    #[test]
    fn test_left_wall_forces_down_right() {
        let mut g = grid_from_rows(&[b"#..", b"#..", b"#.."]);
        assert!(g.step().unwrap());
        // Both stacked particles are blocked below and have no left
        // neighbour column, so each shifts down-right in the same pass.
        assert_eq!(rows_of(&g), vec!["...", ".#.", "##."]);
    }

    #[test]
    fn test_bottom_row_is_terminal() {
        let mut g = grid_from_rows(&[b"...", b"...", b"#.#"]);
        assert!(!g.step().unwrap());
        assert_eq!(rows_of(&g), vec!["...", "...", "#.#"]);
    }

    #[test]
    fn test_packed_bottom_rows_are_settled() {
        let mut g = grid_from_rows(&[b"...", b"###", b"###"]);
        assert!(!g.step().unwrap());
    }

    #[test]
    fn test_moved_cell_blocks_later_cells_in_same_pass() {
        // The left particle drops into (0,1) first; the right particle's
        // down-left target is then already taken in the next buffer, so it
        // stays instead of overlapping.
        let mut g = grid_from_rows(&[b"##", b".#"]);
        assert!(g.step().unwrap());
        assert_eq!(rows_of(&g), vec![".#", "##"]);
        assert_eq!(g.occupied(), 3);
    }

    #[test]
    fn test_settles_within_height_steps() {
        let mut g = grid_from_rows(&[b"#####", b".....", b".....", b".....", b"....."]);
        let mut steps = 0;
        while g.step().unwrap() {
            steps += 1;
            assert!(steps <= 5, "did not settle within height steps");
        }
        assert_eq!(rows_of(&g)[4], "#####");
    }

    #[test]
    fn test_sweep_shifts_single_row_exactly() {
        let mut g = grid_from_rows(&[b".....", b"#.##.", b".....", b"....."]);
        assert!(g.sweep().unwrap());
        assert_eq!(rows_of(&g), vec![".....", ".....", "#.##.", "....."]);
    }

    #[test]
    fn test_sweep_overwrites_destination() {
        // Occupied row falls onto an empty row; empty row falls onto an
        // occupied one. Overwrite, not merge.
        let mut g = grid_from_rows(&[b"..", b"##", b"..", b"##"]);
        assert!(g.sweep().unwrap());
        assert_eq!(rows_of(&g), vec!["..", "..", "##", ".."]);
    }

    #[test]
    fn test_full_grid_drains_in_height_sweeps() {
        // Row 0 content needs the full `height` sweeps to scroll off; after
        // `height - 1` only the bottom row is left and the next sweep is the
        // first no-op.
        let mut g = SandGrid::new(4, 6, true).unwrap();
        for i in 0..5 {
            let changed = g.sweep().unwrap();
            assert!(changed, "sweep {i} should still be draining");
        }
        assert_eq!(g.occupied(), 4);
        assert!(!g.sweep().unwrap());
        assert_eq!(g.occupied(), 0);
    }

    #[test]
    fn test_sweep_drains_in_height_minus_one_when_top_row_empty() {
        let mut g = SandGrid::new(4, 6, true).unwrap();
        g.fill_row(0, &[false; 4]);
        for i in 0..4 {
            let changed = g.sweep().unwrap();
            assert!(changed, "sweep {i} should still be draining");
        }
        // The (height - 1)-th sweep is the first to report no change, and it
        // leaves the grid empty.
        assert!(!g.sweep().unwrap());
        assert_eq!(g.occupied(), 0);
    }
}
