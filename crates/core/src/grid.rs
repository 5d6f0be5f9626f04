//! Grid module - the persistent board
//!
//! The grid is a `width x height` matrix of optional tiles stored as a flat
//! row-major vector. Row 0 is the floor. Besides occupancy it owns the score
//! and the game-over flag, and runs the post-lock passes: row clearing, merge
//! propagation and removal of unsupported ("flying") tile groups.

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::piece::BoundedTiles;
use crate::tile::Tile;
use crate::types::{GameOutcome, Position, WIN_SCORE};

/// What one [`Grid::resolve`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolveReport {
    pub rows_cleared: u32,
    pub merges: u32,
    pub flying_removed: u32,
    pub score_gained: u32,
}

impl ResolveReport {
    pub fn is_empty(&self) -> bool {
        self.rows_cleared == 0 && self.merges == 0 && self.flying_removed == 0
    }
}

/// The game board
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    /// Flat array of cells, row-major order (row * width + col), row 0 at the floor
    cells: Vec<Option<Tile>>,
    score: u32,
    game_over: bool,
}

impl Grid {
    /// Create an empty grid with the configured dimensions.
    pub fn new(config: &GameConfig) -> Self {
        let (width, height) = (config.width(), config.height());
        Self {
            width,
            height,
            cells: vec![None; width * height],
            score: 0,
            game_over: false,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    /// `Some` once the game is over; a win iff the score reached 2048.
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.game_over.then(|| GameOutcome::from_score(self.score))
    }

    pub(crate) fn set_game_over(&mut self) {
        self.game_over = true;
    }

    /// Calculate flat index from (row, col); None when out of bounds
    #[inline(always)]
    fn index(&self, row: i32, col: i32) -> Option<usize> {
        if !self.is_inside(row, col) {
            return None;
        }
        Some(row as usize * self.width + col as usize)
    }

    #[inline(always)]
    fn slot(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    /// Strict bounds check.
    pub fn is_inside(&self, row: i32, col: i32) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.height && (col as usize) < self.width
    }

    /// Whether a tile sits at `(row, col)`.
    ///
    /// Out-of-bounds coordinates read as open space, which is what lets pieces
    /// hang above the visible grid while they enter it.
    pub fn is_occupied(&self, row: i32, col: i32) -> bool {
        self.index(row, col)
            .map_or(false, |idx| self.cells[idx].is_some())
    }

    pub fn tile(&self, row: i32, col: i32) -> Option<&Tile> {
        self.index(row, col).and_then(|idx| self.cells[idx].as_ref())
    }

    /// Value at `(row, col)`, or None for empty/out-of-bounds cells.
    pub fn value(&self, row: i32, col: i32) -> Option<u32> {
        self.tile(row, col).map(Tile::value)
    }

    /// Replace the contents of a cell. Returns false if out of bounds.
    pub fn set_tile(&mut self, row: i32, col: i32, tile: Option<Tile>) -> bool {
        match self.index(row, col) {
            Some(idx) => {
                self.cells[idx] = tile;
                true
            }
            None => false,
        }
    }

    /// Check if a row has no empty cells
    pub fn row_is_full(&self, row: usize) -> bool {
        if row >= self.height {
            return false;
        }
        let start = row * self.width;
        self.cells[start..start + self.width]
            .iter()
            .all(|cell| cell.is_some())
    }

    pub fn tile_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Cell values in row-major order from the floor, 0 for empty cells.
    pub fn values(&self) -> impl Iterator<Item = u32> + '_ {
        self.cells
            .iter()
            .map(|cell| cell.as_ref().map_or(0, Tile::value))
    }

    fn credit(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        if self.score >= WIN_SCORE {
            self.game_over = true;
        }
    }

    /// Lock a landed piece's tiles into the grid.
    ///
    /// `blc` is the grid position of the bottom-left cell of `tiles`. Tiles are
    /// placed column by column; the first tile that falls outside the grid ends
    /// the game and stops placement. Returns the game-over flag.
    ///
    /// The target cells must be empty; a landed piece never overlaps the grid.
    pub fn lock(&mut self, mut tiles: BoundedTiles, blc: Position) -> bool {
        let (rows, cols) = (tiles.rows(), tiles.cols());
        for col in 0..cols {
            for row in 0..rows {
                let Some(tile) = tiles.take(row, col) else {
                    continue;
                };
                let x = blc.x + col as i32;
                let y = blc.y + (rows - 1 - row) as i32;
                match self.index(y, x) {
                    Some(idx) => {
                        debug_assert!(
                            self.cells[idx].is_none(),
                            "lock onto occupied cell ({y}, {x})"
                        );
                        self.cells[idx] = Some(tile);
                    }
                    None => {
                        self.game_over = true;
                        return self.game_over;
                    }
                }
            }
        }
        self.game_over
    }

    /// Clear every full row, crediting its tile values.
    ///
    /// Rows are processed bottom to top; rows above a cleared row shift down by
    /// one and the top row becomes empty. Returns the number of rows cleared.
    pub fn remove_full_rows_and_shift(&mut self) -> u32 {
        let width = self.width;
        let top = (self.height - 1) * width;
        let mut cleared = 0;
        let mut row = 0;
        while row < self.height {
            if !self.row_is_full(row) {
                row += 1;
                continue;
            }

            let start = row * width;
            let points: u32 = self.cells[start..start + width]
                .iter_mut()
                .filter_map(Option::take)
                .map(|t| t.value())
                .sum();
            // Cleared row moves to the top; everything above drops one row.
            self.cells[start..].rotate_left(width);
            for cell in &mut self.cells[top..] {
                *cell = None;
            }
            self.credit(points);
            cleared += 1;
            // Re-check the same index: the row above has moved into it.
        }
        cleared
    }

    /// Find the lowest vertically adjacent pair that can merge.
    fn find_merge_pair(&self) -> Option<(usize, usize)> {
        for row in 0..self.height.saturating_sub(1) {
            for col in 0..self.width {
                let lower = &self.cells[self.slot(row, col)];
                let upper = &self.cells[self.slot(row + 1, col)];
                if let (Some(lower), Some(upper)) = (lower, upper) {
                    if lower.can_merge(upper) {
                        return Some((row, col));
                    }
                }
            }
        }
        None
    }

    /// Shift every tile in `col` from `from_row` upwards down by one.
    fn collapse_column(&mut self, from_row: usize, col: usize) {
        for row in from_row..self.height - 1 {
            let above = self.slot(row + 1, col);
            let here = self.slot(row, col);
            self.cells[here] = self.cells[above].take();
        }
    }

    /// Merge equal vertically adjacent tiles until none are left.
    ///
    /// The lower tile doubles, the upper one is removed, the doubled value is
    /// credited, and the rest of the column above drops by one. Pairs whose
    /// merge would exceed 2048 are left alone. Returns the number of merges.
    pub fn merge_tiles(&mut self) -> u32 {
        let mut merges = 0;
        while let Some((row, col)) = self.find_merge_pair() {
            let upper_slot = self.slot(row + 1, col);
            let lower_slot = self.slot(row, col);
            let Some(upper) = self.cells[upper_slot].take() else {
                break;
            };
            let gained = match self.cells[lower_slot].as_mut() {
                Some(lower) => lower.merge(&upper),
                None => 0,
            };
            if self.cells[lower_slot].as_ref().is_some_and(Tile::is_max) {
                self.game_over = true;
            }
            self.collapse_column(row + 1, col);
            self.credit(gained);
            merges += 1;
        }
        merges
    }

    fn neighbors(&self, idx: usize) -> ArrayVec<usize, 4> {
        let (row, col) = (idx / self.width, idx % self.width);
        let mut out = ArrayVec::new();
        if row > 0 {
            out.push(idx - self.width);
        }
        if row + 1 < self.height {
            out.push(idx + self.width);
        }
        if col > 0 {
            out.push(idx - 1);
        }
        if col + 1 < self.width {
            out.push(idx + 1);
        }
        out
    }

    /// Remove every 4-connected tile group that does not touch the floor.
    ///
    /// Groups reachable from row 0 are marked with an explicit stack; anything
    /// left unmarked is unsupported and removed, its values credited. Returns
    /// the number of tiles removed.
    pub fn remove_flying_tiles(&mut self) -> u32 {
        let mut supported = vec![false; self.cells.len()];
        let mut stack: Vec<usize> = (0..self.width)
            .filter(|&col| self.cells[col].is_some())
            .collect();
        for &idx in &stack {
            supported[idx] = true;
        }

        while let Some(idx) = stack.pop() {
            for next in self.neighbors(idx) {
                if !supported[next] && self.cells[next].is_some() {
                    supported[next] = true;
                    stack.push(next);
                }
            }
        }

        let mut removed = 0;
        let mut points = 0u32;
        for (cell, supported) in self.cells.iter_mut().zip(supported) {
            if supported {
                continue;
            }
            if let Some(tile) = cell.take() {
                points = points.saturating_add(tile.value());
                removed += 1;
            }
        }
        if removed > 0 {
            self.credit(points);
        }
        removed
    }

    /// Run the post-lock passes until the grid is stable.
    ///
    /// A pass is row clearing, then merging, then flying-tile removal. Merges
    /// can complete rows and clears can line up new pairs, so passes repeat
    /// until one changes nothing.
    pub fn resolve(&mut self) -> ResolveReport {
        let start_score = self.score;
        let mut report = ResolveReport::default();
        loop {
            let pass = ResolveReport {
                rows_cleared: self.remove_full_rows_and_shift(),
                merges: self.merge_tiles(),
                flying_removed: self.remove_flying_tiles(),
                score_gained: 0,
            };
            if pass.is_empty() {
                break;
            }
            report.rows_cleared += pass.rows_cleared;
            report.merges += pass.merges;
            report.flying_removed += pass.flying_removed;
        }
        report.score_gained = self.score - start_score;
        report
    }
}
