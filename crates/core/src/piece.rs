//! Piece module - tetromino shapes, movement and rotation
//!
//! A piece is a square local matrix (2x2, 3x3 or 4x4) of optional tiles plus an
//! anchor: the grid position of the matrix's bottom-left cell. Matrix row 0 is
//! the top row, so local cell `(row, col)` sits at
//! `(anchor.x + col, anchor.y + (n - 1 - row))` on the grid.
//!
//! Rotation legality is computed analytically from the current matrix; only a
//! legal rotation touches the live matrix, and it moves tiles rather than
//! copying them.

use arrayvec::ArrayVec;

use crate::grid::Grid;
use crate::rng::SimpleRng;
use crate::tile::Tile;
use crate::types::{
    MoveDirection, Position, RotateDirection, ShapeKind, MAX_PIECE_SIZE, PIECE_TILE_COUNT,
};

/// Fixed-size local matrix. Only the top-left `n x n` block is used.
pub type TileMatrix = [[Option<Tile>; MAX_PIECE_SIZE]; MAX_PIECE_SIZE];

/// Occupied local cells `(col, row)` of each kind in its spawn orientation.
pub fn spawn_cells(kind: ShapeKind) -> [(usize, usize); PIECE_TILE_COUNT] {
    match kind {
        // Vertical strip in the second column.
        ShapeKind::I => [(1, 0), (1, 1), (1, 2), (1, 3)],
        ShapeKind::O => [(0, 0), (1, 0), (0, 1), (1, 1)],
        ShapeKind::Z => [(0, 1), (1, 1), (1, 2), (2, 2)],
        ShapeKind::S => [(0, 2), (1, 1), (1, 2), (2, 1)],
        ShapeKind::J => [(2, 0), (2, 1), (2, 2), (1, 2)],
        ShapeKind::L => [(0, 0), (0, 1), (0, 2), (1, 2)],
        ShapeKind::T => [(0, 1), (1, 1), (2, 1), (1, 2)],
    }
}

/// Local `(row, col)` a cell lands on after one 90° rotation of an `n x n` matrix.
#[inline]
pub fn rotated_local(row: usize, col: usize, n: usize, dir: RotateDirection) -> (usize, usize) {
    match dir {
        RotateDirection::Clockwise => (col, n - 1 - row),
        RotateDirection::CounterClockwise => (n - 1 - col, row),
    }
}

/// Absolute position and value of one of a piece's tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceCell {
    pub position: Position,
    pub value: u32,
}

/// The trimmed tile block handed to the grid at lock time.
///
/// Row 0 is the top row of the block, like the piece matrix it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedTiles {
    rows: usize,
    cols: usize,
    tiles: TileMatrix,
}

impl BoundedTiles {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Tile> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.tiles[row][col].as_ref()
    }

    /// Move a tile out of the block.
    pub fn take(&mut self, row: usize, col: usize) -> Option<Tile> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.tiles[row][col].take()
    }

    pub fn occupied_count(&self) -> usize {
        self.tiles
            .iter()
            .flat_map(|r| r.iter())
            .filter(|t| t.is_some())
            .count()
    }
}

/// Active falling piece
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    kind: ShapeKind,
    size: usize,
    tiles: TileMatrix,
    anchor: Position,
}

impl Piece {
    /// Create a piece with fresh random tiles, positioned at column `x` with its
    /// lowest occupied row on the top row of a grid of `grid_height` rows.
    pub fn spawn(kind: ShapeKind, x: i32, grid_height: usize, rng: &mut SimpleRng) -> Self {
        let mut tiles = TileMatrix::default();
        for (col, row) in spawn_cells(kind) {
            tiles[row][col] = Some(Tile::random(rng));
        }
        let mut piece = Self {
            kind,
            size: kind.matrix_size(),
            tiles,
            anchor: Position::new(x, 0),
        };
        piece.respawn(x, grid_height);
        piece
    }

    /// Create a piece with explicit tile values at an explicit anchor.
    ///
    /// Values are assigned to the spawn cells in [`spawn_cells`] order.
    /// Returns `None` if any value is not a valid tile value.
    pub fn with_values(
        kind: ShapeKind,
        anchor: Position,
        values: [u32; PIECE_TILE_COUNT],
    ) -> Option<Self> {
        let mut tiles = TileMatrix::default();
        for ((col, row), value) in spawn_cells(kind).into_iter().zip(values) {
            tiles[row][col] = Some(Tile::new(value)?);
        }
        Some(Self {
            kind,
            size: kind.matrix_size(),
            tiles,
            anchor,
        })
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Side length of the local matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn anchor(&self) -> Position {
        self.anchor
    }

    pub fn tile_at(&self, row: usize, col: usize) -> Option<&Tile> {
        if row >= self.size || col >= self.size {
            return None;
        }
        self.tiles[row][col].as_ref()
    }

    /// Place the piece back at the top of the grid, keeping its orientation.
    ///
    /// The lowest occupied row ends up on row `grid_height - 1`.
    pub fn respawn(&mut self, x: i32, grid_height: usize) {
        let n = self.size as i32;
        let lowest = self.lowest_occupied_row().unwrap_or(self.size - 1) as i32;
        self.anchor = Position::new(x, grid_height as i32 - n + lowest);
    }

    fn lowest_occupied_row(&self) -> Option<usize> {
        (0..self.size)
            .rev()
            .find(|&row| (0..self.size).any(|col| self.tiles[row][col].is_some()))
    }

    /// Local `(row, col)` of every occupied cell, row-major.
    fn occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.size;
        (0..n)
            .flat_map(move |row| (0..n).map(move |col| (row, col)))
            .filter(move |&(row, col)| self.tiles[row][col].is_some())
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied().count()
    }

    /// Grid position of local cell `(row, col)` in the current orientation.
    #[inline]
    pub fn cell_position(&self, row: usize, col: usize) -> Position {
        let n = self.size as i32;
        Position::new(
            self.anchor.x + col as i32,
            self.anchor.y + (n - 1 - row as i32),
        )
    }

    /// Grid position local cell `(row, col)` would occupy after rotating.
    pub fn rotated_cell_position(&self, row: usize, col: usize, dir: RotateDirection) -> Position {
        let (r, c) = rotated_local(row, col, self.size, dir);
        self.cell_position(r, c)
    }

    /// Absolute positions and values of all tiles.
    pub fn cells(&self) -> ArrayVec<PieceCell, PIECE_TILE_COUNT> {
        let mut out = ArrayVec::new();
        for (row, col) in self.occupied() {
            if let Some(tile) = &self.tiles[row][col] {
                let _ = out.try_push(PieceCell {
                    position: self.cell_position(row, col),
                    value: tile.value(),
                });
            }
        }
        out
    }

    /// Whether any tile currently sits on an occupied grid cell.
    pub fn overlaps(&self, grid: &Grid) -> bool {
        self.occupied().any(|(row, col)| {
            let p = self.cell_position(row, col);
            grid.is_occupied(p.y, p.x)
        })
    }

    /// Check whether a one-cell move in `dir` is legal.
    ///
    /// Horizontal moves look at the extreme occupied cell of each matrix row,
    /// downward moves at the lowest occupied cell of each matrix column.
    /// Cells above the grid are only constrained by the side walls.
    pub fn can_be_moved(&self, dir: MoveDirection, grid: &Grid) -> bool {
        let n = self.size;
        match dir {
            MoveDirection::Left => (0..n).all(|row| {
                match (0..n).find(|&col| self.tiles[row][col].is_some()) {
                    Some(col) => {
                        let p = self.cell_position(row, col);
                        p.x > 0 && !grid.is_occupied(p.y, p.x - 1)
                    }
                    None => true,
                }
            }),
            MoveDirection::Right => {
                let right_wall = grid.width() as i32 - 1;
                (0..n).all(|row| {
                    match (0..n).rev().find(|&col| self.tiles[row][col].is_some()) {
                        Some(col) => {
                            let p = self.cell_position(row, col);
                            p.x < right_wall && !grid.is_occupied(p.y, p.x + 1)
                        }
                        None => true,
                    }
                })
            }
            MoveDirection::Down => (0..n).all(|col| {
                match (0..n).rev().find(|&row| self.tiles[row][col].is_some()) {
                    Some(row) => {
                        let p = self.cell_position(row, col);
                        p.y > 0 && !grid.is_occupied(p.y - 1, p.x)
                    }
                    None => true,
                }
            }),
        }
    }

    /// Move one cell in `dir` if legal. Returns whether the piece moved.
    pub fn move_by(&mut self, dir: MoveDirection, grid: &Grid) -> bool {
        if !self.can_be_moved(dir, grid) {
            return false;
        }
        let (dx, dy) = dir.delta();
        self.anchor = self.anchor.offset(dx, dy);
        true
    }

    /// Check whether a 90° rotation in `dir` is legal.
    ///
    /// Every rotated cell must stay within `[0, width)` horizontally, at or
    /// above the floor, and off occupied grid cells. Cells above the grid are
    /// allowed.
    pub fn can_rotate(&self, dir: RotateDirection, grid: &Grid) -> bool {
        let width = grid.width() as i32;
        self.occupied().all(|(row, col)| {
            let p = self.rotated_cell_position(row, col, dir);
            p.x >= 0 && p.x < width && p.y >= 0 && !grid.is_occupied(p.y, p.x)
        })
    }

    /// Rotate 90° in `dir` if legal. Returns whether the piece rotated.
    pub fn rotate(&mut self, dir: RotateDirection, grid: &Grid) -> bool {
        if !self.can_rotate(dir, grid) {
            return false;
        }
        let n = self.size;
        let mut rotated = TileMatrix::default();
        for row in 0..n {
            for col in 0..n {
                if let Some(tile) = self.tiles[row][col].take() {
                    let (r, c) = rotated_local(row, col, n, dir);
                    rotated[r][c] = Some(tile);
                }
            }
        }
        self.tiles = rotated;
        true
    }

    /// Trim empty border rows/columns and hand the tiles over for locking.
    ///
    /// Returns the trimmed block and the grid position of its bottom-left cell.
    pub fn into_min_bounded_tiles(mut self) -> (BoundedTiles, Position) {
        let n = self.size;
        let (mut min_row, mut max_row, mut min_col, mut max_col) = (n - 1, 0, n - 1, 0);
        for (row, col) in self.occupied() {
            min_row = min_row.min(row);
            max_row = max_row.max(row);
            min_col = min_col.min(col);
            max_col = max_col.max(col);
        }

        let rows = max_row - min_row + 1;
        let cols = max_col - min_col + 1;
        let mut tiles = TileMatrix::default();
        for row in min_row..=max_row {
            for col in min_col..=max_col {
                tiles[row - min_row][col - min_col] = self.tiles[row][col].take();
            }
        }

        let blc = self
            .anchor
            .offset(min_col as i32, (n - 1 - max_row) as i32);
        (BoundedTiles { rows, cols, tiles }, blc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn grid() -> Grid {
        Grid::new(&GameConfig::new(12, 18, 250).unwrap())
    }

    fn positions(piece: &Piece) -> Vec<Position> {
        let mut v: Vec<_> = piece.cells().iter().map(|c| c.position).collect();
        v.sort_by_key(|p| (p.x, p.y));
        v
    }

    #[test]
    fn spawn_puts_lowest_row_on_top_grid_row() {
        let mut rng = SimpleRng::new(1);
        for kind in ShapeKind::ALL {
            let piece = Piece::spawn(kind, 0, 18, &mut rng);
            assert_eq!(piece.anchor().y, 17, "{kind:?}");
            let lowest = piece.cells().iter().map(|c| c.position.y).min().unwrap();
            assert_eq!(lowest, 17, "{kind:?}");
            assert_eq!(piece.occupied_count(), 4);
        }
    }

    #[test]
    fn cell_position_maps_top_row_highest() {
        let piece = Piece::with_values(ShapeKind::O, Position::new(3, 5), [2, 2, 2, 2]).unwrap();
        assert_eq!(piece.cell_position(0, 0), Position::new(3, 6));
        assert_eq!(piece.cell_position(1, 0), Position::new(3, 5));
        assert_eq!(piece.cell_position(1, 1), Position::new(4, 5));
    }

    #[test]
    fn rotated_positions_match_committed_rotation() {
        let g = grid();
        let mut piece =
            Piece::with_values(ShapeKind::T, Position::new(4, 4), [2, 4, 2, 4]).unwrap();
        let mut predicted: Vec<_> = piece
            .occupied()
            .map(|(r, c)| piece.rotated_cell_position(r, c, RotateDirection::Clockwise))
            .collect();
        predicted.sort_by_key(|p| (p.x, p.y));

        assert!(piece.rotate(RotateDirection::Clockwise, &g));
        assert_eq!(positions(&piece), predicted);
    }

    #[test]
    fn cw_then_ccw_is_identity() {
        let g = grid();
        let original =
            Piece::with_values(ShapeKind::L, Position::new(4, 4), [2, 4, 8, 16]).unwrap();
        let mut piece = original.clone();
        assert!(piece.rotate(RotateDirection::Clockwise, &g));
        assert!(piece.rotate(RotateDirection::CounterClockwise, &g));
        assert_eq!(piece, original);
    }

    #[test]
    fn min_bounded_tiles_trims_i_piece() {
        let piece = Piece::with_values(ShapeKind::I, Position::new(2, 3), [2, 4, 8, 16]).unwrap();
        let (tiles, blc) = piece.into_min_bounded_tiles();
        assert_eq!((tiles.rows(), tiles.cols()), (4, 1));
        assert_eq!(blc, Position::new(3, 3));
        assert_eq!(tiles.get(0, 0).map(Tile::value), Some(2));
        assert_eq!(tiles.get(3, 0).map(Tile::value), Some(16));
        assert_eq!(tiles.occupied_count(), 4);
    }

    #[test]
    fn min_bounded_tiles_offsets_by_empty_bottom_rows() {
        let g = grid();
        // I rotated clockwise lies on local row 1 of the 4x4 matrix.
        let mut piece =
            Piece::with_values(ShapeKind::I, Position::new(2, 3), [2, 2, 2, 2]).unwrap();
        assert!(piece.rotate(RotateDirection::Clockwise, &g));
        let expected_y = piece.cells()[0].position.y;
        let (tiles, blc) = piece.into_min_bounded_tiles();
        assert_eq!((tiles.rows(), tiles.cols()), (1, 4));
        assert_eq!(blc, Position::new(2, expected_y));
    }

    #[test]
    fn with_values_rejects_invalid_tiles() {
        assert!(Piece::with_values(ShapeKind::O, Position::default(), [2, 3, 2, 2]).is_none());
    }
}
