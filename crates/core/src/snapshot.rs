use arrayvec::ArrayVec;

use crate::piece::{Piece, PieceCell};
use crate::types::{GameOutcome, ShapeKind, PIECE_TILE_COUNT};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: ShapeKind,
    pub cells: ArrayVec<PieceCell, PIECE_TILE_COUNT>,
}

impl From<&Piece> for ActiveSnapshot {
    fn from(value: &Piece) -> Self {
        Self {
            kind: value.kind(),
            cells: value.cells(),
        }
    }
}

impl ActiveSnapshot {
    /// Value of the active tile at `(row, col)`, if any.
    pub fn value_at(&self, row: i32, col: i32) -> Option<u32> {
        self.cells
            .iter()
            .find(|c| c.position.x == col && c.position.y == row)
            .map(|c| c.value)
    }
}

/// Render-ready copy of a session. `cells` is row-major from the floor with 0
/// for empty cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<u32>,
    pub active: Option<ActiveSnapshot>,
    pub next: Option<ShapeKind>,
    pub held: Option<ShapeKind>,
    pub can_hold: bool,
    pub score: u32,
    pub paused: bool,
    pub game_over: bool,
    pub outcome: Option<GameOutcome>,
    pub episode_id: u32,
    pub seed: u32,
    pub pieces_locked: u32,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.width = 0;
        self.height = 0;
        self.cells.clear();
        self.active = None;
        self.next = None;
        self.held = None;
        self.can_hold = true;
        self.score = 0;
        self.paused = false;
        self.game_over = false;
        self.outcome = None;
        self.episode_id = 0;
        self.seed = 0;
        self.pieces_locked = 0;
    }

    /// Locked tile value at `(row, col)`; 0 for empty or out-of-bounds cells.
    pub fn value_at(&self, row: i32, col: i32) -> u32 {
        if row < 0 || col < 0 || row as usize >= self.height || col as usize >= self.width {
            return 0;
        }
        self.cells
            .get(row as usize * self.width + col as usize)
            .copied()
            .unwrap_or(0)
    }

    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            cells: Vec::new(),
            active: None,
            next: None,
            held: None,
            can_hold: true,
            score: 0,
            paused: false,
            game_over: false,
            outcome: None,
            episode_id: 0,
            seed: 0,
            pieces_locked: 0,
        }
    }
}
