//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (engine logic, terminal rendering, input mapping).
//!
//! # Coordinates
//!
//! Grid positions are `(x, y)` with `x` growing to the right and `y` growing
//! upwards. Row `y = 0` is the floor. Pieces may extend above the visible grid
//! (`y >= height`) while they are still entering it.
//!
//! # Configuration Ranges
//!
//! | Setting | Range | Default |
//! |---------|-------|---------|
//! | Grid width | 12..=24 | 18 |
//! | Grid height | 12..=24 | 21 |
//! | Tick interval (ms) | 50..=500 | 250 |
//!
//! # Examples
//!
//! ```
//! use tetris_2048_types::{GameAction, ShapeKind, MAX_TILE_VALUE};
//!
//! let kind = ShapeKind::from_str("t").unwrap();
//! assert_eq!(kind, ShapeKind::T);
//! assert_eq!(kind.matrix_size(), 3);
//!
//! let action = GameAction::from_str("hardDrop").unwrap();
//! assert_eq!(action, GameAction::HardDrop);
//!
//! assert_eq!(MAX_TILE_VALUE, 2048);
//! ```

/// Smallest supported grid width.
pub const GRID_WIDTH_MIN: usize = 12;

/// Largest supported grid width.
pub const GRID_WIDTH_MAX: usize = 24;

/// Smallest supported grid height.
pub const GRID_HEIGHT_MIN: usize = 12;

/// Largest supported grid height.
pub const GRID_HEIGHT_MAX: usize = 24;

/// Default grid width.
pub const DEFAULT_GRID_WIDTH: usize = 18;

/// Default grid height.
pub const DEFAULT_GRID_HEIGHT: usize = 21;

/// Fastest supported tick interval in milliseconds.
pub const TICK_MS_MIN: u32 = 50;

/// Slowest supported tick interval in milliseconds.
pub const TICK_MS_MAX: u32 = 500;

/// Default tick interval (one gravity step every 250ms).
pub const DEFAULT_TICK_MS: u32 = 250;

/// Highest value a tile can reach. Merges that would exceed it are no-ops.
pub const MAX_TILE_VALUE: u32 = 2048;

/// Score at which the session ends as a win.
pub const WIN_SCORE: u32 = 2048;

/// Values a freshly spawned tile can carry (picked uniformly).
pub const SPAWN_TILE_VALUES: [u32; 2] = [2, 4];

/// Number of tiles in every piece.
pub const PIECE_TILE_COUNT: usize = 4;

/// Largest local matrix side length (the I piece).
pub const MAX_PIECE_SIZE: usize = 4;

/// Capacity of the per-session command queue. Extra commands are dropped.
pub const COMMAND_QUEUE_CAPACITY: usize = 8;


/// A grid position. `y = 0` is the floor row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Return this position shifted by `(dx, dy)`.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// The seven tetromino shapes
///
/// Each shape lives in a square local matrix:
/// - **I**: 4x4, vertical strip in its spawn orientation
/// - **O**: 2x2 square
/// - **Z**, **S**, **J**, **L**, **T**: 3x3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    I,
    O,
    Z,
    S,
    J,
    L,
    T,
}

impl ShapeKind {
    /// All kinds, in a stable order (used by the spawner).
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::I,
        ShapeKind::O,
        ShapeKind::Z,
        ShapeKind::S,
        ShapeKind::J,
        ShapeKind::L,
        ShapeKind::T,
    ];

    /// Side length of the local matrix for this kind.
    pub fn matrix_size(&self) -> usize {
        match self {
            ShapeKind::I => 4,
            ShapeKind::O => 2,
            _ => 3,
        }
    }

    /// Parse shape kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_2048_types::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::from_str("i"), Some(ShapeKind::I));
    /// assert_eq!(ShapeKind::from_str("O"), Some(ShapeKind::O));
    /// assert_eq!(ShapeKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(ShapeKind::I),
            "o" => Some(ShapeKind::O),
            "z" => Some(ShapeKind::Z),
            "s" => Some(ShapeKind::S),
            "j" => Some(ShapeKind::J),
            "l" => Some(ShapeKind::L),
            "t" => Some(ShapeKind::T),
            _ => None,
        }
    }

    /// Uppercase single-letter name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::I => "I",
            ShapeKind::O => "O",
            ShapeKind::Z => "Z",
            ShapeKind::S => "S",
            ShapeKind::J => "J",
            ShapeKind::L => "L",
            ShapeKind::T => "T",
        }
    }
}

/// Direction of a one-cell translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Left,
    Right,
    Down,
}

impl MoveDirection {
    /// Anchor delta `(dx, dy)` for this direction.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            MoveDirection::Left => (-1, 0),
            MoveDirection::Right => (1, 0),
            MoveDirection::Down => (0, -1),
        }
    }
}

/// Direction of a 90° rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateDirection {
    Clockwise,
    CounterClockwise,
}

/// Commands the session consumes, already decoded from raw input.
///
/// At most one queued command is applied per tick, before the gravity step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Move piece one cell down
    SoftDrop,
    /// Soft drop repeatedly until blocked
    HardDrop,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
    /// Swap the current piece with the held one
    Hold,
    /// Toggle pause state
    Pause,
    /// Discard the grid and start over
    Restart,
    /// Leave the game
    Quit,
}

impl GameAction {
    /// Parse action from string (case-insensitive camelCase names)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_2048_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("ROTATECCW"), Some(GameAction::RotateCcw));
    /// assert_eq!(GameAction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "harddrop" => Some(GameAction::HardDrop),
            "rotatecw" => Some(GameAction::RotateCw),
            "rotateccw" => Some(GameAction::RotateCcw),
            "hold" => Some(GameAction::Hold),
            "pause" => Some(GameAction::Pause),
            "restart" => Some(GameAction::Restart),
            "quit" => Some(GameAction::Quit),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::RotateCw => "rotateCw",
            GameAction::RotateCcw => "rotateCcw",
            GameAction::Hold => "hold",
            GameAction::Pause => "pause",
            GameAction::Restart => "restart",
            GameAction::Quit => "quit",
        }
    }

    /// Session-level commands that still apply while play is paused.
    pub fn is_meta(&self) -> bool {
        matches!(
            self,
            GameAction::Pause | GameAction::Restart | GameAction::Quit
        )
    }
}

/// How a finished session ended.
///
/// The win/lose distinction is made on the final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Won,
    Lost,
}

impl GameOutcome {
    /// Classify a final score.
    ///
    /// ```
    /// use tetris_2048_types::GameOutcome;
    ///
    /// assert_eq!(GameOutcome::from_score(2048), GameOutcome::Won);
    /// assert_eq!(GameOutcome::from_score(2047), GameOutcome::Lost);
    /// ```
    pub fn from_score(score: u32) -> Self {
        if score >= WIN_SCORE {
            GameOutcome::Won
        } else {
            GameOutcome::Lost
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameOutcome::Won => "won",
            GameOutcome::Lost => "lost",
        }
    }
}
