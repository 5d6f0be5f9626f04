//! Core game logic - pure, deterministic, and testable
//!
//! A falling-block game where every block carries a 2048-style number. This
//! crate holds the rules and the simulation and has no dependency on the
//! terminal or on wall-clock time: a caller drives it by queueing commands and
//! calling [`Session::tick`] at a fixed interval.
//!
//! # Module Structure
//!
//! - [`config`]: validated grid size, tick interval and seed
//! - [`grid`]: the board, score, row clearing, merging and flying-tile removal
//! - [`piece`]: tetromino shapes, movement, analytic rotation, locking hand-off
//! - [`rng`]: deterministic LCG behind every random decision
//! - [`session`]: piece spawner, command queue, hold, pause, restart and the tick
//! - [`snapshot`]: render-ready copies of the session state
//! - [`tile`]: numbered tiles and the merge rule
//!
//! # Game Rules
//!
//! - Pieces spawn at a random column with their lowest row on the top grid row,
//!   each tile randomly a 2 or a 4
//! - Once per tick the piece falls one row; when it cannot, it locks
//! - After a lock, full rows are cleared, equal vertically adjacent tiles merge
//!   into the lower one, and tile groups no longer connected to the floor are
//!   removed; every removed or merged value is added to the score
//! - Score 2048 wins; a tile landing above the grid or a blocked spawn loses
//!
//! # Example
//!
//! ```
//! use tetris_2048_core::{GameConfig, Session};
//! use tetris_2048_types::GameAction;
//!
//! let mut session = Session::new(GameConfig::default().with_seed(12345));
//!
//! session.enqueue(GameAction::MoveRight);
//! session.enqueue(GameAction::HardDrop);
//! session.tick();
//! session.tick();
//!
//! assert_eq!(session.pieces_locked(), 1);
//! ```

pub mod config;
pub mod grid;
pub mod piece;
pub mod rng;
pub mod session;
pub mod snapshot;
pub mod tile;

pub use tetris_2048_types as types;

// Re-export commonly used types for convenience
pub use config::{ConfigError, GameConfig};
pub use grid::{Grid, ResolveReport};
pub use piece::{BoundedTiles, Piece, PieceCell};
pub use rng::SimpleRng;
pub use session::{LockReport, PieceFactory, Session, TickReport};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
pub use tile::Tile;
