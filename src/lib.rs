//! Tetris 2048 (workspace facade crate).
//!
//! Re-exports the member crates under short names and adds the pieces only the
//! binary needs, such as best-score persistence.

pub mod best_score;

pub use tetris_2048_core as core;
pub use tetris_2048_input as input;
pub use tetris_2048_term as term;
pub use tetris_2048_types as types;
