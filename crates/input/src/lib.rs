//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`] tokens. The
//! session queues these and applies one per tick, so no key repeat handling is
//! needed here.

pub mod map;

pub use tetris_2048_types as types;

pub use map::{handle_key_event, should_quit};
