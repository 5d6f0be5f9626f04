//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer: the board is drawn into a plain
//! framebuffer of styled cells, which is then diffed against the previous
//! frame and flushed through crossterm.
//!
//! - [`fb`]: framebuffer and style types
//! - [`game_view`]: pure snapshot-to-framebuffer mapping
//! - [`renderer`]: terminal setup/teardown and diff encoding

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tetris_2048_core as core;
pub use tetris_2048_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{tile_style, AnchorY, GameView, PanelInfo, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
