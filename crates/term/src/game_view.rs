//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::GameSnapshot;
use crate::fb::{digit_count, CellStyle, FrameBuffer, Rgb};
use crate::types::{GameOutcome, ShapeKind};

const EMPTY_BG: Rgb = Rgb::new(206, 195, 181);
const EMPTY_FG: Rgb = Rgb::new(185, 172, 158);
const PANEL_FG: Rgb = Rgb::new(220, 220, 220);
const SCREEN_BG: Rgb = Rgb::new(0, 0, 0);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Extra numbers shown in the side panel that are not part of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelInfo {
    pub best_score: Option<u32>,
}

/// Board origin and frame size for one render.
#[derive(Debug, Clone, Copy)]
struct Layout {
    start_x: u16,
    start_y: u16,
    frame_w: u16,
    frame_h: u16,
    rows: u16,
}

/// Terminal renderer for the falling-tile board.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // Four columns fit "2048" in a single cell.
        Self {
            cell_w: 4,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        info: PanelInfo,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let cols = snap.width as u16;
        let rows = snap.height as u16;
        let frame_w = cols * self.cell_w + 2;
        let frame_h = rows * self.cell_h + 2;
        let layout = Layout {
            start_x: viewport.width.saturating_sub(frame_w) / 2,
            start_y: match self.anchor_y {
                AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
                AnchorY::Top => 0,
            },
            frame_w,
            frame_h,
            rows,
        };

        self.draw_border(fb, &layout, CellStyle::new(Rgb::new(200, 200, 200), SCREEN_BG));

        for row in 0..snap.height as i32 {
            for col in 0..snap.width as i32 {
                match snap.value_at(row, col) {
                    0 => self.draw_empty_cell(fb, &layout, row, col),
                    value => self.draw_tile(fb, &layout, row, col, value),
                }
            }
        }

        // Cells still above the top row are not drawn.
        if let Some(active) = &snap.active {
            for cell in &active.cells {
                let (row, col) = (cell.position.y, cell.position.x);
                if row < snap.height as i32 && col >= 0 && col < snap.width as i32 && row >= 0 {
                    self.draw_tile(fb, &layout, row, col, cell.value);
                }
            }
        }

        self.draw_side_panel(fb, snap, info, viewport, &layout);

        if snap.paused {
            self.draw_overlay_text(fb, &layout, "PAUSED");
        } else if let Some(outcome) = snap.outcome {
            let text = match outcome {
                GameOutcome::Won => "YOU WIN",
                GameOutcome::Lost => "GAME OVER",
            };
            self.draw_overlay_text(fb, &layout, text);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, info: PanelInfo, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, info, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, layout: &Layout, style: CellStyle) {
        let Layout {
            start_x: x,
            start_y: y,
            frame_w: w,
            frame_h: h,
            ..
        } = *layout;
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    /// Top-left screen position of grid cell `(row, col)`; row 0 is drawn last.
    fn cell_origin(&self, layout: &Layout, row: i32, col: i32) -> (u16, u16) {
        let screen_row = layout.rows - 1 - row as u16;
        (
            layout.start_x + 1 + col as u16 * self.cell_w,
            layout.start_y + 1 + screen_row * self.cell_h,
        )
    }

    fn draw_empty_cell(&self, fb: &mut FrameBuffer, layout: &Layout, row: i32, col: i32) {
        let (px, py) = self.cell_origin(layout, row, col);
        let style = CellStyle::new(EMPTY_FG, EMPTY_BG);
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ' ', style);
        fb.put_char(px + (self.cell_w - 1) / 2, py + (self.cell_h - 1) / 2, '·', style);
    }

    fn draw_tile(&self, fb: &mut FrameBuffer, layout: &Layout, row: i32, col: i32, value: u32) {
        let (px, py) = self.cell_origin(layout, row, col);
        let style = tile_style(value);
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ' ', style);

        let digits = digit_count(value);
        let tx = px + self.cell_w.saturating_sub(digits) / 2;
        let ty = py + (self.cell_h - 1) / 2;
        // Clip to the cell so wide values never bleed into a neighbour.
        fb.put_u32_clipped(tx, ty, value, self.cell_w, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        info: PanelInfo,
        viewport: Viewport,
        layout: &Layout,
    ) {
        let panel_x = layout
            .start_x
            .saturating_add(layout.frame_w)
            .saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 10 {
            return;
        }

        let label = CellStyle::new(PANEL_FG, SCREEN_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), SCREEN_BG);
        let dim = value.dim();

        let mut y = layout.start_y;
        fb.put_str(panel_x, y, "SCORE", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, snap.score, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "BEST", label);
        y = y.saturating_add(1);
        match info.best_score {
            Some(best) => fb.put_u32(panel_x, y, best.max(snap.score), value),
            None => fb.put_str(panel_x, y, "-", value),
        };
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        fb.put_str(panel_x, y, snap.next.as_ref().map(ShapeKind::as_str).unwrap_or("-"), value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "HOLD", label);
        y = y.saturating_add(1);
        let held_style = if snap.can_hold { value } else { dim };
        fb.put_str(panel_x, y, snap.held.as_ref().map(ShapeKind::as_str).unwrap_or("-"), held_style);
        y = y.saturating_add(2);

        for line in [
            "←→ move",
            "↓ soft drop",
            "space drop",
            "↑/d rotate",
            "a/z rotate",
            "c hold",
            "p/esc pause",
            "r restart",
            "q quit",
        ] {
            if y >= viewport.height {
                break;
            }
            fb.put_str(panel_x, y, line, dim);
            y = y.saturating_add(1);
        }
    }

    fn draw_overlay_text(&self, fb: &mut FrameBuffer, layout: &Layout, text: &str) {
        let mid_y = layout.start_y.saturating_add(layout.frame_h / 2);
        let text_w = text.chars().count() as u16;
        let x = layout
            .start_x
            .saturating_add(layout.frame_w.saturating_sub(text_w) / 2);
        let style = CellStyle::new(Rgb::new(255, 255, 255), SCREEN_BG).bold();
        fb.put_str(x, mid_y, text, style);
    }
}

/// Colors of a numbered tile.
pub fn tile_style(value: u32) -> CellStyle {
    let bg = match value {
        2 => Rgb::new(238, 228, 218),
        4 => Rgb::new(237, 224, 200),
        8 => Rgb::new(242, 177, 121),
        16 => Rgb::new(245, 149, 99),
        32 => Rgb::new(246, 124, 95),
        64 => Rgb::new(246, 94, 59),
        128 => Rgb::new(237, 207, 114),
        256 => Rgb::new(237, 204, 97),
        512 => Rgb::new(237, 200, 80),
        1024 => Rgb::new(237, 197, 63),
        _ => Rgb::new(237, 197, 46),
    };
    let fg = if value <= 4 {
        Rgb::new(138, 129, 120)
    } else {
        Rgb::new(255, 255, 255)
    };
    CellStyle::new(fg, bg).bold()
}
