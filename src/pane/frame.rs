//! Captured output frame.
//!
//! `FramePane` is a finished, read-only output block — the frozen result of
//! a completed command. It exposes the text-like capability for line
//! accounting but refuses in-place trimming, so the evictor only ever
//! deletes it whole.

use std::any::Any;

use tracing::debug;

use super::{CursorBounds, Mode, Pane, RefreshLevel, TextLike, VisualState};

/// Read-only captured frame.
pub struct FramePane {
    title: Option<String>,
    lines: Vec<String>,
    row_height_px: usize,
    mode: Mode,
    visual_state: VisualState,
    focused: bool,
    cursor_row: usize,
}

impl FramePane {
    pub fn new(title: Option<String>, text: &str, row_height_px: usize) -> Self {
        let lines = text.lines().map(str::to_owned).collect::<Vec<_>>();
        Self {
            title,
            lines: if lines.is_empty() {
                vec![String::new()]
            } else {
                lines
            },
            row_height_px,
            mode: Mode::Default,
            visual_state: VisualState::Unfocused,
            focused: false,
            cursor_row: 0,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn row_height_px(&self) -> usize {
        self.row_height_px
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn visual_state(&self) -> VisualState {
        self.visual_state
    }
}

impl Pane for FramePane {
    fn virtual_height(&self) -> usize {
        self.lines.len() * self.row_height_px
    }

    fn refresh(&mut self, _level: RefreshLevel) {}

    fn set_visual_state(&mut self, state: VisualState) {
        self.visual_state = state;
    }

    fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn has_focus(&self) -> bool {
        self.focused
    }

    fn cursor_bounds(&self) -> Option<CursorBounds> {
        let top = self.cursor_row * self.row_height_px;
        Some(CursorBounds {
            top,
            bottom: top + self.row_height_px,
        })
    }

    fn place_cursor_bottom(&mut self, _col: usize) -> bool {
        self.cursor_row = self.lines.len().saturating_sub(1);
        true
    }

    fn place_cursor_top(&mut self, _col: usize) -> bool {
        self.cursor_row = 0;
        true
    }

    fn text_like(&mut self) -> Option<&mut dyn TextLike> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl TextLike for FramePane {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn pixel_height_to_rows(&self, px: usize) -> usize {
        if self.row_height_px == 0 {
            0
        } else {
            px / self.row_height_px
        }
    }

    fn delete_top_lines(&mut self, _n: usize) {
        // Captured frames are immutable; the evictor checks supports_trim
        // before asking.
        debug!("delete_top_lines called on a captured frame");
    }

    fn supports_trim(&self) -> bool {
        false
    }
}
