//! Live terminal-output pane.
//!
//! `TextPane` is fed raw terminal bytes through a `vte` parser and keeps a
//! plain line grid: printable characters advance the cursor by their
//! display width, control bytes move it, escape sequences are consumed and
//! dropped. It is growable and trimmable, so the scrollback evictor can
//! delete its oldest lines in place instead of dropping the whole pane.

use std::any::Any;
use std::ops::Range;

use unicode_width::UnicodeWidthChar;

use super::{CursorBounds, Mode, Pane, RefreshLevel, TextLike, VisualState};

/// Growable pane holding one command's live output.
pub struct TextPane {
    parser: vte::Parser,
    grid: LineGrid,
    row_height_px: usize,
    mode: Mode,
    visual_state: VisualState,
    focused: bool,
    selection: Option<Range<usize>>,
}

/// Line store driven by the vte state machine.
#[derive(Default)]
struct LineGrid {
    lines: Vec<String>,
    cursor_row: usize,
    cursor_col: usize,
}

const TAB_STOP: usize = 8;

impl LineGrid {
    fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor_row: 0,
            cursor_col: 0,
        }
    }

    fn current_line(&mut self) -> &mut String {
        while self.lines.len() <= self.cursor_row {
            self.lines.push(String::new());
        }
        &mut self.lines[self.cursor_row]
    }

    /// Byte index of display column `col`, padding with spaces as needed.
    fn byte_index_at(line: &mut String, col: usize) -> usize {
        let mut width = 0;
        for (idx, c) in line.char_indices() {
            if width >= col {
                return idx;
            }
            width += UnicodeWidthChar::width(c).unwrap_or(0);
        }
        while width < col {
            line.push(' ');
            width += 1;
        }
        line.len()
    }
}

impl vte::Perform for LineGrid {
    fn print(&mut self, c: char) {
        let col = self.cursor_col;
        let line = self.current_line();
        let idx = Self::byte_index_at(line, col);
        // Overwrite from the cursor on; carriage-returned progress lines
        // replace their old content.
        line.truncate(idx);
        line.push(c);
        self.cursor_col += UnicodeWidthChar::width(c).unwrap_or(0);
    }

    fn execute(&mut self, byte: u8) {
        match byte {
            b'\n' => {
                self.cursor_row += 1;
                self.cursor_col = 0;
                self.current_line();
            }
            b'\r' => self.cursor_col = 0,
            b'\t' => self.cursor_col = (self.cursor_col / TAB_STOP + 1) * TAB_STOP,
            0x08 => self.cursor_col = self.cursor_col.saturating_sub(1),
            _ => {}
        }
    }
}

impl TextPane {
    pub fn new(row_height_px: usize) -> Self {
        Self {
            parser: vte::Parser::new(),
            grid: LineGrid::new(),
            row_height_px,
            mode: Mode::Default,
            visual_state: VisualState::Unfocused,
            focused: false,
            selection: None,
        }
    }

    /// Parse `bytes` into the line grid.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.parser.advance(&mut self.grid, bytes);
    }

    pub fn lines(&self) -> &[String] {
        &self.grid.lines
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

    /// Select a line range, e.g. from pointer drag handling in the host.
    pub fn select_lines(&mut self, range: Range<usize>) {
        let end = range.end.min(self.grid.lines.len());
        let start = range.start.min(end);
        self.selection = Some(start..end);
    }
}

impl Pane for TextPane {
    fn virtual_height(&self) -> usize {
        self.grid.lines.len() * self.row_height_px
    }

    fn refresh(&mut self, _level: RefreshLevel) {
        // Height derives directly from the line count; nothing is cached.
    }

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

    fn clear_selection(&mut self) {
        self.selection = None;
    }

    fn selection_text(&self) -> Option<String> {
        let range = self.selection.clone()?;
        Some(self.grid.lines[range].join("\n"))
    }

    fn cursor_bounds(&self) -> Option<CursorBounds> {
        let top = self.grid.cursor_row * self.row_height_px;
        Some(CursorBounds {
            top,
            bottom: top + self.row_height_px,
        })
    }

    fn place_cursor_bottom(&mut self, col: usize) -> bool {
        self.grid.cursor_row = self.grid.lines.len().saturating_sub(1);
        self.grid.cursor_col = col;
        true
    }

    fn place_cursor_top(&mut self, col: usize) -> bool {
        self.grid.cursor_row = 0;
        self.grid.cursor_col = col;
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

impl TextLike for TextPane {
    fn line_count(&self) -> usize {
        self.grid.lines.len()
    }

    fn pixel_height_to_rows(&self, px: usize) -> usize {
        if self.row_height_px == 0 {
            0
        } else {
            px / self.row_height_px
        }
    }

    fn delete_top_lines(&mut self, n: usize) {
        let n = n.min(self.grid.lines.len());
        self.grid.lines.drain(0..n);
        if self.grid.lines.is_empty() {
            self.grid.lines.push(String::new());
        }
        self.grid.cursor_row = self.grid.cursor_row.saturating_sub(n);
        if let Some(sel) = self.selection.take() {
            self.selection = Some(sel.start.saturating_sub(n)..sel.end.saturating_sub(n));
        }
    }

    fn supports_trim(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fed(bytes: &[u8]) -> TextPane {
        let mut pane = TextPane::new(10);
        pane.feed(bytes);
        pane
    }

    #[test]
    fn plain_output_splits_into_lines() {
        let pane = fed(b"hello\nworld\n");
        assert_eq!(pane.lines(), &["hello", "world", ""]);
        assert_eq!(pane.virtual_height(), 30);
    }

    #[test]
    fn ansi_sequences_are_consumed() {
        let pane = fed(b"\x1b[1;32mok\x1b[0m done\n");
        assert_eq!(pane.lines()[0], "ok done");
    }

    #[test]
    fn carriage_return_overwrites_the_line() {
        let pane = fed(b"progress 10%\rprogress 99%");
        assert_eq!(pane.lines(), &["progress 99%"]);
    }

    #[test]
    fn tab_advances_to_the_next_stop() {
        let pane = fed(b"a\tb");
        assert_eq!(pane.lines()[0], "a       b");
    }

    #[test]
    fn wide_characters_advance_two_columns() {
        let mut pane = TextPane::new(10);
        pane.feed("日本\n".as_bytes());
        assert_eq!(pane.lines()[0], "日本");
        // Next print after the wide chars lands at column 4.
        assert_eq!(pane.grid.lines.len(), 2);
    }

    #[test]
    fn delete_top_lines_trims_in_place() {
        let mut pane = fed(b"one\ntwo\nthree\nfour");
        assert_eq!(pane.line_count(), 4);

        pane.delete_top_lines(2);
        assert_eq!(pane.lines(), &["three", "four"]);
        assert_eq!(pane.virtual_height(), 20);
        assert!(pane.supports_trim());
    }

    #[test]
    fn delete_more_than_everything_leaves_one_empty_line() {
        let mut pane = fed(b"one\ntwo");
        pane.delete_top_lines(10);
        assert_eq!(pane.line_count(), 1);
        assert_eq!(pane.lines(), &[""]);
    }

    #[test]
    fn selection_survives_trimming_by_shifting() {
        let mut pane = fed(b"a\nb\nc\nd");
        pane.select_lines(2..4);
        pane.delete_top_lines(1);
        assert_eq!(pane.selection_text(), Some("c\nd".into()));
    }

    #[test]
    fn selection_text_joins_selected_lines() {
        let mut pane = fed(b"a\nb\nc");
        pane.select_lines(0..2);
        assert_eq!(pane.selection_text(), Some("a\nb".into()));
        pane.clear_selection();
        assert_eq!(pane.selection_text(), None);
    }

    #[test]
    fn cursor_placement_from_either_edge() {
        let mut pane = fed(b"a\nb\nc");
        assert!(pane.place_cursor_bottom(1));
        assert_eq!(pane.cursor_bounds(), Some(CursorBounds { top: 20, bottom: 30 }));

        assert!(pane.place_cursor_top(0));
        assert_eq!(pane.cursor_bounds(), Some(CursorBounds { top: 0, bottom: 10 }));
    }

    #[test]
    fn pixel_height_maps_to_whole_rows() {
        let pane = fed(b"x\n");
        assert_eq!(pane.pixel_height_to_rows(35), 3);
        assert_eq!(pane.pixel_height_to_rows(0), 0);
    }
}
