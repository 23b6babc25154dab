//! Pane capability contracts.
//!
//! A pane is one scrollable content block hosted in the canvas — typically a
//! single command's output. The canvas never reaches into pane internals;
//! everything it needs goes through the [`Pane`] trait, and panes that carry
//! line-oriented text opt into the [`TextLike`] capability so the scrollback
//! evictor can count and trim their lines.

use std::any::Any;
use std::fmt;

pub mod frame;
pub mod text;

pub use frame::FramePane;
pub use text::TextPane;

/// Stable identity of a pane for the lifetime of its registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PaneId(pub(crate) u64);

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pane#{}", self.0)
    }
}

/// How much work a refresh pass should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshLevel {
    /// Re-measure only; content layout is assumed valid.
    #[default]
    Resize,
    /// Full relayout of the pane's content.
    Complete,
}

/// Visual state applied to a pane when it (re)enters the live surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualState {
    Unfocused,
    Focused,
    /// Pane derives its own state from focus/selection.
    Auto,
}

/// Interaction mode of the whole canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Keyboard input flows to the focus target.
    #[default]
    Default,
    /// Cursor/selection navigation across panes.
    Cursor,
}

/// Whether a pane is attached to the live render surface or parked in the
/// offscreen holding area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    Live,
    Stashed,
}

/// Which edge of a pane the cursor ran off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
}

/// Cursor extent in pixels, relative to the pane's own top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorBounds {
    pub top: usize,
    pub bottom: usize,
}

/// Capability contract every hosted pane implements.
///
/// Heights are virtual: they drive scroll math whether or not the pane is
/// currently attached to the render surface. Detaching a pane must preserve
/// all of its internal state.
pub trait Pane {
    /// Logical height in pixels.
    fn virtual_height(&self) -> usize;

    /// Re-measure or relayout the pane's content.
    fn refresh(&mut self, level: RefreshLevel);

    fn set_visual_state(&mut self, state: VisualState);

    fn set_mode(&mut self, mode: Mode);

    fn focus(&mut self);

    fn has_focus(&self) -> bool;

    /// Clear any active selection.
    fn clear_selection(&mut self) {}

    /// Currently selected text, if any.
    fn selection_text(&self) -> Option<String> {
        None
    }

    /// Cursor extent relative to the pane top, if the pane hosts a cursor.
    fn cursor_bounds(&self) -> Option<CursorBounds> {
        None
    }

    /// Accept the cursor arriving from the pane below, entering on the
    /// bottom row at `col`. Returns `false` when the pane cannot take it.
    fn place_cursor_bottom(&mut self, _col: usize) -> bool {
        false
    }

    /// Accept the cursor arriving from the pane above, entering on the top
    /// row at `col`.
    fn place_cursor_top(&mut self, _col: usize) -> bool {
        false
    }

    /// Text-like capability, for panes whose content is countable lines.
    /// Opaque panes return `None` and are invisible to line budgets.
    fn text_like(&mut self) -> Option<&mut dyn TextLike> {
        None
    }

    /// Concrete-type access for hosts that render pane content directly.
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Optional capability for panes with line-oriented content.
pub trait TextLike {
    fn line_count(&self) -> usize;

    /// How many whole rows fit in `px` of this pane's content.
    fn pixel_height_to_rows(&self, px: usize) -> usize;

    /// Drop the oldest `n` lines in place.
    fn delete_top_lines(&mut self, n: usize);

    /// Live, growable output supports in-place trimming; captured frames do
    /// not and are only ever deleted whole.
    fn supports_trim(&self) -> bool;
}
