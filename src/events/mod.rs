//! Events produced by the canvas.
//!
//! The canvas is single-threaded and host-driven, so events accumulate in
//! an outbox the host drains between ticks rather than firing callbacks.

use crate::pane::PaneId;

/// Notification emitted by the canvas for the host to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasEvent {
    /// A pane's selection is about to change; other panes' selections have
    /// already been cleared.
    BeforeSelectionChange {
        /// Whether the change originated from pointer input.
        from_pointer: bool,
    },
    /// A pane reported a content size change; bubbled to the host after the
    /// canvas has absorbed it.
    ResizeRequested { pane: PaneId },
}
