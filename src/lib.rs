//! termcanvas - virtualized scroll canvas for terminal output blocks
//!
//! A terminal session produces an unbounded sequence of output blocks;
//! keeping them all attached to a render surface makes every layout pass
//! cost O(total scrollback). This crate hosts those blocks as panes in a
//! [`canvas::Canvas`] that keeps rendering cost bounded:
//!
//! - off-screen panes are detached into a holding area with their state
//!   intact and reattached in document order when they scroll back in
//! - refresh work for detached panes is coalesced and amortized over ticks
//!   by a batched, self-rescheduling resize pump
//! - the oldest content is trimmed or dropped once the configured
//!   line/frame budgets are exceeded, never touching the visible viewport
//!
//! # Architecture
//!
//! - `canvas`: the orchestrator plus its registry, windowing and evictor
//! - `geometry`: virtual heights, scroll offset, visibility verdicts
//! - `scheduler`: per-canvas deferred task queue, stepped by the host
//! - `pane`: capability contracts and the built-in pane types
//! - `scrollbar`: scrollbar model and demo widget
//! - `config`: canvas configuration contract
//! - `events`: notifications drained by the host
//! - `script`: scripted demo sessions for the binary

pub mod canvas;
pub mod config;
pub mod events;
pub mod geometry;
pub mod pane;
pub mod scheduler;
pub mod script;
pub mod scrollbar;

pub use canvas::Canvas;
pub use config::{CanvasConfig, ConfigError, ConfigProvider, MarginStyle};
pub use events::CanvasEvent;
pub use pane::{
    Attachment, CursorBounds, Edge, FramePane, Mode, Pane, PaneId, RefreshLevel, TextLike,
    TextPane, VisualState,
};
pub use scheduler::Scheduler;
pub use scrollbar::{Scrollbar, ScrollbarEvent, ScrollbarWidget};
