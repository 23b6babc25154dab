//! Windowing: live surface vs. offscreen holding area.
//!
//! Off-screen panes are parked in a stash that preserves their internal
//! state at zero render cost. Reattachment inserts a pane back into the
//! live surface at the position that keeps surface order equal to the
//! registry's logical order restricted to live panes — a linear merge of
//! the two sequences, O(n) amortized per reattachment.

use tracing::warn;

use crate::pane::{Attachment, PaneId};

/// What `attach` did with the pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AttachOutcome {
    /// Pane was already on the live surface.
    AlreadyLive,
    /// Pane was inserted into the live surface; visual state must be
    /// (re)applied by the caller.
    Attached,
    /// Pane is unknown to the given logical order; nothing was done.
    Unknown,
}

/// Tracks which panes are live and in what surface order, and which are
/// parked in the holding area.
#[derive(Debug, Default)]
pub(crate) struct Windowing {
    surface: Vec<PaneId>,
    stash: Vec<PaneId>,
}

impl Windowing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a freshly created pane to the live surface.
    pub fn append(&mut self, id: PaneId) {
        self.surface.push(id);
    }

    /// Move `id` from the live surface to the holding area. Returns whether
    /// the pane actually moved.
    pub fn detach(&mut self, id: PaneId) -> bool {
        let Some(pos) = self.surface.iter().position(|&p| p == id) else {
            return false;
        };
        self.surface.remove(pos);
        if !self.stash.contains(&id) {
            self.stash.push(id);
        }
        true
    }

    /// Reattach `id` to the live surface at its logical position.
    ///
    /// `order` is the registry's document order. Both sequences are walked
    /// in lockstep: when the target is reached in `order`, it is inserted
    /// immediately before the surface child occupying that logical slot, or
    /// appended when every live pane precedes it.
    pub fn attach(&mut self, id: PaneId, order: &[PaneId]) -> AttachOutcome {
        if self.surface.contains(&id) {
            return AttachOutcome::AlreadyLive;
        }
        if !order.contains(&id) {
            warn!(%id, "attach: pane is not in the registry");
            return AttachOutcome::Unknown;
        }

        self.stash.retain(|&p| p != id);

        if self.surface.is_empty() {
            self.surface.push(id);
            return AttachOutcome::Attached;
        }

        let mut surface_idx = 0;
        for &current in order {
            if current == id {
                self.surface.insert(surface_idx, id);
                return AttachOutcome::Attached;
            }
            if self.surface.get(surface_idx) == Some(&current) {
                surface_idx += 1;
                if surface_idx >= self.surface.len() {
                    self.surface.push(id);
                    return AttachOutcome::Attached;
                }
            }
        }

        // Unreachable given the membership check above.
        self.surface.push(id);
        AttachOutcome::Attached
    }

    /// Forget `id` entirely (pane removed from the canvas).
    pub fn remove(&mut self, id: PaneId) {
        self.surface.retain(|&p| p != id);
        self.stash.retain(|&p| p != id);
    }

    pub fn is_live(&self, id: PaneId) -> bool {
        self.surface.contains(&id)
    }

    pub fn attachment(&self, id: PaneId) -> Option<Attachment> {
        if self.surface.contains(&id) {
            Some(Attachment::Live)
        } else if self.stash.contains(&id) {
            Some(Attachment::Stashed)
        } else {
            None
        }
    }

    /// Live panes in surface order.
    pub fn surface(&self) -> &[PaneId] {
        &self.surface
    }

    /// Panes currently parked offscreen.
    pub fn stashed(&self) -> &[PaneId] {
        &self.stash
    }
}
