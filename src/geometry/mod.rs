//! Scroll geometry.
//!
//! `ScrollGeometry` is the single source of truth for scroll math: each
//! pane's virtual height and cumulative top offset, the container height,
//! the clamped scroll offset, and the visibility verdict for every pane.
//! Panes are interleaved with zero-content spacer slots that carry the
//! configured inter-pane margin; spacers participate in offset math only
//! and are never reported to the windowing layer.

pub mod spacing;

use tracing::trace;

use crate::pane::PaneId;

/// A pane's visibility verdict changed (or is being re-asserted).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityChange {
    pub pane: PaneId,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotKind {
    Pane(PaneId),
    Spacer,
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    kind: SlotKind,
    height: usize,
    top: usize,
    visible: bool,
}

/// Virtual scroll area over an ordered sequence of pane and spacer slots.
#[derive(Debug)]
pub struct ScrollGeometry {
    slots: Vec<Slot>,
    spacing: usize,
    container_height: usize,
    scroll_offset: usize,
}

impl ScrollGeometry {
    pub fn new(container_height: usize) -> Self {
        Self {
            slots: Vec::new(),
            spacing: 0,
            container_height,
            scroll_offset: 0,
        }
    }

    /// Append a pane slot, preceded by a spacer when it is not the first.
    pub fn append_pane(&mut self, pane: PaneId, height: usize) -> Vec<VisibilityChange> {
        if !self.slots.is_empty() {
            self.slots.push(Slot {
                kind: SlotKind::Spacer,
                height: self.spacing,
                top: 0,
                visible: false,
            });
        }
        self.slots.push(Slot {
            kind: SlotKind::Pane(pane),
            height,
            top: 0,
            visible: false,
        });
        self.recompute()
    }

    /// Remove a pane slot together with one adjacent spacer.
    pub fn remove_pane(&mut self, pane: PaneId) -> Vec<VisibilityChange> {
        let Some(idx) = self.index_of(pane) else {
            return Vec::new();
        };
        self.slots.remove(idx);
        if idx > 0 {
            // Spacer that preceded the removed pane.
            self.slots.remove(idx - 1);
        } else if self
            .slots
            .first()
            .is_some_and(|s| s.kind == SlotKind::Spacer)
        {
            // Removed the first pane; the sequence must not lead with a spacer.
            self.slots.remove(0);
        }
        self.recompute()
    }

    /// Update one pane's virtual height.
    pub fn update_size(&mut self, pane: PaneId, height: usize) -> Vec<VisibilityChange> {
        self.update_sizes(&[(pane, height)])
    }

    /// Update many pane heights with a single cumulative-offset recompute.
    pub fn update_sizes(&mut self, sizes: &[(PaneId, usize)]) -> Vec<VisibilityChange> {
        for &(pane, height) in sizes {
            if let Some(idx) = self.index_of(pane) {
                self.slots[idx].height = height;
            } else {
                trace!(%pane, "update_sizes: pane has no geometry slot");
            }
        }
        self.recompute()
    }

    pub fn update_container_height(&mut self, px: usize) -> Vec<VisibilityChange> {
        self.container_height = px;
        self.recompute()
    }

    /// Set the inter-pane spacing and resize every spacer slot.
    pub fn set_spacing(&mut self, px: usize) -> Vec<VisibilityChange> {
        self.spacing = px;
        for slot in &mut self.slots {
            if slot.kind == SlotKind::Spacer {
                slot.height = px;
            }
        }
        self.recompute()
    }

    /// Scroll to `offset`, clamped to the scrollable extent.
    pub fn scroll_to(&mut self, offset: usize) -> Vec<VisibilityChange> {
        self.scroll_offset = offset;
        self.recompute()
    }

    pub fn scroll_to_bottom(&mut self) -> Vec<VisibilityChange> {
        self.scroll_to(usize::MAX)
    }

    /// Minimal scroll delta making the virtual range `[top, bottom]` fully
    /// visible, clamped to container bounds.
    pub fn scroll_into_view(&mut self, top: usize, bottom: usize) -> Vec<VisibilityChange> {
        let mut offset = self.scroll_offset;
        if bottom > offset + self.container_height {
            offset = bottom.saturating_sub(self.container_height);
        }
        if top < offset {
            offset = top;
        }
        self.scroll_to(offset)
    }

    /// Re-derive visibility for all panes against the current offset,
    /// returning the verdict for every pane in document order.
    ///
    /// Calling this twice without an intervening structural change yields
    /// identical verdicts, so downstream attach/detach work is idempotent.
    pub fn reapply_state(&mut self) -> Vec<VisibilityChange> {
        self.recompute_slots();
        self.slots
            .iter()
            .filter_map(|slot| match slot.kind {
                SlotKind::Pane(pane) => Some(VisibilityChange {
                    pane,
                    visible: slot.visible,
                }),
                SlotKind::Spacer => None,
            })
            .collect()
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn container_height(&self) -> usize {
        self.container_height
    }

    /// Total scrollable extent: pane heights plus spacing.
    pub fn total_virtual_height(&self) -> usize {
        self.slots.iter().map(|s| s.height).sum()
    }

    pub fn max_scroll_offset(&self) -> usize {
        self.total_virtual_height()
            .saturating_sub(self.container_height)
    }

    /// Virtual top offset of `pane`.
    pub fn pane_top(&self, pane: PaneId) -> Option<usize> {
        self.index_of(pane).map(|idx| self.slots[idx].top)
    }

    /// Recorded virtual height of `pane`.
    pub fn pane_height(&self, pane: PaneId) -> Option<usize> {
        self.index_of(pane).map(|idx| self.slots[idx].height)
    }

    /// Whether `pane` currently intersects the viewport. The windowing
    /// layer treats this as the authoritative verdict.
    pub fn pane_visible(&self, pane: PaneId) -> bool {
        self.index_of(pane)
            .map(|idx| self.slots[idx].visible)
            .unwrap_or(false)
    }

    /// Pane top relative to the viewport; negative when scrolled above it.
    pub fn viewport_top(&self, pane: PaneId) -> Option<isize> {
        self.pane_top(pane)
            .map(|top| top as isize - self.scroll_offset as isize)
    }

    /// Pane heights including the spacing that follows each pane, in
    /// document order. Drives frame-to-frame navigation.
    pub fn heights_with_spacing(&self) -> Vec<(PaneId, usize)> {
        let mut out: Vec<(PaneId, usize)> = Vec::new();
        for slot in &self.slots {
            match slot.kind {
                SlotKind::Pane(pane) => out.push((pane, slot.height)),
                SlotKind::Spacer => {
                    if let Some(last) = out.last_mut() {
                        last.1 += slot.height;
                    }
                }
            }
        }
        out
    }

    fn index_of(&self, pane: PaneId) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.kind == SlotKind::Pane(pane))
    }

    /// Recompute tops and visibility, reporting panes whose verdict flipped.
    fn recompute(&mut self) -> Vec<VisibilityChange> {
        let before: Vec<(PaneId, bool)> = self.pane_flags();
        self.recompute_slots();
        let after = self.pane_flags();

        before
            .iter()
            .zip(after.iter())
            .filter(|(b, a)| b.1 != a.1)
            .map(|(_, &(pane, visible))| VisibilityChange { pane, visible })
            .collect()
    }

    fn recompute_slots(&mut self) {
        let total: usize = self.slots.iter().map(|s| s.height).sum();
        self.scroll_offset = self
            .scroll_offset
            .min(total.saturating_sub(self.container_height));

        let view_start = self.scroll_offset;
        let view_end = self.scroll_offset + self.container_height;

        let mut top = 0;
        for slot in &mut self.slots {
            slot.top = top;
            top += slot.height;
            slot.visible = slot.top < view_end && slot.top + slot.height > view_start;
        }
    }

    fn pane_flags(&self) -> Vec<(PaneId, bool)> {
        self.slots
            .iter()
            .filter_map(|s| match s.kind {
                SlotKind::Pane(pane) => Some((pane, s.visible)),
                SlotKind::Spacer => None,
            })
            .collect()
    }
}
