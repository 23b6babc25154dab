//! Scrollback eviction.
//!
//! A one-sided LRU-by-position policy: the oldest panes are always the
//! eviction candidates and everything within one container height of the
//! bottom-most content is protected. Panes are walked newest to oldest;
//! the first text-like pane past the protected region may be trimmed in
//! place when it supports it, anything older that pushes a budget over is
//! deleted whole.
//!
//! Planning is separated from application: `plan_eviction` only inspects,
//! the canvas applies the plan and holds the reentrancy guard while doing
//! so (removal triggers resize work that would otherwise re-enter here).

use crate::canvas::registry::ChildRegistry;
use crate::geometry::ScrollGeometry;
use crate::pane::PaneId;

/// Guard against recursive eviction triggered by eviction's own side
/// effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum EvictorState {
    #[default]
    Idle,
    Evicting,
}

/// What enforcement decided to do.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct EvictionPlan {
    /// Trim this many oldest lines from the straddling pane, in place.
    pub trim: Option<(PaneId, usize)>,
    /// Panes to remove outright, newest first.
    pub kill: Vec<PaneId>,
}

impl EvictionPlan {
    pub fn is_empty(&self) -> bool {
        self.trim.is_none() && self.kill.is_empty()
    }
}

/// Walk panes newest to oldest and decide what the line/frame budgets
/// require.
///
/// Step 1 protects one container height of the newest content, including
/// the pane whose span crosses the boundary. Step 2 inspects the newest
/// unprotected pane: if its scrollback lines exceed `max_lines` it is
/// trimmed when trimmable, otherwise killed together with everything older
/// (the budget is already spent, nothing older can be kept). Step 3 walks
/// the remaining older panes accumulating a frame count and line total;
/// the first pane to cross either budget is killed along with everything
/// older. Each pane's line count enters the running total exactly once.
pub(crate) fn plan_eviction(
    registry: &mut ChildRegistry,
    geometry: &ScrollGeometry,
    max_lines: usize,
    max_frames: usize,
) -> EvictionPlan {
    let mut newest_first = registry.order();
    newest_first.reverse();

    let viewport = geometry.container_height();
    let n = newest_first.len();
    let mut plan = EvictionPlan::default();

    // Step 1: skip past everything within one container height.
    let mut i = 0;
    let mut current_height = 0;
    while i < n && current_height <= viewport {
        current_height += geometry.pane_height(newest_first[i]).unwrap_or(0);
        i += 1;
    }

    let mut lines_in_scrollback = 0;

    // Step 2: the newest unprotected pane.
    if i < n {
        let id = newest_first[i];
        i += 1;

        if let Some(text) = registry.pane_mut(id).and_then(|p| p.text_like()) {
            let visible_rows = text.pixel_height_to_rows(viewport.saturating_sub(current_height));
            lines_in_scrollback = text.line_count().saturating_sub(visible_rows);
            if lines_in_scrollback > max_lines {
                if text.supports_trim() {
                    plan.trim = Some((id, lines_in_scrollback - max_lines));
                } else {
                    plan.kill.push(id);
                }
                plan.kill.extend_from_slice(&newest_first[i..]);
                return plan;
            }
        }
    }

    // Step 3: older frames against the cumulative budgets.
    let mut frame_count = 0;
    while i < n {
        let id = newest_first[i];
        i += 1;
        frame_count += 1;

        if let Some(text) = registry.pane_mut(id).and_then(|p| p.text_like()) {
            lines_in_scrollback += text.line_count();
            if frame_count > max_frames || lines_in_scrollback > max_lines {
                plan.kill.push(id);
                plan.kill.extend_from_slice(&newest_first[i..]);
                break;
            }
        }
    }

    plan
}
