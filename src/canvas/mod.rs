//! The virtualized scroll canvas.
//!
//! `Canvas` hosts an ordered sequence of variable-height panes and keeps
//! rendering cost bounded as scrollback grows: off-screen panes are parked
//! in a holding area with their state intact, refresh work for them is
//! batched through a self-rescheduling pump, and the oldest content is
//! trimmed or dropped once the configured scrollback budgets are exceeded.
//!
//! The canvas is single-threaded and host-driven. Synchronous calls mutate
//! state directly; deferred work goes through the owned [`Scheduler`] and
//! runs when the host steps [`Canvas::run_scheduled`], once per tick.

pub(crate) mod evictor;
pub(crate) mod registry;
pub(crate) mod windowing;

use tracing::{debug, warn};

use crate::config::{CanvasConfig, ConfigProvider};
use crate::events::CanvasEvent;
use crate::geometry::{spacing, ScrollGeometry, VisibilityChange};
use crate::pane::{Attachment, Edge, Mode, Pane, PaneId, RefreshLevel, VisualState};
use crate::scheduler::Scheduler;

use evictor::EvictorState;
use registry::ChildRegistry;
use windowing::{AttachOutcome, Windowing};

/// Dirty panes measured per pump invocation.
const CHILD_RESIZE_BATCH_SIZE: usize = 3;

/// Deferred work items the canvas schedules against itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CanvasTask {
    Refresh(RefreshLevel),
    StashedResize,
}

/// Virtualized scroll container for terminal output panes.
pub struct Canvas {
    registry: ChildRegistry,
    geometry: ScrollGeometry,
    windowing: Windowing,
    scheduler: Scheduler<CanvasTask>,
    config: CanvasConfig,
    mode: Mode,
    focus_target: Option<PaneId>,
    needs_complete_refresh: bool,
    evictor: EvictorState,
    events: Vec<CanvasEvent>,
    connected: bool,
    next_pane_id: u64,
}

impl Canvas {
    pub fn new(config: CanvasConfig) -> Self {
        let mut canvas = Self {
            registry: ChildRegistry::new(),
            geometry: ScrollGeometry::new(0),
            windowing: Windowing::new(),
            scheduler: Scheduler::new(),
            config,
            mode: Mode::Default,
            focus_target: None,
            needs_complete_refresh: true,
            evictor: EvictorState::Idle,
            events: Vec::new(),
            connected: false,
            next_pane_id: 0,
        };
        canvas.schedule_resize();
        canvas
    }

    /// The canvas entered the host's layout; spacing becomes effective.
    pub fn connect(&mut self) {
        self.update_spacing();
        self.connected = true;
    }

    /// The canvas left the host's layout. The next refresh is promoted to a
    /// complete relayout.
    pub fn disconnect(&mut self) {
        self.needs_complete_refresh = true;
        self.connected = false;
    }

    // === Pane lifecycle ===

    /// Append `pane` at the bottom of the document.
    pub fn append_pane(&mut self, pane: Box<dyn Pane>) -> PaneId {
        let id = PaneId(self.next_pane_id);
        self.next_pane_id += 1;

        let height = pane.virtual_height();
        self.registry.push(id, pane);
        self.windowing.append(id);
        let changes = self.geometry.append_pane(id, height);
        self.apply_visibility(changes);
        id
    }

    /// Remove `pane` from the registry, the render surface and the
    /// geometry, returning it to the caller.
    pub fn remove_pane(&mut self, id: PaneId) -> Option<Box<dyn Pane>> {
        if !self.registry.contains(id) {
            warn!(%id, "remove_pane: pane is not in the registry");
            return None;
        }
        if self.focus_target == Some(id) {
            self.focus_target = None;
        }
        self.windowing.remove(id);
        let changes = self.geometry.remove_pane(id);
        let pane = self.registry.remove(id);
        self.apply_visibility(changes);
        pane
    }

    // === Deferred work ===

    /// Queue a resize-level refresh for the next tick.
    pub fn schedule_resize(&mut self) {
        self.scheduler.schedule(CanvasTask::Refresh(RefreshLevel::Resize));
    }

    /// Drain one scheduled batch. The host calls this once per tick, after
    /// its synchronous work has unwound. Returns the number of tasks run;
    /// work queued by those tasks waits for the next tick.
    pub fn run_scheduled(&mut self) -> usize {
        let batch = self.scheduler.take_batch();
        let count = batch.len();
        for task in batch {
            match task {
                CanvasTask::Refresh(level) => self.process_refresh(level),
                CanvasTask::StashedResize => self.stashed_resize_pass(),
            }
        }
        count
    }

    /// Whether deferred work is pending.
    pub fn has_scheduled_work(&self) -> bool {
        self.scheduler.is_armed()
    }

    /// Refresh synchronously at `level`.
    pub fn refresh(&mut self, level: RefreshLevel) {
        self.process_refresh(level);
    }

    fn process_refresh(&mut self, requested: RefreshLevel) {
        let mut level = requested;
        if self.needs_complete_refresh {
            level = RefreshLevel::Complete;
            self.needs_complete_refresh = false;
        }

        // Refresh what is on the live surface right now.
        let live: Vec<PaneId> = self.windowing.surface().to_vec();
        for &id in &live {
            if let Some(pane) = self.registry.pane_mut(id) {
                pane.refresh(level);
            }
        }

        // Stashed panes get the same level later, through the pump.
        let mut any_stashed = false;
        for entry in self.registry.iter_mut() {
            if !live.contains(&entry.id) {
                entry.needs_refresh = true;
                entry.refresh_level = level;
                any_stashed = true;
            }
        }
        if any_stashed {
            self.scheduler.schedule(CanvasTask::StashedResize);
        }

        let sizes: Vec<(PaneId, usize)> = live
            .iter()
            .map(|&id| (id, self.pane_height(id)))
            .collect();
        let changes = self.geometry.update_sizes(&sizes);
        self.apply_visibility(changes);

        let verdicts = self.geometry.reapply_state();
        self.apply_visibility(verdicts);

        self.enforce_budgets();
    }

    /// One pump invocation: measure and refresh a bounded batch of dirty,
    /// mostly-stashed panes, newest first.
    fn stashed_resize_pass(&mut self) {
        let mut batch: Vec<(PaneId, RefreshLevel)> = Vec::new();
        for entry in self.registry.iter_mut().rev() {
            if batch.len() >= CHILD_RESIZE_BATCH_SIZE {
                break;
            }
            if entry.needs_refresh {
                entry.needs_refresh = false;
                batch.push((entry.id, entry.refresh_level));
            }
        }
        if batch.is_empty() {
            return;
        }

        // Reveal stashed panes so they can be measured.
        let revealed: Vec<PaneId> = batch
            .iter()
            .map(|&(id, _)| id)
            .filter(|&id| !self.windowing.is_live(id))
            .collect();
        for &id in &revealed {
            self.mark_visible(id, true);
        }

        for &(id, level) in &batch {
            if let Some(pane) = self.registry.pane_mut(id) {
                pane.refresh(level);
            }
        }

        let sizes: Vec<(PaneId, usize)> = batch
            .iter()
            .map(|&(id, _)| (id, self.pane_height(id)))
            .collect();
        let changes = self.geometry.update_sizes(&sizes);
        self.apply_visibility(changes);

        // Re-hide what measurement left outside the visible range.
        for &id in &revealed {
            if !self.geometry.pane_visible(id) {
                self.mark_visible(id, false);
            }
        }

        if self.registry.any_dirty() {
            self.scheduler.schedule(CanvasTask::StashedResize);
        }
    }

    // === Size changes ===

    /// A pane's content size changed.
    ///
    /// Live panes update the geometry immediately; stashed panes are marked
    /// dirty and handled by the pump. Either way the change is bubbled to
    /// the host as [`CanvasEvent::ResizeRequested`].
    pub fn pane_resized(&mut self, id: PaneId) {
        if !self.registry.contains(id) {
            warn!(%id, "pane_resized: pane is not in the registry");
            return;
        }
        match self.windowing.attachment(id) {
            Some(Attachment::Stashed) => {
                if self.registry.mark_dirty(id, RefreshLevel::Resize) {
                    self.scheduler.schedule(CanvasTask::StashedResize);
                }
            }
            _ => {
                let height = self.pane_height(id);
                let changes = self.geometry.update_size(id, height);
                self.apply_visibility(changes);
                self.enforce_budgets();
            }
        }
        self.events.push(CanvasEvent::ResizeRequested { pane: id });
    }

    /// The host's viewport height changed.
    pub fn set_container_height(&mut self, px: usize) {
        let changes = self.geometry.update_container_height(px);
        self.apply_visibility(changes);
    }

    // === Scrolling ===

    pub fn scroll_to(&mut self, offset: usize) {
        let changes = self.geometry.scroll_to(offset);
        self.apply_visibility(changes);
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let target = self.geometry.scroll_offset() as isize + delta;
        self.scroll_to(target.max(0) as usize);
    }

    pub fn scroll_to_bottom(&mut self) {
        let changes = self.geometry.scroll_to_bottom();
        self.apply_visibility(changes);
    }

    pub fn scroll_page_up(&mut self) {
        self.scroll_by(-((self.geometry.container_height() / 2) as isize));
    }

    pub fn scroll_page_down(&mut self) {
        self.scroll_by((self.geometry.container_height() / 2) as isize);
    }

    /// Jump to the start of the pane containing the current offset, or the
    /// previous one when already at a pane start.
    pub fn go_to_previous_frame(&mut self) {
        let y = self.geometry.scroll_offset();
        let mut acc = 0;
        for (_, height) in self.geometry.heights_with_spacing() {
            if y <= acc + height {
                self.scroll_to(acc);
                return;
            }
            acc += height;
        }
    }

    /// Jump to the start of the next pane after the current offset.
    pub fn go_to_next_frame(&mut self) {
        let y = self.geometry.scroll_offset();
        let mut acc = 0;
        for (_, height) in self.geometry.heights_with_spacing() {
            if y < acc + height {
                self.scroll_to(acc + height);
                return;
            }
            acc += height;
        }
    }

    /// Keyboard activity in the focus target snaps the view to the bottom.
    pub fn notify_keyboard_activity(&mut self) {
        self.scroll_to_bottom();
    }

    // === Focus and modes ===

    /// Nominate the pane that holds keyboard focus by default. The focus
    /// target is exempt from stashing.
    pub fn set_focus_target(&mut self, id: Option<PaneId>) {
        if let Some(id) = id {
            if !self.registry.contains(id) {
                warn!(%id, "set_focus_target: pane is not in the registry");
                return;
            }
        }
        self.focus_target = id;
    }

    pub fn focus_target(&self) -> Option<PaneId> {
        self.focus_target
    }

    /// Give keyboard focus to the focus target.
    pub fn focus(&mut self) {
        if let Some(id) = self.focus_target {
            if let Some(pane) = self.registry.pane_mut(id) {
                pane.focus();
            }
        }
    }

    /// Switch the interaction mode and push `state` to every pane.
    pub fn set_mode_and_visual_state(&mut self, mode: Mode, state: VisualState) {
        self.mode = mode;
        for entry in self.registry.iter_mut() {
            entry.pane.set_mode(mode);
            entry.pane.set_visual_state(state);
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    // === Selection ===

    /// A pane's selection is about to change: clear every other pane's
    /// selection and notify the host.
    pub fn before_selection_change(&mut self, source: PaneId, from_pointer: bool) {
        for entry in self.registry.iter_mut() {
            if entry.id != source {
                entry.pane.clear_selection();
            }
        }
        self.events
            .push(CanvasEvent::BeforeSelectionChange { from_pointer });
    }

    /// Selected text of the first pane that has a selection.
    pub fn selection_text(&self) -> Option<String> {
        self.registry.iter().find_map(|e| e.pane.selection_text())
    }

    // === Cursor ===

    /// A pane's cursor moved; keep it in view.
    pub fn cursor_moved(&mut self, id: PaneId) {
        if !self.registry.contains(id) {
            warn!(%id, "cursor_moved: pane is not in the registry");
            return;
        }
        self.scroll_cursor_into_view(id);
    }

    /// The cursor ran off `edge` of pane `id` at column `col`: hand it to
    /// the nearest pane in that direction that accepts it.
    pub fn cursor_edge(&mut self, id: PaneId, edge: Edge, col: usize) {
        let Some(index) = self.registry.index_of(id) else {
            warn!(%id, "cursor_edge: source pane is not in the registry");
            return;
        };
        let order = self.registry.order();
        let candidates: Vec<PaneId> = match edge {
            Edge::Top => order[..index].iter().rev().copied().collect(),
            Edge::Bottom => order[index + 1..].to_vec(),
        };

        for target in candidates {
            self.mark_visible(target, true);
            let accepted = match self.registry.pane_mut(target) {
                Some(pane) => match edge {
                    Edge::Top => pane.place_cursor_bottom(col),
                    Edge::Bottom => pane.place_cursor_top(col),
                },
                None => false,
            };
            if accepted {
                if let Some(pane) = self.registry.pane_mut(target) {
                    pane.focus();
                }
                self.scroll_cursor_into_view(target);
                return;
            }
        }
        debug!(%id, ?edge, "cursor_edge: no pane accepted the cursor");
    }

    fn scroll_cursor_into_view(&mut self, id: PaneId) {
        let Some(bounds) = self.registry.pane(id).and_then(|p| p.cursor_bounds()) else {
            return;
        };
        let Some(top) = self.geometry.pane_top(id) else {
            return;
        };
        let changes = self
            .geometry
            .scroll_into_view(top + bounds.top, top + bounds.bottom);
        self.apply_visibility(changes);
    }

    // === Scrollback enforcement ===

    /// Enforce the line/frame budgets now.
    ///
    /// Guarded against re-entry: eviction's own trim/removal side effects
    /// route back through [`Canvas::pane_resized`] and would recurse here.
    pub fn enforce_scrollback_size(&mut self, max_lines: usize, max_frames: usize) {
        if self.evictor == EvictorState::Evicting {
            return;
        }
        self.evictor = EvictorState::Evicting;
        self.apply_eviction(max_lines, max_frames);
        self.evictor = EvictorState::Idle;
    }

    /// Run `f` with scrollback enforcement suppressed, then enforce once.
    pub fn with_scrollback_deferred<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let prev = self.evictor;
        self.evictor = EvictorState::Evicting;
        let result = f(self);
        self.evictor = prev;
        self.enforce_budgets();
        result
    }

    fn enforce_budgets(&mut self) {
        let max_lines = self.config.scrollback_max_lines;
        let max_frames = self.config.scrollback_max_frames;
        self.enforce_scrollback_size(max_lines, max_frames);
    }

    fn apply_eviction(&mut self, max_lines: usize, max_frames: usize) {
        let plan = evictor::plan_eviction(&mut self.registry, &self.geometry, max_lines, max_frames);
        if plan.is_empty() {
            return;
        }

        if let Some((id, excess)) = plan.trim {
            if let Some(text) = self.registry.pane_mut(id).and_then(|p| p.text_like()) {
                text.delete_top_lines(excess);
            }
            // The trim shrank the pane; absorb the new size. The eviction
            // guard keeps this from recursing into enforcement.
            self.pane_resized(id);
        }

        for id in plan.kill {
            self.remove_pane(id);
        }
    }

    // === Configuration ===

    /// The host's configuration changed.
    pub fn handle_config_change(&mut self, new: CanvasConfig) {
        let spacing_changed = new.ui_scale_percent != self.config.ui_scale_percent
            || new.margin_style != self.config.margin_style;
        self.config = new;
        if spacing_changed && self.connected {
            self.update_spacing();
            self.refresh(RefreshLevel::Complete);
        }
    }

    /// Pull the current config from `provider`.
    pub fn refresh_config(&mut self, provider: &dyn ConfigProvider) {
        self.handle_config_change(provider.canvas_config());
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    fn update_spacing(&mut self) {
        let px = spacing::spacing_for(self.config.margin_style, self.config.ui_scale_percent);
        let changes = self.geometry.set_spacing(px);
        self.apply_visibility(changes);
    }

    // === Events ===

    /// Drain events produced since the last call.
    pub fn take_events(&mut self) -> Vec<CanvasEvent> {
        std::mem::take(&mut self.events)
    }

    // === Introspection for the host ===

    pub fn pane(&self, id: PaneId) -> Option<&dyn Pane> {
        self.registry.pane(id)
    }

    pub fn pane_mut(&mut self, id: PaneId) -> Option<&mut dyn Pane> {
        self.registry.pane_mut(id)
    }

    /// Pane ids in logical document order.
    pub fn pane_order(&self) -> Vec<PaneId> {
        self.registry.order()
    }

    pub fn pane_count(&self) -> usize {
        self.registry.len()
    }

    pub fn attachment(&self, id: PaneId) -> Option<Attachment> {
        self.windowing.attachment(id)
    }

    pub fn is_live(&self, id: PaneId) -> bool {
        self.windowing.is_live(id)
    }

    /// Live panes in surface order, with their top offset relative to the
    /// viewport (negative when partially scrolled above it).
    pub fn visible_panes(&self) -> Vec<(PaneId, isize)> {
        self.windowing
            .surface()
            .iter()
            .map(|&id| (id, self.geometry.viewport_top(id).unwrap_or(0)))
            .collect()
    }

    pub fn scroll_offset(&self) -> usize {
        self.geometry.scroll_offset()
    }

    pub fn total_virtual_height(&self) -> usize {
        self.geometry.total_virtual_height()
    }

    pub fn container_height(&self) -> usize {
        self.geometry.container_height()
    }

    // === Internals ===

    fn pane_height(&self, id: PaneId) -> usize {
        self.registry.pane(id).map_or(0, |p| p.virtual_height())
    }

    fn apply_visibility(&mut self, changes: Vec<VisibilityChange>) {
        for change in changes {
            self.mark_visible(change.pane, change.visible);
        }
    }

    /// Move one pane between the live surface and the holding area,
    /// honoring the focus exemptions.
    fn mark_visible(&mut self, id: PaneId, visible: bool) {
        if !visible {
            let holds_focus = self.registry.pane(id).map_or(false, |p| p.has_focus());
            if self.focus_target == Some(id) || holds_focus {
                return;
            }
            self.windowing.detach(id);
        } else {
            let order = self.registry.order();
            if self.windowing.attach(id, &order) == AttachOutcome::Attached {
                let visual = if self.mode == Mode::Cursor {
                    VisualState::Auto
                } else {
                    VisualState::Focused
                };
                if let Some(pane) = self.registry.pane_mut(id) {
                    pane.set_mode(self.mode);
                    pane.set_visual_state(visual);
                }
            }
        }
    }
}
