//! Scrollbar contract.
//!
//! The canvas feeds the model a length (total virtual height) and a
//! position; host-driven moves come back as [`ScrollbarEvent`]s carrying
//! the new position. A thin ratatui widget renders the model for the demo
//! binary; the visual side stays out of the core.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;
use tracing::warn;

/// Notification emitted when the scrollbar position moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollbarEvent {
    pub position: usize,
    pub is_top: bool,
    pub is_bottom: bool,
}

/// Scrollbar model: a scrollable length, a viewport, and a clamped
/// position within them.
#[derive(Debug, Default)]
pub struct Scrollbar {
    length: usize,
    viewport: usize,
    position: usize,
}

impl Scrollbar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn position(&self) -> usize {
        self.position
    }

    fn max_position(&self) -> usize {
        self.length.saturating_sub(self.viewport)
    }

    /// Total scrollable length in pixels.
    pub fn set_length(&mut self, length: usize) {
        self.length = length;
        self.position = self.position.min(self.max_position());
    }

    /// Visible extent in pixels.
    pub fn set_viewport(&mut self, viewport: usize) {
        self.viewport = viewport;
        self.position = self.position.min(self.max_position());
    }

    /// Canvas-driven position update; clamped, no event.
    pub fn set_position(&mut self, position: usize) {
        self.position = position.min(self.max_position());
    }

    /// Host-driven move (drag, wheel on the bar). Returns an event when
    /// the clamped position actually changed.
    pub fn scroll_to(&mut self, position: usize) -> Option<ScrollbarEvent> {
        let clamped = position.min(self.max_position());
        if clamped == self.position {
            return None;
        }
        self.position = clamped;
        Some(ScrollbarEvent {
            position: clamped,
            is_top: clamped == 0,
            is_bottom: clamped == self.max_position(),
        })
    }

    /// Set the length from a string attribute. Malformed values are logged
    /// and the previous value retained.
    pub fn set_length_attr(&mut self, value: &str) {
        match value.trim().parse::<usize>() {
            Ok(n) => self.set_length(n),
            Err(_) => warn!(value, "scrollbar length attribute was not a number"),
        }
    }

    /// Set the position from a string attribute, with the same tolerance.
    pub fn set_position_attr(&mut self, value: &str) {
        match value.trim().parse::<usize>() {
            Ok(n) => self.set_position(n),
            Err(_) => warn!(value, "scrollbar position attribute was not a number"),
        }
    }
}

/// Vertical scrollbar widget rendering a [`Scrollbar`] model.
pub struct ScrollbarWidget<'a> {
    model: &'a Scrollbar,
    track_style: Style,
    thumb_style: Style,
}

impl<'a> ScrollbarWidget<'a> {
    pub fn new(model: &'a Scrollbar) -> Self {
        Self {
            model,
            track_style: Style::default(),
            thumb_style: Style::default(),
        }
    }

    pub fn track_style(mut self, style: Style) -> Self {
        self.track_style = style;
        self
    }

    pub fn thumb_style(mut self, style: Style) -> Self {
        self.thumb_style = style;
        self
    }

    /// Thumb extent in track cells: proportional to the visible share,
    /// never shorter than one cell.
    fn thumb_extent(&self, track: usize) -> (usize, usize) {
        let model = self.model;
        if model.length == 0 || model.length <= model.viewport {
            return (0, track);
        }
        let size = ((model.viewport * track) / model.length).max(1);
        let max_top = track - size;
        let top = if model.max_position() == 0 {
            0
        } else {
            model.position * max_top / model.max_position()
        };
        (top, size)
    }
}

impl Widget for ScrollbarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let track = area.height as usize;
        let (top, size) = self.thumb_extent(track);
        let x = area.x + area.width - 1;
        for row in 0..track {
            let (symbol, style) = if row >= top && row < top + size {
                ("█", self.thumb_style)
            } else {
                ("│", self.track_style)
            };
            buf[(x, area.y + row as u16)].set_symbol(symbol).set_style(style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(length: usize, viewport: usize) -> Scrollbar {
        let mut bar = Scrollbar::new();
        bar.set_length(length);
        bar.set_viewport(viewport);
        bar
    }

    #[test]
    fn position_clamps_to_scrollable_range() {
        let mut bar = bar(1_000, 300);
        bar.set_position(5_000);
        assert_eq!(bar.position(), 700);
    }

    #[test]
    fn shrinking_length_re_clamps_position() {
        let mut bar = bar(1_000, 300);
        bar.set_position(700);
        bar.set_length(400);
        assert_eq!(bar.position(), 100);
    }

    #[test]
    fn host_scroll_reports_edges() {
        let mut bar = bar(1_000, 300);

        let ev = bar.scroll_to(700).unwrap();
        assert!(ev.is_bottom);
        assert!(!ev.is_top);

        let ev = bar.scroll_to(0).unwrap();
        assert!(ev.is_top);
        assert_eq!(ev.position, 0);
    }

    #[test]
    fn host_scroll_to_same_position_emits_nothing() {
        let mut bar = bar(1_000, 300);
        bar.set_position(100);
        assert!(bar.scroll_to(100).is_none());
    }

    #[test]
    fn malformed_attribute_keeps_previous_value() {
        let mut bar = bar(1_000, 300);
        bar.set_position(50);

        bar.set_length_attr("not-a-number");
        bar.set_position_attr("NaN");

        assert_eq!(bar.length(), 1_000);
        assert_eq!(bar.position(), 50);

        bar.set_position_attr("120");
        assert_eq!(bar.position(), 120);
    }

    #[test]
    fn thumb_fills_track_when_content_fits() {
        let bar = bar(200, 300);
        let widget = ScrollbarWidget::new(&bar);
        assert_eq!(widget.thumb_extent(10), (0, 10));
    }

    #[test]
    fn thumb_is_proportional_and_reaches_the_bottom() {
        let mut bar = bar(1_000, 250);
        let widget = ScrollbarWidget::new(&bar);
        let (top, size) = widget.thumb_extent(20);
        assert_eq!((top, size), (0, 5));

        bar.set_position(750);
        let widget = ScrollbarWidget::new(&bar);
        let (top, size) = widget.thumb_extent(20);
        assert_eq!(top + size, 20);
    }
}
