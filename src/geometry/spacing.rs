//! Inter-pane spacing derived from the margin style and UI scale.

use crate::config::MarginStyle;

/// Base row unit in pixels at 100% UI scale.
const UNIT_HEIGHT_PX: usize = 12;

/// Smallest usable root unit.
const MIN_UNIT_PX: usize = 5;

/// Root spacing unit for a given UI scale percentage.
pub fn root_unit(ui_scale_percent: usize) -> usize {
    (UNIT_HEIGHT_PX * ui_scale_percent / 100).max(MIN_UNIT_PX)
}

/// Pixel gap between adjacent panes.
pub fn spacing_for(style: MarginStyle, ui_scale_percent: usize) -> usize {
    let unit = root_unit(ui_scale_percent);
    match style {
        MarginStyle::None => 0,
        MarginStyle::Thin => unit / 2,
        MarginStyle::Normal => unit,
        MarginStyle::Thick => unit * 2,
    }
}
