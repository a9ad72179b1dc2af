//! Sheet geometry
//!
//! Output sheets are sized from a single-page size: Booklet doubles the
//! width, Calendar doubles the height, Single keeps it. Each sheet is then
//! split into one target rectangle per slot.

use crate::types::Mode;

use super::Rect;

/// Sheet dimensions (width, height) in points for a single-page size
pub fn sheet_dimensions(mode: Mode, page_width_pt: f64, page_height_pt: f64) -> (f64, f64) {
    match mode {
        Mode::Booklet => (page_width_pt * 2.0, page_height_pt),
        Mode::Calendar => (page_width_pt, page_height_pt * 2.0),
        Mode::Single => (page_width_pt, page_height_pt),
    }
}

/// Target rectangles for a sheet, in slot order.
///
/// - Booklet: left half, then right half
/// - Calendar: top half (higher y), then bottom half
/// - Single: the whole sheet
pub fn slot_targets(mode: Mode, sheet_width_pt: f64, sheet_height_pt: f64) -> Vec<Rect> {
    match mode {
        Mode::Booklet => {
            let half = sheet_width_pt / 2.0;
            vec![
                Rect::new(0.0, 0.0, half, sheet_height_pt),
                Rect::new(half, 0.0, sheet_width_pt - half, sheet_height_pt),
            ]
        }
        Mode::Calendar => {
            let half = sheet_height_pt / 2.0;
            vec![
                Rect::new(0.0, half, sheet_width_pt, sheet_height_pt - half),
                Rect::new(0.0, 0.0, sheet_width_pt, half),
            ]
        }
        Mode::Single => vec![Rect::new(0.0, 0.0, sheet_width_pt, sheet_height_pt)],
    }
}
