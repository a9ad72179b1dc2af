//! Slot planning
//!
//! This module decides which source pages land on which output sheet.
//! It is a pure function of the page count and the mode.
//!
//! ## Booklet (saddle-stitch signature order)
//!
//! The page count is padded to a multiple of 4. For every physical sheet
//! `i` two output pages are emitted, front then back:
//!
//! - Front: `[padded - 1 - 2i, 2i]`
//! - Back: `[2i + 1, padded - 1 - (2i + 1)]`
//!
//! For 8 pages: `(8,1) (2,7) (6,3) (4,5)` in 1-based page numbers.
//!
//! ## Calendar
//!
//! Sequential top/bottom pairs: `(1,2) (3,4) ...`, the last bottom slot
//! left blank when the page count is odd.
//!
//! ## Single
//!
//! One page per sheet, in order.

use crate::types::Mode;

use super::{SheetSlot, SlotEntry};

/// Number of blank pages needed to pad `page_count` to a multiple of 4
pub fn booklet_padding(page_count: usize) -> usize {
    (4 - page_count % 4) % 4
}

/// Ordered slot list for one mode and page count
///
/// The index into the slot list is the output page's ordinal position.
/// A new plan replaces the old one whenever the mode or page count changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutPlan {
    mode: Mode,
    original_page_count: usize,
    slots: Vec<SheetSlot>,
}

impl LayoutPlan {
    pub fn new(original_page_count: usize, mode: Mode) -> Self {
        let slots = plan_layout(original_page_count, mode);
        Self {
            mode,
            original_page_count,
            slots,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn original_page_count(&self) -> usize {
        self.original_page_count
    }

    /// Pages added to reach a multiple of 4 (Booklet only)
    pub fn padding_needed(&self) -> usize {
        match self.mode {
            Mode::Booklet => booklet_padding(self.original_page_count),
            Mode::Calendar | Mode::Single => 0,
        }
    }

    pub fn padded_page_count(&self) -> usize {
        self.original_page_count + self.padding_needed()
    }

    pub fn slots(&self) -> &[SheetSlot] {
        &self.slots
    }

    /// Number of output pages
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Bounds-checked slot accessor; out of range yields the blank pair
    pub fn get_slot(&self, index: usize) -> (Option<usize>, Option<usize>) {
        self.slots
            .get(index)
            .map(SheetSlot::pages)
            .unwrap_or((None, None))
    }

    /// True for indices introduced by booklet padding
    pub fn is_blank(&self, page_index: usize) -> bool {
        page_index >= self.original_page_count
    }

    /// Slot members for one sheet, in the order of the sheet's target rectangles
    ///
    /// Out-of-range sheet indices produce blank entries.
    pub fn entries(&self, index: usize) -> Vec<SlotEntry> {
        let to_entry = |page: Option<usize>| match page {
            Some(p) if !self.is_blank(p) => SlotEntry::Page(p),
            _ => SlotEntry::Blank,
        };

        match self.slots.get(index) {
            Some(SheetSlot::Single(p)) => vec![to_entry(Some(*p))],
            Some(SheetSlot::Pair(a, b)) => vec![to_entry(*a), to_entry(*b)],
            None => vec![SlotEntry::Blank; self.mode.slots_per_sheet()],
        }
    }
}

/// Produce the ordered slot list for a page count and mode.
pub fn plan_layout(original_page_count: usize, mode: Mode) -> Vec<SheetSlot> {
    match mode {
        Mode::Booklet => booklet_slots(original_page_count),
        Mode::Calendar => calendar_slots(original_page_count),
        Mode::Single => (0..original_page_count).map(SheetSlot::Single).collect(),
    }
}

fn booklet_slots(page_count: usize) -> Vec<SheetSlot> {
    let padded = page_count + booklet_padding(page_count);
    let num_sheets = padded / 4;
    let mut slots = Vec::with_capacity(num_sheets * 2);

    for i in 0..num_sheets {
        // Front side
        slots.push(SheetSlot::Pair(Some(padded - 1 - 2 * i), Some(2 * i)));
        // Back side
        slots.push(SheetSlot::Pair(
            Some(2 * i + 1),
            Some(padded - 1 - (2 * i + 1)),
        ));
    }

    slots
}

fn calendar_slots(page_count: usize) -> Vec<SheetSlot> {
    (0..page_count)
        .step_by(2)
        .map(|top| {
            let bottom = (top + 1 < page_count).then_some(top + 1);
            SheetSlot::Pair(Some(top), bottom)
        })
        .collect()
}
