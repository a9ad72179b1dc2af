//! Layout data types for imposition
//!
//! These types represent the intermediate layout calculations between
//! slot planning and PDF rendering.

use crate::transform::Transform;

use super::Matrix;

/// One entry of the layout plan: the source pages that share one output sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetSlot {
    /// Booklet (left, right) or Calendar (top, bottom); `None` marks a blank position
    Pair(Option<usize>, Option<usize>),
    /// Single mode: one source page
    Single(usize),
}

impl SheetSlot {
    /// The slot's members as a (primary, secondary) pair
    pub fn pages(&self) -> (Option<usize>, Option<usize>) {
        match *self {
            SheetSlot::Pair(a, b) => (a, b),
            SheetSlot::Single(a) => (Some(a), None),
        }
    }
}

/// What occupies one position on a sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotEntry {
    /// A source page to place
    Page(usize),
    /// Nothing: padding or an unpaired last page
    Blank,
}

/// A rectangular area in points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f64,
    /// Y position (bottom edge)
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build from corner coordinates, normalizing swapped corners
    pub fn from_corners(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::new(x0.min(x1), y0.min(y1), (x1 - x0).abs(), (y1 - y0).abs())
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Top edge y coordinate
    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    /// Center x coordinate
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Center y coordinate
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn contains_point(&self, x: f64, y: f64, tolerance: f64) -> bool {
        x >= self.x - tolerance
            && x <= self.right() + tolerance
            && y >= self.y - tolerance
            && y <= self.top() + tolerance
    }

    /// True when the two rectangles share interior area (touching edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right() && other.x < self.right() && self.y < other.top() && other.y < self.top()
    }
}

/// Final placement of a source page on the output sheet
///
/// This is the result of all layout calculations and contains
/// everything needed to render the page, either as vector content
/// or as a raster preview.
#[derive(Debug, Clone, PartialEq)]
pub struct PagePlacement {
    /// Source page index
    pub source_page: usize,
    /// Slot rectangle on the sheet; drawing is clipped to it
    pub target: Rect,
    /// Source page box (MediaBox) in the source's own coordinates
    pub source_box: Rect,
    /// Aspect-preserving fit scale, before user scaling
    pub base_scale: f64,
    /// Resolved transform for this page
    pub transform: Transform,
    /// Rotation actually used in the matrix, after mirror handedness flips
    pub effective_rotation_deg: f64,
    /// Source space to sheet space, already snapped
    pub matrix: Matrix,
}

/// Placements computed for one sheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetPlacements {
    pub placements: Vec<PagePlacement>,
    /// Positions left empty by the plan
    pub blank_slots: usize,
    /// Page indices named by the plan that the source does not have
    pub out_of_range: Vec<usize>,
}
