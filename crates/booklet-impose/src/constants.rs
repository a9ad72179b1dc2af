//! Shared constants for booklet imposition
//!
//! This module centralizes magic numbers and constants used throughout
//! the imposition process.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f64 = 72.0 / 25.4;

/// Points per inch
pub const POINTS_PER_INCH: f64 = 72.0;

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f64) -> f64 {
    mm * POINTS_PER_MM
}

// =============================================================================
// Default Page Dimensions
// =============================================================================

/// Default page width in points (A4: 210mm)
pub const DEFAULT_PAGE_WIDTH_PT: f64 = 210.0 * POINTS_PER_MM;

/// Default page height in points (A4: 297mm)
pub const DEFAULT_PAGE_HEIGHT_PT: f64 = 297.0 * POINTS_PER_MM;

/// Default page dimensions as tuple (width, height)
pub const DEFAULT_PAGE_DIMENSIONS: (f64, f64) = (DEFAULT_PAGE_WIDTH_PT, DEFAULT_PAGE_HEIGHT_PT);

// =============================================================================
// Matrix Cleanup
// =============================================================================

/// Coefficients closer than this to -1, 0 or 1 are snapped to the exact value
pub const MATRIX_SNAP_EPSILON: f64 = 1e-10;

// =============================================================================
// Progress Milestones
// =============================================================================

/// Percentage reported once the output document is set up
pub const PROGRESS_PREPARED: u8 = 5;

/// Share of the progress bar spent assembling sheets
pub const PROGRESS_SHEETS_SPAN: u8 = 90;

/// Percentage reported before serialization
pub const PROGRESS_WRITING: u8 = 95;

/// Percentage reported on completion
pub const PROGRESS_DONE: u8 = 100;
