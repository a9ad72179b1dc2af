//! Single-sheet previews
//!
//! Previews share `place_page` with the full save path, so what a raster
//! preview shows is exactly what gets written.

use crate::impose::{Imposed, emit_sheet, sheet_size_for};
use crate::layout::{LayoutPlan, Matrix, Rect, SheetPlacements, calculate_sheet_placements};
use crate::options::BookletOptions;
use crate::render::{LopdfSource, LopdfWriter, PageSource};
use crate::transform::TransformStore;
use crate::types::*;
use lopdf::Document;

/// Generate a one-sheet document for the given layout position.
///
/// A position past the end of the plan renders as an empty sheet.
pub fn generate_preview(
    source: &Document,
    options: &BookletOptions,
    store: &TransformStore,
    sheet_index: usize,
) -> Result<Imposed> {
    options.validate()?;

    let reader = LopdfSource::new(source);
    let plan = LayoutPlan::new(reader.page_count(), options.mode);
    let sheet_size = sheet_size_for(&reader, options);
    let page_boxes = reader.page_boxes();
    let store = store.snapshot(page_boxes.len());

    let mut writer = LopdfWriter::new(source);
    let mut report = EmitReport::default();
    emit_sheet(
        &reader,
        &mut writer,
        &plan,
        sheet_index,
        sheet_size,
        &page_boxes,
        &store,
        &mut report,
    )?;

    Ok(Imposed {
        document: writer.finish(),
        report,
    })
}

/// Placements of one sheet, for compositing a raster preview
///
/// Returns the sheet size in points alongside the placements.
pub fn sheet_placements(
    source: &Document,
    options: &BookletOptions,
    store: &TransformStore,
    sheet_index: usize,
) -> ((f64, f64), SheetPlacements) {
    let reader = LopdfSource::new(source);
    let plan = LayoutPlan::new(reader.page_count(), options.mode);
    let sheet_size = sheet_size_for(&reader, options);
    let page_boxes: Vec<Rect> = reader.page_boxes();
    let store = store.snapshot(page_boxes.len());
    let placements =
        calculate_sheet_placements(&plan, sheet_index, sheet_size, &page_boxes, &store);
    (sheet_size, placements)
}

/// Map a placement matrix into raster pixel space.
///
/// Raster images grow downward, so the sheet-space matrix is followed by a
/// flip about the sheet's height and a scale to pixels. A positive vertical
/// shift therefore still moves content up in the image.
pub fn raster_matrix(ctm: &Matrix, sheet_height_pt: f64, pixels_per_point: f64) -> Matrix {
    let to_device = Matrix::translate(0.0, -sheet_height_pt)
        .then(&Matrix::scale(pixels_per_point, -pixels_per_point));
    ctm.then(&to_device)
}
