//! Content placement within slot rectangles
//!
//! `place_page` is the single source of truth for where a page ends up.
//! Both the vector emitter and the raster preview derive their matrices
//! from it, so they cannot disagree on shift direction or on the order in
//! which mirror, rotation and scale apply.

use crate::constants::mm_to_pt;
use crate::transform::{Transform, TransformStore};

use super::{LayoutPlan, Matrix, PagePlacement, Rect, SheetPlacements, SlotEntry, slot_targets};

/// Calculate the placement of one source page inside a target rectangle.
///
/// The matrix is built as:
/// 1. translate the source box center to the origin
/// 2. scale by fit scale × user scale, negated per active mirror
/// 3. rotate clockwise by the effective angle (the user angle, negated once
///    per active mirror since each mirror flips handedness)
/// 4. translate to the target center plus the shift
///
/// # Arguments
/// * `source_page` - Source page index
/// * `target` - Slot rectangle on the sheet
/// * `source_box` - The source page's MediaBox
/// * `transform` - Resolved transform for the page
pub fn place_page(
    source_page: usize,
    target: &Rect,
    source_box: &Rect,
    transform: &Transform,
) -> PagePlacement {
    let base_scale = fit_scale(source_box.width, source_box.height, target.width, target.height);

    let mut scale_x = base_scale * transform.h_factor();
    let mut scale_y = base_scale * transform.v_factor();
    let mut rotation = transform.rotation_deg;

    if transform.h_mirror {
        scale_x = -scale_x;
        rotation = -rotation;
    }
    if transform.v_mirror {
        scale_y = -scale_y;
        rotation = -rotation;
    }

    let shift_x = mm_to_pt(transform.h_shift_mm);
    let shift_y = mm_to_pt(transform.v_shift_mm);

    let matrix = Matrix::translate(-source_box.center_x(), -source_box.center_y())
        .then(&Matrix::scale(scale_x, scale_y))
        .then(&Matrix::rotate_degrees(-rotation))
        .then(&Matrix::translate(
            target.center_x() + shift_x,
            target.center_y() + shift_y,
        ))
        .snapped();

    PagePlacement {
        source_page,
        target: *target,
        source_box: *source_box,
        base_scale,
        transform: *transform,
        effective_rotation_deg: rotation,
        matrix,
    }
}

/// Calculate all placements for one sheet of a plan.
///
/// Blank entries are counted, page indices beyond `page_boxes` are
/// reported as out of range; neither stops the sheet.
///
/// # Arguments
/// * `plan` - The layout plan
/// * `sheet_index` - Position in the plan's slot list
/// * `sheet_size` - Sheet (width, height) in points
/// * `page_boxes` - MediaBox of every source page
/// * `store` - Transform store snapshot
pub fn calculate_sheet_placements(
    plan: &LayoutPlan,
    sheet_index: usize,
    sheet_size: (f64, f64),
    page_boxes: &[Rect],
    store: &TransformStore,
) -> SheetPlacements {
    let targets = slot_targets(plan.mode(), sheet_size.0, sheet_size.1);
    let mut result = SheetPlacements::default();

    for (entry, target) in plan.entries(sheet_index).into_iter().zip(targets.iter()) {
        match entry {
            SlotEntry::Blank => result.blank_slots += 1,
            SlotEntry::Page(page) => match page_boxes.get(page) {
                Some(source_box) => {
                    let transform = store.resolve(page);
                    result
                        .placements
                        .push(place_page(page, target, source_box, &transform));
                }
                None => result.out_of_range.push(page),
            },
        }
    }

    result
}

/// Aspect-preserving scale that fits the source inside the target
fn fit_scale(src_width: f64, src_height: f64, target_width: f64, target_height: f64) -> f64 {
    let scale = (target_width / src_width).min(target_height / src_height);
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}
