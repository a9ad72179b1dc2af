//! Sheet emission for imposition

use crate::layout::{LayoutPlan, Rect, calculate_sheet_placements};
use crate::render::{PageSource, SheetSink, placement_operators};
use crate::transform::TransformStore;
use crate::types::*;

/// Emit one sheet of the plan into `writer`.
///
/// Placements that cannot be drawn are recorded in `report` and left blank;
/// only writer failures are returned as errors.
#[allow(clippy::too_many_arguments)]
pub(crate) fn emit_sheet<S, W>(
    source: &S,
    writer: &mut W,
    plan: &LayoutPlan,
    sheet_index: usize,
    sheet_size: (f64, f64),
    page_boxes: &[Rect],
    store: &TransformStore,
    report: &mut EmitReport,
) -> Result<()>
where
    S: PageSource,
    W: SheetSink<Resources = S::Resources>,
{
    let (sheet_width, sheet_height) = sheet_size;
    let mut page = writer.create_blank_page(sheet_width, sheet_height);

    let sheet = calculate_sheet_placements(plan, sheet_index, sheet_size, page_boxes, store);
    report.blank_slots += sheet.blank_slots;

    for source_page in sheet.out_of_range {
        log::warn!(
            "Sheet {}: source page {} is out of range, leaving slot blank",
            sheet_index + 1,
            source_page + 1
        );
        report.skipped.push(SkippedPlacement {
            sheet_index,
            source_page,
            reason: SkipReason::OutOfRange,
        });
    }

    for placement in &sheet.placements {
        let Some(content) = source.page_content(placement.source_page) else {
            log::warn!(
                "Sheet {}: source page {} has no content, leaving slot blank",
                sheet_index + 1,
                placement.source_page + 1
            );
            report.skipped.push(SkippedPlacement {
                sheet_index,
                source_page: placement.source_page,
                reason: SkipReason::MissingContent,
            });
            continue;
        };

        let resources = source.page_resources(placement.source_page);
        let name = writer.register_block(&mut page, &placement.source_box, resources, content)?;
        let ops = placement_operators(&name, placement);
        writer.append_content(&mut page, ops.as_bytes());

        log::debug!(
            "Sheet {}: page {} as /{} scale {:.4} rotation {}",
            sheet_index + 1,
            placement.source_page + 1,
            name,
            placement.base_scale,
            placement.effective_rotation_deg
        );
        report.placements += 1;
    }

    writer.add_page(page)?;
    report.sheets += 1;
    Ok(())
}
