use crate::layout::LayoutPlan;
use crate::types::*;

/// Calculate statistics for the imposition
pub fn calculate_statistics(source_pages: usize, mode: Mode) -> Result<ImpositionStatistics> {
    if source_pages == 0 {
        return Err(ImposeError::NoPages);
    }

    let plan = LayoutPlan::new(source_pages, mode);
    let output_pages = plan.len();

    let (output_sheets, blank_pages_added) = match mode {
        // Front and back of one folded sheet are two output pages
        Mode::Booklet => (plan.padded_page_count() / 4, plan.padding_needed()),
        Mode::Calendar => (output_pages, source_pages % 2),
        Mode::Single => (output_pages, 0),
    };

    Ok(ImpositionStatistics {
        source_pages,
        output_pages,
        output_sheets,
        blank_pages_added,
    })
}
