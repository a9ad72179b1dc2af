//! PDF imposition - arranging pages onto booklet, calendar or single sheets
//!
//! This module orchestrates the imposition process:
//! 1. Load the source document
//! 2. Plan which page lands in which slot
//! 3. Place each page with its resolved transform
//! 4. Emit sheets as Form XObject placements and serialize the output

mod io;
mod sheet;

pub use io::{decode_pdf, encode_pdf, load_pdf, save_pdf};

use crate::constants::*;
use crate::layout::{LayoutPlan, Rect};
use crate::options::BookletOptions;
use crate::progress::ProgressSink;
use crate::render::{LopdfSource, LopdfWriter, PageSource, SheetSink};
use crate::transform::TransformStore;
use crate::types::*;
use lopdf::Document;
use std::path::Path;

pub(crate) use sheet::emit_sheet;

/// Result of an imposition pass
#[derive(Debug)]
pub struct Imposed {
    pub document: Document,
    pub report: EmitReport,
}

/// Emit every sheet of `plan` from `source` into `writer`.
///
/// Progress runs from 5% to 95% in per-sheet steps. A failing writer aborts
/// the pass; unplaceable pages are skipped and listed in the report.
///
/// # Arguments
/// * `source` - Source document pages
/// * `writer` - Output sheet sink
/// * `plan` - Slot list to emit
/// * `sheet_size` - Sheet (width, height) in points
/// * `store` - Transform snapshot for this pass, bound to the source's page count
/// * `progress` - Progress receiver
pub fn emit<S, W>(
    source: &S,
    writer: &mut W,
    plan: &LayoutPlan,
    sheet_size: (f64, f64),
    store: &TransformStore,
    progress: &mut dyn ProgressSink,
) -> Result<EmitReport>
where
    S: PageSource,
    W: SheetSink<Resources = S::Resources>,
{
    progress.report(PROGRESS_PREPARED, "Preparing pages");

    let page_boxes: Vec<Rect> = (0..source.page_count())
        .map_while(|i| source.page_box(i))
        .collect();
    let store = store.snapshot(page_boxes.len());

    log::info!(
        "Imposing {} source pages onto {} {} sheets ({:.1} x {:.1} pt)",
        page_boxes.len(),
        plan.len(),
        plan.mode(),
        sheet_size.0,
        sheet_size.1
    );

    let total = plan.len();
    let mut report = EmitReport::default();

    for sheet_index in 0..total {
        log::debug!("Emitting sheet {} of {}", sheet_index + 1, total);
        emit_sheet(
            source,
            writer,
            plan,
            sheet_index,
            sheet_size,
            &page_boxes,
            &store,
            &mut report,
        )?;

        let percent = PROGRESS_PREPARED as usize
            + (sheet_index + 1) * PROGRESS_SHEETS_SPAN as usize / total;
        progress.report(
            percent as u8,
            &format!("Sheet {} of {}", sheet_index + 1, total),
        );
    }

    log::info!(
        "Emitted {} sheets: {} placements, {} blank slots, {} skipped",
        report.sheets,
        report.placements,
        report.blank_slots,
        report.skipped.len()
    );

    Ok(report)
}

/// Main imposition function
///
/// Runs on a blocking worker with its own snapshot of `store`.
pub async fn impose<P>(
    source: &Document,
    options: &BookletOptions,
    store: &TransformStore,
    mut progress: P,
) -> Result<Imposed>
where
    P: ProgressSink + 'static,
{
    options.validate()?;

    let source = source.clone();
    let options = options.clone();
    let store = store.clone();

    tokio::task::spawn_blocking(move || impose_sync(&source, &options, &store, &mut progress))
        .await?
}

/// Load, impose and save in one pass
///
/// `store` is taken by value: the pass owns the snapshot it reads.
pub async fn save_booklet<P>(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &BookletOptions,
    store: TransformStore,
    mut progress: P,
) -> Result<EmitReport>
where
    P: ProgressSink + 'static,
{
    options.validate()?;

    progress.report(0, "Loading document");
    let source = load_pdf(input).await?;

    let options = options.clone();
    let (imposed, mut progress) = tokio::task::spawn_blocking(move || {
        let imposed = impose_sync(&source, &options, &store, &mut progress)?;
        Ok::<_, ImposeError>((imposed, progress))
    })
    .await??;

    progress.report(PROGRESS_WRITING, "Writing document");
    save_pdf(imposed.document, output).await?;
    progress.report(PROGRESS_DONE, "Complete");

    Ok(imposed.report)
}

pub(crate) fn impose_sync(
    source: &Document,
    options: &BookletOptions,
    store: &TransformStore,
    progress: &mut dyn ProgressSink,
) -> Result<Imposed> {
    let reader = LopdfSource::new(source);
    let page_count = reader.page_count();
    if page_count == 0 {
        return Err(ImposeError::NoPages);
    }

    let plan = LayoutPlan::new(page_count, options.mode);
    let sheet_size = sheet_size_for(&reader, options);

    let mut writer = LopdfWriter::new(source);
    let report = emit(&reader, &mut writer, &plan, sheet_size, store, progress)?;

    Ok(Imposed {
        document: writer.finish(),
        report,
    })
}

/// Sheet size for `options`, taking the automatic size from the first page
pub(crate) fn sheet_size_for<S: PageSource>(source: &S, options: &BookletOptions) -> (f64, f64) {
    let (width, height) = source
        .page_box(0)
        .map(|b| (b.width, b.height))
        .unwrap_or(DEFAULT_PAGE_DIMENSIONS);
    options.sheet_size_pt(width, height)
}
