mod logger;

use anyhow::Result;
use booklet_impose::{
    BookletOptions, LayoutPlan, Mode, OutputSize, ProgressUpdate, SkipReason, SlotEntry,
    Transform, TransformStore,
};
use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use logger::StderrLogger;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "booklet", about = "Booklet, calendar and single-page PDF imposition", version)]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Impose a PDF onto output sheets
    Impose {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Layout mode: booklet, calendar or single
        #[arg(long)]
        mode: Option<String>,

        /// Output paper size (per page, before doubling)
        #[arg(long, value_enum)]
        paper: Option<PaperArg>,

        /// Custom page width
        #[arg(long, requires = "height", conflicts_with = "paper")]
        width: Option<f64>,

        /// Custom page height
        #[arg(long, requires = "width")]
        height: Option<f64>,

        /// Unit for --width and --height
        #[arg(long, value_enum, default_value = "mm")]
        unit: UnitArg,

        /// Output orientation
        #[arg(long, value_enum)]
        orientation: Option<OrientationArg>,

        /// Options file (JSON); command-line flags take precedence
        #[arg(long)]
        config: Option<PathBuf>,

        /// Transform store file (JSON)
        #[arg(long)]
        transforms: Option<PathBuf>,

        /// Horizontal shift in mm (positive = right)
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        shift_x: f64,

        /// Vertical shift in mm (positive = up)
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        shift_y: f64,

        /// Uniform scale in percent
        #[arg(long, default_value = "100")]
        scale: f64,

        /// Rotation in degrees (positive = clockwise)
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        rotate: f64,

        /// Mirror horizontally
        #[arg(long)]
        mirror_h: bool,

        /// Mirror vertically
        #[arg(long)]
        mirror_v: bool,

        /// Show statistics only, don't generate PDF
        #[arg(long)]
        stats_only: bool,
    },

    /// Print the slot plan for a page count
    Plan {
        /// Number of source pages
        #[arg(long)]
        pages: usize,

        /// Layout mode: booklet, calendar or single
        #[arg(long, default_value = "booklet")]
        mode: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    Automatic,
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
}

#[derive(Clone, Copy, ValueEnum)]
enum UnitArg {
    Mm,
    In,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

impl From<PaperArg> for OutputSize {
    fn from(arg: PaperArg) -> Self {
        use booklet_impose::PaperSize;
        match arg {
            PaperArg::Automatic => Self::Automatic,
            PaperArg::A3 => Self::Paper(PaperSize::A3),
            PaperArg::A4 => Self::Paper(PaperSize::A4),
            PaperArg::A5 => Self::Paper(PaperSize::A5),
            PaperArg::Letter => Self::Paper(PaperSize::Letter),
            PaperArg::Legal => Self::Paper(PaperSize::Legal),
            PaperArg::Tabloid => Self::Paper(PaperSize::Tabloid),
        }
    }
}

impl From<UnitArg> for booklet_impose::Unit {
    fn from(arg: UnitArg) -> Self {
        match arg {
            UnitArg::Mm => Self::Millimeters,
            UnitArg::In => Self::Inches,
        }
    }
}

impl From<OrientationArg> for booklet_impose::Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Self::Portrait,
            OrientationArg::Landscape => Self::Landscape,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else if cli.quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };
    StderrLogger::new(level).init()?;

    match cli.command {
        Commands::Impose {
            input,
            output,
            mode,
            paper,
            width,
            height,
            unit,
            orientation,
            config,
            transforms,
            shift_x,
            shift_y,
            scale,
            rotate,
            mirror_h,
            mirror_v,
            stats_only,
        } => {
            // Mode errors surface before any file is touched
            let mode: Option<Mode> = mode.map(|m| m.parse()).transpose()?;

            let mut options = match &config {
                Some(path) => BookletOptions::load(path).await?,
                None => BookletOptions::default(),
            };
            if let Some(mode) = mode {
                options.mode = mode;
            }
            if let Some(paper) = paper {
                options.output_size = paper.into();
            }
            if let (Some(width), Some(height)) = (width, height) {
                options.output_size = OutputSize::Custom {
                    width,
                    height,
                    unit: unit.into(),
                };
            }
            if let Some(orientation) = orientation {
                options.orientation = orientation.into();
            }
            options.validate()?;

            let mut store = match &transforms {
                Some(path) => TransformStore::load(path).await?,
                None => TransformStore::default(),
            };
            let flags = Transform {
                h_shift_mm: shift_x,
                v_shift_mm: shift_y,
                scale_percent: scale,
                rotation_deg: rotate,
                h_mirror: mirror_h,
                v_mirror: mirror_v,
                ..Transform::IDENTITY
            };
            store.set_default(store.default_transform().compose(&flags));

            if stats_only {
                let document = booklet_impose::load_pdf(&input).await?;
                let stats =
                    booklet_impose::calculate_statistics(document.get_pages().len(), options.mode)?;
                println!("Imposition Statistics:");
                println!("  Mode: {}", options.mode);
                println!("  Source pages: {}", stats.source_pages);
                println!("  Output pages: {}", stats.output_pages);
                println!("  Output sheets: {}", stats.output_sheets);
                println!("  Blank pages added: {}", stats.blank_pages_added);
                return Ok(());
            }

            let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<ProgressUpdate>();
            let printer = tokio::spawn(async move {
                while let Some(update) = rx.recv().await {
                    eprintln!("[{:>3}%] {}", update.percent, update.message);
                }
            });

            let result = booklet_impose::save_booklet(&input, &output, &options, store, tx).await;
            // Drain remaining updates
            printer.await?;
            let report = result?;

            println!(
                "Imposed {} sheets ({} pages placed, {} blank slots) -> {}",
                report.sheets,
                report.placements,
                report.blank_slots,
                output.display()
            );
            for skipped in &report.skipped {
                let reason = match skipped.reason {
                    SkipReason::OutOfRange => "not in source",
                    SkipReason::MissingContent => "no content",
                };
                println!(
                    "  skipped page {} on sheet {}: {}",
                    skipped.source_page + 1,
                    skipped.sheet_index + 1,
                    reason
                );
            }
        }

        Commands::Plan { pages, mode } => {
            let mode: Mode = mode.parse()?;
            let plan = LayoutPlan::new(pages, mode);

            println!("{} pages, {} mode: {} slots", pages, mode, plan.len());
            for index in 0..plan.len() {
                let entries: Vec<String> = plan
                    .entries(index)
                    .into_iter()
                    .map(|entry| match entry {
                        SlotEntry::Page(page) => (page + 1).to_string(),
                        SlotEntry::Blank => "-".to_string(),
                    })
                    .collect();
                println!("  {:>3}: {}", index + 1, entries.join(" | "));
            }
        }
    }

    Ok(())
}
