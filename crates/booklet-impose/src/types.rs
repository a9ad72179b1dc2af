use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImposeError {
    #[error("Planning error: {0}")]
    Planning(String),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("No pages to impose")]
    NoPages,
}

pub type Result<T> = std::result::Result<T, ImposeError>;

/// Imposition mode
///
/// Fixed for the lifetime of one layout. Decides whether a sheet holds a
/// pair of pages or a single page, and which sheet axis is doubled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    /// Two pages side by side, ordered for folding and saddle binding
    #[default]
    Booklet,
    /// Two pages stacked top and bottom, in reading order
    Calendar,
    /// One page per sheet
    Single,
}

impl Mode {
    /// Number of slots on each output sheet
    pub fn slots_per_sheet(self) -> usize {
        match self {
            Mode::Booklet | Mode::Calendar => 2,
            Mode::Single => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Booklet => "booklet",
            Mode::Calendar => "calendar",
            Mode::Single => "single",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = ImposeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "booklet" => Ok(Mode::Booklet),
            "calendar" => Ok(Mode::Calendar),
            "single" => Ok(Mode::Single),
            other => Err(ImposeError::Planning(format!(
                "unsupported mode '{}' (expected booklet, calendar or single)",
                other
            ))),
        }
    }
}

/// Paper orientation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Portrait: height > width (default for most paper sizes)
    #[default]
    Portrait,
    /// Landscape: width > height
    Landscape,
}

/// Standard paper sizes
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PaperSize {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
}

impl PaperSize {
    /// Get base dimensions (always portrait: width < height)
    pub fn dimensions_mm(self) -> (f64, f64) {
        match self {
            PaperSize::A3 => (297.0, 420.0),
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::A5 => (148.0, 210.0),
            PaperSize::Letter => (215.9, 279.4),
            PaperSize::Legal => (215.9, 355.6),
            PaperSize::Tabloid => (279.4, 431.8),
        }
    }

    /// Get dimensions with orientation applied
    pub fn dimensions_with_orientation(self, orientation: Orientation) -> (f64, f64) {
        let (w, h) = self.dimensions_mm();
        match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

/// Length unit for custom output sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Unit {
    #[default]
    Millimeters,
    Inches,
}

/// Statistics about the imposition
#[derive(Debug, Clone, PartialEq)]
pub struct ImpositionStatistics {
    /// Total number of source pages
    pub source_pages: usize,
    /// Number of output pages (one per layout slot)
    pub output_pages: usize,
    /// Number of physical sheets of paper (duplex booklet sheets carry two output pages)
    pub output_sheets: usize,
    /// Number of blank pages added for padding
    pub blank_pages_added: usize,
}

/// Why a placement was left off its sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The page index does not exist in the source document
    OutOfRange,
    /// The source page has no content stream
    MissingContent,
}

/// A placement that was omitted while the pass carried on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedPlacement {
    pub sheet_index: usize,
    pub source_page: usize,
    pub reason: SkipReason,
}

/// Outcome of one emission pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmitReport {
    /// Output sheets written
    pub sheets: usize,
    /// Source pages actually placed
    pub placements: usize,
    /// Slots left empty for padding or an unpaired last page
    pub blank_slots: usize,
    /// Placements dropped because of a source problem
    pub skipped: Vec<SkippedPlacement>,
}

impl EmitReport {
    /// True when every non-blank slot received its page
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}
