use crate::constants::{POINTS_PER_INCH, mm_to_pt};
use crate::layout::sheet_dimensions;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Output page size for a single imposed page (before the mode doubles it)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OutputSize {
    /// Same as the source's first page, rotated to the requested orientation
    #[default]
    Automatic,
    /// A standard paper size
    Paper(PaperSize),
    /// Explicit dimensions; orientation is not applied
    Custom { width: f64, height: f64, unit: Unit },
}

/// Booklet configuration
///
/// Owned and persisted by the caller; the imposition code only reads it.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BookletOptions {
    pub mode: Mode,
    pub output_size: OutputSize,
    pub orientation: Orientation,
}

impl BookletOptions {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| ImposeError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ImposeError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if let OutputSize::Custom { width, height, .. } = self.output_size {
            let valid = |v: f64| v.is_finite() && v > 0.0;
            if !valid(width) || !valid(height) {
                return Err(ImposeError::Config(format!(
                    "Custom output size must be positive, got {} x {}",
                    width, height
                )));
            }
        }
        Ok(())
    }

    /// Single-page output size in points, given the source's page size
    pub fn page_size_pt(&self, source_width_pt: f64, source_height_pt: f64) -> (f64, f64) {
        match self.output_size {
            OutputSize::Automatic => {
                let source_is_portrait = source_height_pt > source_width_pt;
                let wants_portrait = self.orientation == Orientation::Portrait;
                if source_is_portrait == wants_portrait {
                    (source_width_pt, source_height_pt)
                } else {
                    (source_height_pt, source_width_pt)
                }
            }
            OutputSize::Paper(paper) => {
                let (w, h) = paper.dimensions_with_orientation(self.orientation);
                (mm_to_pt(w), mm_to_pt(h))
            }
            OutputSize::Custom {
                width,
                height,
                unit,
            } => match unit {
                Unit::Millimeters => (mm_to_pt(width), mm_to_pt(height)),
                Unit::Inches => (width * POINTS_PER_INCH, height * POINTS_PER_INCH),
            },
        }
    }

    /// Full sheet size in points: the page size doubled along the mode's axis
    pub fn sheet_size_pt(&self, source_width_pt: f64, source_height_pt: f64) -> (f64, f64) {
        let (w, h) = self.page_size_pt(source_width_pt, source_height_pt);
        sheet_dimensions(self.mode, w, h)
    }
}
