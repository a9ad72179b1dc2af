//! Layout calculation modules for imposition
//!
//! This module handles all the geometric calculations for page imposition:
//! - Slot planning (which source page lands on which sheet, in which slot)
//! - Sheet geometry (sheet size per mode, slot rectangles)
//! - Content placement (fit scale, user transform, coordinate matrix)

mod matrix;
mod placement;
mod plan;
mod sheet;
mod types;

pub use matrix::*;
pub use placement::*;
pub use plan::*;
pub use sheet::*;
pub use types::*;
