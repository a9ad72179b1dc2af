pub mod constants;
pub mod impose;
pub mod layout;
mod options;
pub mod preview;
mod progress;
pub mod render;
mod stats;
pub mod transform;
mod types;

pub use impose::{
    Imposed, decode_pdf, emit, encode_pdf, impose, load_pdf, save_booklet, save_pdf,
};
pub use layout::{LayoutPlan, PagePlacement, Rect, SheetSlot, SlotEntry, plan_layout};
pub use options::*;
pub use preview::generate_preview;
pub use progress::*;
pub use stats::calculate_statistics;
pub use transform::{Domain, Parity, Transform, TransformStore, resolve_transform};
pub use types::*;
