//! Content-stream operators for placed pages

use crate::layout::{PagePlacement, format_number};

/// Generate the clip-then-transform-then-invoke sequence for one placement.
///
/// `q`, clip to the target rectangle (`re W n`), `q`, `cm`, `Do`, `Q Q`.
/// The outer save/restore scopes the clip to this placement only.
pub fn placement_operators(block_name: &str, placement: &PagePlacement) -> String {
    let rect = &placement.target;
    format!(
        "q\n{} {} {} {} re W n\nq\n{} cm\n/{} Do\nQ\nQ\n",
        format_number(rect.x),
        format_number(rect.y),
        format_number(rect.width),
        format_number(rect.height),
        placement.matrix.to_operands(),
        block_name
    )
}
