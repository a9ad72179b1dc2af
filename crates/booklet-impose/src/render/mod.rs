//! PDF rendering modules for imposition
//!
//! This module handles all PDF-specific operations:
//! - The reader/writer interfaces the emitter drives
//! - Creating Form XObjects from source pages
//! - Generating placement operators
//! - Deep copying PDF objects

mod document;
mod page;
mod xobject;

pub use document::*;
pub use page::placement_operators;
pub use xobject::{copy_object_deep, get_page_box, get_page_content, get_page_resources};
