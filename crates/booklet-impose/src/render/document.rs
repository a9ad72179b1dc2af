//! Narrow document reader/writer interfaces and their lopdf backends
//!
//! The emitter only ever talks to `PageSource` and `SheetSink`. Dictionary
//! plumbing stays in this module.

use crate::layout::Rect;
use crate::types::Result;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

use super::xobject::{
    copy_object_deep, form_xobject, get_page_box, get_page_content, get_page_resources,
};

// =============================================================================
// Interfaces
// =============================================================================

/// Read access to the pages of a source document
pub trait PageSource {
    /// Opaque per-page resource set
    type Resources;

    fn page_count(&self) -> usize;

    /// Page box in points, `None` for out-of-range indices
    fn page_box(&self, index: usize) -> Option<Rect>;

    /// Decoded content stream bytes, `None` when the page has none
    fn page_content(&self, index: usize) -> Option<Vec<u8>>;

    fn page_resources(&self, index: usize) -> Option<Self::Resources>;
}

/// Construction of output sheets
pub trait SheetSink {
    /// Resource sets this sink can attach to reusable blocks
    type Resources;
    /// A sheet under construction
    type Page;

    fn create_blank_page(&mut self, width_pt: f64, height_pt: f64) -> Self::Page;

    /// Register page content as a reusable block on `page`, returning its
    /// unique resource name on that page
    fn register_block(
        &mut self,
        page: &mut Self::Page,
        bbox: &Rect,
        resources: Option<Self::Resources>,
        content: Vec<u8>,
    ) -> Result<String>;

    fn append_content(&mut self, page: &mut Self::Page, ops: &[u8]);

    /// Append a finished sheet to the output document
    fn add_page(&mut self, page: Self::Page) -> Result<()>;
}

// =============================================================================
// lopdf Source
// =============================================================================

/// Source pages of a lopdf document, in page-tree order
pub struct LopdfSource<'a> {
    doc: &'a Document,
    page_ids: Vec<ObjectId>,
}

impl<'a> LopdfSource<'a> {
    pub fn new(doc: &'a Document) -> Self {
        let page_ids = doc.get_pages().values().copied().collect();
        Self { doc, page_ids }
    }

    /// Every page's box, in order
    pub fn page_boxes(&self) -> Vec<Rect> {
        self.page_ids
            .iter()
            .map(|&id| get_page_box(self.doc, id))
            .collect()
    }
}

impl PageSource for LopdfSource<'_> {
    type Resources = Object;

    fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn page_box(&self, index: usize) -> Option<Rect> {
        let id = *self.page_ids.get(index)?;
        Some(get_page_box(self.doc, id))
    }

    fn page_content(&self, index: usize) -> Option<Vec<u8>> {
        let id = *self.page_ids.get(index)?;
        match get_page_content(self.doc, id) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Unreadable content on source page {}: {}", index + 1, e);
                None
            }
        }
    }

    fn page_resources(&self, index: usize) -> Option<Object> {
        let id = *self.page_ids.get(index)?;
        get_page_resources(self.doc, id)
    }
}

// =============================================================================
// lopdf Writer
// =============================================================================

/// An output sheet being assembled by `LopdfWriter`
#[derive(Debug)]
pub struct SheetPage {
    width_pt: f64,
    height_pt: f64,
    xobjects: Dictionary,
    content: Vec<u8>,
}

/// Writes imposed sheets into a fresh lopdf document
///
/// Resource objects are deep-copied from `source`; objects shared between
/// pages (fonts, images) are copied only once.
pub struct LopdfWriter<'a> {
    source: &'a Document,
    output: Document,
    pages_tree_id: ObjectId,
    page_refs: Vec<Object>,
    cache: HashMap<ObjectId, ObjectId>,
}

impl<'a> LopdfWriter<'a> {
    pub fn new(source: &'a Document) -> Self {
        let mut output = Document::with_version("1.7");
        let pages_tree_id = output.new_object_id();
        Self {
            source,
            output,
            pages_tree_id,
            page_refs: Vec::new(),
            cache: HashMap::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_refs.len()
    }

    /// Create pages tree and catalog, finalize document structure
    pub fn finish(mut self) -> Document {
        let count = self.page_refs.len() as i64;
        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(self.page_refs)),
            ("Count", Object::Integer(count)),
        ]);
        self.output
            .objects
            .insert(self.pages_tree_id, Object::Dictionary(pages_dict));

        let catalog_id = self.output.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(self.pages_tree_id)),
        ]));

        self.output.trailer.set("Root", catalog_id);
        self.output
    }
}

impl SheetSink for LopdfWriter<'_> {
    type Resources = Object;
    type Page = SheetPage;

    fn create_blank_page(&mut self, width_pt: f64, height_pt: f64) -> SheetPage {
        SheetPage {
            width_pt,
            height_pt,
            xobjects: Dictionary::new(),
            content: Vec::new(),
        }
    }

    fn register_block(
        &mut self,
        page: &mut SheetPage,
        bbox: &Rect,
        resources: Option<Object>,
        content: Vec<u8>,
    ) -> Result<String> {
        let resources = match resources {
            Some(res) => Some(copy_object_deep(
                &mut self.output,
                self.source,
                &res,
                &mut self.cache,
            )?),
            None => None,
        };

        let xobject_id = self.output.add_object(form_xobject(bbox, resources, content));
        let name = format!("P{}", page.xobjects.len());
        page.xobjects
            .set(name.as_bytes(), Object::Reference(xobject_id));
        Ok(name)
    }

    fn append_content(&mut self, page: &mut SheetPage, ops: &[u8]) {
        page.content.extend_from_slice(ops);
    }

    fn add_page(&mut self, page: SheetPage) -> Result<()> {
        let mut resources = Dictionary::new();
        resources.set("XObject", Object::Dictionary(page.xobjects));

        let content_id = self
            .output
            .add_object(Stream::new(Dictionary::new(), page.content));

        let page_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(self.pages_tree_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(page.width_pt as f32),
                    Object::Real(page.height_pt as f32),
                ]),
            ),
            ("Resources", Object::Dictionary(resources)),
            ("Contents", Object::Reference(content_id)),
        ]);

        let page_id = self.output.add_object(page_dict);
        self.page_refs.push(Object::Reference(page_id));
        Ok(())
    }
}
