//! Low-level lopdf helpers for reusable page blocks
//!
//! This module handles pulling a source page's content, box and resources
//! out of a lopdf document, and copying resource objects into the output
//! document so each Form XObject carries its own isolated resource set.

use crate::constants::DEFAULT_PAGE_DIMENSIONS;
use crate::layout::Rect;
use crate::types::Result;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// Inherited page attributes are looked up at most this many levels up the page tree
const MAX_INHERITANCE_DEPTH: usize = 32;

// =============================================================================
// XObject Creation
// =============================================================================

/// Build a Form XObject stream wrapping page content.
///
/// `resources` must already live in the output document.
pub fn form_xobject(bbox: &Rect, resources: Option<Object>, content: Vec<u8>) -> Stream {
    let mut xobject_dict = Dictionary::new();
    xobject_dict.set("Type", Object::Name(b"XObject".to_vec()));
    xobject_dict.set("Subtype", Object::Name(b"Form".to_vec()));
    xobject_dict.set("FormType", Object::Integer(1));
    xobject_dict.set(
        "BBox",
        Object::Array(vec![
            Object::Real(bbox.x as f32),
            Object::Real(bbox.y as f32),
            Object::Real(bbox.right() as f32),
            Object::Real(bbox.top() as f32),
        ]),
    );

    if let Some(resources) = resources {
        xobject_dict.set("Resources", resources);
    }

    Stream::new(xobject_dict, content)
}

// =============================================================================
// Page Content Extraction
// =============================================================================

/// Get the content stream data from a page.
///
/// Returns `None` when the page has no content stream at all, or when a
/// stream uses a filter that cannot be decoded. Encoded bytes are never
/// passed on as if they were operators.
pub fn get_page_content(doc: &Document, page_id: ObjectId) -> Result<Option<Vec<u8>>> {
    let page_dict = doc.get_dictionary(page_id)?;
    let contents = match page_dict.get(b"Contents") {
        Ok(c) => c,
        Err(_) => return Ok(None),
    };

    match contents {
        Object::Reference(id) => get_single_content_stream(doc, *id),
        Object::Array(arr) => get_concatenated_content_streams(doc, arr),
        Object::Stream(stream) => Ok(stream_data(stream)),
        _ => Ok(None),
    }
}

/// Get content from a single content stream reference
fn get_single_content_stream(doc: &Document, id: ObjectId) -> Result<Option<Vec<u8>>> {
    match doc.get_object(id)? {
        Object::Stream(stream) => Ok(stream_data(stream)),
        Object::Array(arr) => get_concatenated_content_streams(doc, arr),
        _ => Ok(None),
    }
}

/// Concatenate multiple content streams
///
/// One undecodable part makes the whole page unusable.
fn get_concatenated_content_streams(doc: &Document, refs: &[Object]) -> Result<Option<Vec<u8>>> {
    let mut result = Vec::new();
    let mut found = false;

    for obj in refs {
        if let Object::Reference(id) = obj {
            if let Ok(stream) = doc.get_object(*id)?.as_stream() {
                let Some(data) = stream_data(stream) else {
                    return Ok(None);
                };
                result.extend_from_slice(&data);
                result.push(b'\n');
                found = true;
            }
        }
    }

    Ok(found.then_some(result))
}

/// Decoded stream bytes; unfiltered streams are returned as stored
fn stream_data(stream: &Stream) -> Option<Vec<u8>> {
    if stream.dict.get(b"Filter").is_err() {
        return Some(stream.content.clone());
    }

    match stream.decompressed_content() {
        Ok(data) => Some(data),
        Err(e) => {
            log::warn!("Cannot decode content stream: {}", e);
            None
        }
    }
}

// =============================================================================
// Inherited Attributes
// =============================================================================

/// Look up a page attribute, following `Parent` links for inheritable keys
fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut dict = doc.get_dictionary(page_id).ok()?;

    for _ in 0..MAX_INHERITANCE_DEPTH {
        if let Ok(value) = dict.get(key) {
            return Some(value);
        }
        let parent = dict.get(b"Parent").and_then(Object::as_reference).ok()?;
        dict = doc.get_dictionary(parent).ok()?;
    }

    None
}

/// The page's resource object, inherited from the page tree if needed
pub fn get_page_resources(doc: &Document, page_id: ObjectId) -> Option<Object> {
    inherited_attribute(doc, page_id, b"Resources").cloned()
}

// =============================================================================
// Page Dimensions
// =============================================================================

/// Get the source page box (MediaBox) in points
///
/// Falls back to A4 when the box is missing or malformed.
pub fn get_page_box(doc: &Document, page_id: ObjectId) -> Rect {
    let media_box = inherited_attribute(doc, page_id, b"MediaBox").and_then(|obj| match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    });

    let numbers: Option<Vec<f64>> = media_box
        .and_then(|obj| obj.as_array().ok())
        .map(|arr| arr.iter().filter_map(extract_number).collect());

    match numbers.as_deref() {
        Some([x0, y0, x1, y1]) if x0 != x1 && y0 != y1 => Rect::from_corners(*x0, *y0, *x1, *y1),
        _ => Rect::new(0.0, 0.0, DEFAULT_PAGE_DIMENSIONS.0, DEFAULT_PAGE_DIMENSIONS.1),
    }
}

/// Extract numeric value from a PDF object
fn extract_number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}

// =============================================================================
// Deep Copy
// =============================================================================

/// Deep copy an object from source to output document, following references.
///
/// Uses a cache so shared objects (fonts, images) are copied once per
/// output document. The target id is reserved before recursing, so
/// reference cycles terminate. Dangling references are copied as null.
pub fn copy_object_deep(
    output: &mut Document,
    source: &Document,
    obj: &Object,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Object> {
    match obj {
        Object::Reference(id) => {
            if let Some(&new_id) = cache.get(id) {
                return Ok(Object::Reference(new_id));
            }

            let new_id = output.new_object_id();
            cache.insert(*id, new_id);

            // A reference to a missing object reads as null
            let copied = match source.get_object(*id) {
                Ok(referenced) => copy_object_deep(output, source, referenced, cache)?,
                Err(_) => Object::Null,
            };
            output.objects.insert(new_id, copied);

            Ok(Object::Reference(new_id))
        }
        Object::Dictionary(dict) => Ok(Object::Dictionary(copy_dictionary(
            output, source, dict, cache,
        )?)),
        Object::Array(arr) => {
            let new_arr: Result<Vec<_>> = arr
                .iter()
                .map(|item| copy_object_deep(output, source, item, cache))
                .collect();
            Ok(Object::Array(new_arr?))
        }
        Object::Stream(stream) => Ok(Object::Stream(Stream {
            dict: copy_dictionary(output, source, &stream.dict, cache)?,
            content: stream.content.clone(),
            allows_compression: stream.allows_compression,
            start_position: None,
        })),
        // Primitive types: just clone
        _ => Ok(obj.clone()),
    }
}

fn copy_dictionary(
    output: &mut Document,
    source: &Document,
    dict: &Dictionary,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Dictionary> {
    let mut new_dict = Dictionary::new();
    for (key, value) in dict.iter() {
        new_dict.set(key.clone(), copy_object_deep(output, source, value, cache)?);
    }
    Ok(new_dict)
}
