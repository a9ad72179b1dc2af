//! Reading source documents and writing imposed output
//!
//! The byte-level work is synchronous and lives in `decode_pdf` /
//! `encode_pdf`; the async wrappers move it off the runtime and do the
//! file access through `tokio::fs`.

use crate::types::*;
use lopdf::Document;
use std::path::Path;

/// Parse a source document held in memory
pub fn decode_pdf(bytes: &[u8]) -> Result<Document> {
    let doc = Document::load_mem(bytes)?;
    log::debug!(
        "Parsed source: PDF {}, {} pages, {} objects",
        doc.version,
        doc.get_pages().len(),
        doc.objects.len()
    );
    Ok(doc)
}

/// Serialize an imposed document.
///
/// Sheet content streams and page blocks without a filter are compressed;
/// streams copied from the source keep whatever encoding they had.
pub fn encode_pdf(mut doc: Document) -> Result<Vec<u8>> {
    doc.compress();
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

/// Load a source PDF from disk
pub async fn load_pdf(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::fs::read(&path).await?;
    log::info!("Reading {} ({} bytes)", path.display(), bytes.len());
    tokio::task::spawn_blocking(move || decode_pdf(&bytes)).await?
}

/// Write an imposed document to disk
pub async fn save_pdf(doc: Document, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    let sheets = doc.get_pages().len();
    let bytes = tokio::task::spawn_blocking(move || encode_pdf(doc)).await??;
    tokio::fs::write(&path, &bytes).await?;
    log::info!(
        "Wrote {} sheets to {} ({} bytes)",
        sheets,
        path.display(),
        bytes.len()
    );
    Ok(())
}
