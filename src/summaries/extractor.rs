//! Text Extractor
//!
//! Pure text-layer extraction with `lopdf`. Scanned programs without a text
//! layer come back (nearly) empty; that is passed on, not treated as an error.

use std::path::Path;

use lopdf::Document;
use tokio::fs;
use tracing::debug;

use crate::types::{AppError, AppResult};

/// Read a PDF from disk and return the text of all pages in order
pub async fn extract_text(path: &Path) -> AppResult<String> {
    let bytes = fs::read(path).await?;
    let text = extract_text_from_bytes(&bytes)?;
    debug!(path = %path.display(), chars = text.chars().count(), "Extracted PDF text");
    Ok(text)
}

/// Concatenate the extracted text of every page in document order
pub fn extract_text_from_bytes(bytes: &[u8]) -> AppResult<String> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| AppError::Extraction(format!("failed to load PDF: {}", e)))?;

    let mut text = String::new();
    for page_num in doc.get_pages().keys() {
        let page_text = doc
            .extract_text(&[*page_num])
            .map_err(|e| AppError::Extraction(format!("page {}: {}", page_num, e)))?;
        text.push_str(&page_text);
    }
    Ok(text)
}
