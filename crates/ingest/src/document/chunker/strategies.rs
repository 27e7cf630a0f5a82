//! Page-aware chunking: each page is split on its own, so chunks never
//! span pages and every chunk carries the page it came from.

use pdfqa_core::DocumentChunk;

use super::helpers::split_recursive;
use super::types::ChunkConfig;
use crate::document::LoadedDocument;

/// Split free text into overlapping chunks.
pub fn split_text(text: &str, config: &ChunkConfig) -> Vec<String> {
    split_recursive(text, &config.separators, config)
}

/// Chunk every page of a document, tagging chunks with file name and page.
pub fn chunk_document(doc: &LoadedDocument, config: &ChunkConfig) -> Vec<DocumentChunk> {
    doc.pages
        .iter()
        .flat_map(|page| {
            split_text(&page.text, config)
                .into_iter()
                .map(move |text| DocumentChunk::new(text, doc.filename.clone(), page.page_number))
        })
        .collect()
}
