use std::path::Path;

use pdfqa_core::{DocumentChunk, EmbeddedChunk};
use pdfqa_index::{FlatIndex, VectorIndex};
use pdfqa_ingest::{chunk_document, ChunkConfig, Embedder, LoadedDocument};
use tracing::{debug, info};

use crate::RagError;

/// Chunk every loaded document with the default splitter settings.
pub fn chunk_documents(documents: &[LoadedDocument]) -> Vec<DocumentChunk> {
    let config = ChunkConfig::default();
    documents
        .iter()
        .flat_map(|doc| chunk_document(doc, &config))
        .collect()
}

/// Rebuild the index at `index_dir` from scratch.
///
/// Fails with [`RagError::NoChunks`] before the directory is touched when
/// the documents yield no text. Chunks are embedded one at a time; the
/// first failed call aborts the build.
pub async fn build_index(
    documents: &[LoadedDocument],
    embedder: &dyn Embedder,
    index_dir: &Path,
) -> Result<FlatIndex, RagError> {
    let chunks = chunk_documents(documents);
    if chunks.is_empty() {
        return Err(RagError::NoChunks);
    }

    info!(
        documents = documents.len(),
        chunks = chunks.len(),
        model = embedder.model(),
        "building index"
    );

    let mut index = FlatIndex::create(index_dir)?;

    let total = chunks.len();
    let mut entries = Vec::with_capacity(total);
    for (i, chunk) in chunks.into_iter().enumerate() {
        let embedding = embedder.embed(&chunk.text).await?;
        debug!(source = %chunk.source, page = chunk.page, "embedded chunk {}/{}", i + 1, total);
        entries.push(EmbeddedChunk { chunk, embedding });
    }

    index.upsert(entries)?;
    info!(path = %index_dir.display(), entries = index.len(), "index built");
    Ok(index)
}
