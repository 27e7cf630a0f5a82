use pdfqa_index::IndexError;
use pdfqa_ingest::{EmbeddingError, ExtractionError};
use pdfqa_llm::QueryError;

#[derive(Debug, thiserror::Error)]
pub enum RagError {
    #[error("no text chunks were produced from the loaded documents")]
    NoChunks,
    #[error("document loading failed: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),
    #[error("vector index error: {0}")]
    Index(#[from] IndexError),
    #[error(transparent)]
    Query(#[from] QueryError),
}
