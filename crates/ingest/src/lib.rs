pub mod document;
pub mod embedding;

pub use document::chunker::{chunk_document, ChunkConfig};
pub use document::{load_pdf_dir, ExtractionError, LoadReport, LoadedDocument, PageContent};
pub use embedding::{create_embedder, Embedder, EmbeddingError};
