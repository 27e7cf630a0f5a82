//! Retrieval-augmented question answering over a directory of PDFs.
//!
//! Flow: documents → chunks → embeddings → [`FlatIndex`](pdfqa_index::FlatIndex)
//! at startup, then question → rewrites → per-query top-K search → merged
//! chunks → one stuffed prompt at query time.

pub mod error;
pub mod indexer;
pub mod qa;
pub mod retriever;

pub use error::RagError;
pub use indexer::{build_index, chunk_documents};
pub use qa::{Answer, RetrievalQa};
pub use retriever::{MultiQueryRetriever, TOP_K};
