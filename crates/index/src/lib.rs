pub mod error;
pub mod flat;

use pdfqa_core::{EmbeddedChunk, ScoredChunk};

pub use error::IndexError;
pub use flat::FlatIndex;

/// A store of embedded chunks searchable by vector similarity.
pub trait VectorIndex: Send + Sync {
    /// Add entries to the index (persisting them if the index is disk-backed).
    fn upsert(&mut self, entries: Vec<EmbeddedChunk>) -> Result<(), IndexError>;

    /// Top-`k` entries most similar to `query`, best first.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>, IndexError>;

    /// Number of stored entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
