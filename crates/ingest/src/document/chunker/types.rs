//! Chunk configuration.

/// Target chunk size in characters.
pub const CHUNK_SIZE: usize = 2000;

/// Characters carried over between adjacent chunks of the same page.
pub const CHUNK_OVERLAP: usize = 200;

/// Split boundaries in order of preference: paragraph, line, sentence,
/// word, then a hard cut between any two characters.
pub const DEFAULT_SEPARATORS: &[&str] = &["\n\n", "\n", ". ", " ", ""];

/// Configuration for the chunking engine.
#[derive(Debug, Clone)]
pub struct ChunkConfig {
    /// Maximum characters per chunk (default: 2000).
    pub chunk_size: usize,
    /// Overlap characters between adjacent chunks (default: 200).
    pub chunk_overlap: usize,
    /// Separators tried in order; `""` means split between characters.
    pub separators: Vec<&'static str>,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            chunk_overlap: CHUNK_OVERLAP,
            separators: DEFAULT_SEPARATORS.to_vec(),
        }
    }
}
