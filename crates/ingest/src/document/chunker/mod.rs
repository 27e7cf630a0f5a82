//! Recursive character splitter.
//!
//! Splits page text into overlapping windows of at most `chunk_size`
//! characters, preferring to break at paragraph, then line, then sentence,
//! then word boundaries before falling back to a hard character cut.

mod helpers;
mod strategies;
mod types;

pub use strategies::{chunk_document, split_text};
pub use types::{ChunkConfig, CHUNK_OVERLAP, CHUNK_SIZE, DEFAULT_SEPARATORS};
