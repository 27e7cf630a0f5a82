//! Flat (exhaustive) vector index.
//!
//! All entries are kept in memory and searched by brute-force cosine
//! similarity. A disk-backed index lives in its own directory:
//!
//! ```text
//! vector_index/
//!   entries.dat   ← zstd stream of length-prefixed MessagePack entries
//!   meta.json     ← entry count, dimensions, format, build time
//! ```
//!
//! The directory is owned exclusively by the index. [`FlatIndex::create`]
//! deletes whatever is there before writing anything, so a rebuild never
//! leaves stale files behind.

use std::cmp::Ordering;
use std::fs;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use pdfqa_core::{EmbeddedChunk, ScoredChunk};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::IndexError;
use crate::VectorIndex;

const ENTRIES_FILE: &str = "entries.dat";
const META_FILE: &str = "meta.json";
const FORMAT: &str = "msgpack+zstd/v1";

/// Index metadata stored as meta.json.
#[derive(Debug, Serialize, Deserialize)]
struct IndexMeta {
    entry_count: usize,
    dimensions: usize,
    format: String,
    built_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct FlatIndex {
    dir: Option<PathBuf>,
    dimensions: Option<usize>,
    entries: Vec<EmbeddedChunk>,
}

impl FlatIndex {
    /// An index that lives only in memory.
    pub fn in_memory() -> Self {
        Self {
            dir: None,
            dimensions: None,
            entries: Vec::new(),
        }
    }

    /// Start a fresh disk-backed index at `dir`, removing any previous
    /// index there first.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, IndexError> {
        let dir = dir.into();
        if dir.is_dir() {
            info!(path = %dir.display(), "removing existing index");
            fs::remove_dir_all(&dir)?;
        } else if dir.exists() {
            fs::remove_file(&dir)?;
        }
        fs::create_dir_all(&dir)?;

        Ok(Self {
            dir: Some(dir),
            dimensions: None,
            entries: Vec::new(),
        })
    }

    /// Load a previously persisted index.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, IndexError> {
        let dir = dir.into();
        let meta: IndexMeta = serde_json::from_str(&fs::read_to_string(dir.join(META_FILE))?)?;
        if meta.format != FORMAT {
            return Err(corrupt(&dir, format!("unsupported format '{}'", meta.format)));
        }

        let file = fs::File::open(dir.join(ENTRIES_FILE))?;
        let mut decoder = zstd::Decoder::new(BufReader::new(file))?;
        let mut entries = Vec::with_capacity(meta.entry_count);

        loop {
            let mut len_buf = [0u8; 4];
            match decoder.read_exact(&mut len_buf) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e.into()),
            }
            let mut record = vec![0u8; u32::from_le_bytes(len_buf) as usize];
            decoder.read_exact(&mut record)?;
            entries.push(rmp_serde::from_slice::<EmbeddedChunk>(&record)?);
        }

        if entries.len() != meta.entry_count {
            return Err(corrupt(
                &dir,
                format!("meta.json lists {} entries, found {}", meta.entry_count, entries.len()),
            ));
        }

        info!(path = %dir.display(), entries = entries.len(), "index loaded");
        Ok(Self {
            dir: Some(dir),
            dimensions: (meta.entry_count > 0).then_some(meta.dimensions),
            entries,
        })
    }

    /// Directory backing this index, if any.
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Embedding dimensionality, fixed by the first entry.
    pub fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }

    /// Rewrite the on-disk store from the in-memory entries.
    fn persist(&self, dir: &Path) -> Result<(), IndexError> {
        let file = fs::File::create(dir.join(ENTRIES_FILE))?;
        let mut encoder = zstd::Encoder::new(BufWriter::new(file), 3)?;
        for entry in &self.entries {
            let encoded = rmp_serde::to_vec(entry)?;
            encoder.write_all(&(encoded.len() as u32).to_le_bytes())?;
            encoder.write_all(&encoded)?;
        }
        let mut inner = encoder.finish()?;
        inner.flush()?;

        let meta = IndexMeta {
            entry_count: self.entries.len(),
            dimensions: self.dimensions.unwrap_or(0),
            format: FORMAT.to_string(),
            built_at: Utc::now(),
        };
        fs::write(dir.join(META_FILE), serde_json::to_string_pretty(&meta)?)?;

        debug!(path = %dir.display(), entries = meta.entry_count, "index persisted");
        Ok(())
    }
}

impl VectorIndex for FlatIndex {
    fn upsert(&mut self, entries: Vec<EmbeddedChunk>) -> Result<(), IndexError> {
        let mut dimensions = self.dimensions;
        for entry in &entries {
            let actual = entry.embedding.len();
            match dimensions {
                Some(expected) if expected != actual => {
                    return Err(IndexError::DimensionMismatch { expected, actual });
                }
                Some(_) => {}
                None => dimensions = Some(actual),
            }
        }

        self.dimensions = dimensions;
        self.entries.extend(entries);

        if let Some(dir) = &self.dir {
            self.persist(dir)?;
        }
        Ok(())
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>, IndexError> {
        let Some(expected) = self.dimensions else {
            return Ok(Vec::new());
        };
        if query.len() != expected {
            return Err(IndexError::DimensionMismatch {
                expected,
                actual: query.len(),
            });
        }

        let mut scored: Vec<(f32, &EmbeddedChunk)> = self
            .entries
            .iter()
            .map(|e| (cosine_similarity(query, &e.embedding), e))
            .collect();

        // Stable sort: equal scores keep insertion order.
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(score, e)| ScoredChunk {
                chunk: e.chunk.clone(),
                score,
            })
            .collect())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Cosine similarity; zero vectors score 0.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

fn corrupt(dir: &Path, reason: String) -> IndexError {
    IndexError::Corrupt {
        path: dir.display().to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfqa_core::DocumentChunk;

    fn entry(text: &str, page: u32, embedding: Vec<f32>) -> EmbeddedChunk {
        EmbeddedChunk {
            chunk: DocumentChunk::new(text, "doc.pdf", page),
            embedding,
        }
    }

    fn sample_entries() -> Vec<EmbeddedChunk> {
        vec![
            entry("east", 1, vec![1.0, 0.0]),
            entry("north", 2, vec![0.0, 1.0]),
            entry("north-east", 3, vec![1.0, 1.0]),
        ]
    }

    #[test]
    fn cosine_basics() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn search_ranks_by_similarity() {
        let mut index = FlatIndex::in_memory();
        index.upsert(sample_entries()).unwrap();

        let hits = index.search(&[1.0, 0.1], 2).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].chunk.text, "east");
        assert_eq!(hits[1].chunk.text, "north-east");
        assert!(hits[0].score >= hits[1].score);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let mut index = FlatIndex::in_memory();
        index
            .upsert(vec![
                entry("first", 1, vec![1.0, 0.0]),
                entry("second", 2, vec![2.0, 0.0]),
            ])
            .unwrap();
        let hits = index.search(&[1.0, 0.0], 2).unwrap();
        assert_eq!(hits[0].chunk.text, "first");
        assert_eq!(hits[1].chunk.text, "second");
    }

    #[test]
    fn k_larger_than_index_returns_everything() {
        let mut index = FlatIndex::in_memory();
        index.upsert(sample_entries()).unwrap();
        assert_eq!(index.search(&[0.0, 1.0], 7).unwrap().len(), 3);
    }

    #[test]
    fn empty_index_search_is_empty() {
        let index = FlatIndex::in_memory();
        assert!(index.is_empty());
        assert!(index.search(&[1.0, 2.0, 3.0], 7).unwrap().is_empty());
    }

    #[test]
    fn mixed_dimensions_are_rejected() {
        let mut index = FlatIndex::in_memory();
        let result = index.upsert(vec![entry("a", 1, vec![1.0, 0.0]), entry("b", 1, vec![1.0])]);
        assert!(matches!(
            result,
            Err(IndexError::DimensionMismatch { expected: 2, actual: 1 })
        ));
        assert!(index.is_empty());
    }

    #[test]
    fn query_dimension_must_match() {
        let mut index = FlatIndex::in_memory();
        index.upsert(sample_entries()).unwrap();
        assert!(matches!(
            index.search(&[1.0, 0.0, 0.0], 3),
            Err(IndexError::DimensionMismatch { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn persisted_index_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("vector_index");

        let mut index = FlatIndex::create(&dir).unwrap();
        index.upsert(sample_entries()).unwrap();
        assert!(dir.join(ENTRIES_FILE).exists());
        assert!(dir.join(META_FILE).exists());

        let reopened = FlatIndex::open(&dir).unwrap();
        assert_eq!(reopened.len(), 3);
        assert_eq!(reopened.dimensions(), Some(2));
        let hits = reopened.search(&[0.0, 1.0], 1).unwrap();
        assert_eq!(hits[0].chunk.text, "north");
        assert_eq!(hits[0].chunk.page, 2);
        assert_eq!(hits[0].chunk.source, "doc.pdf");
    }

    #[test]
    fn create_removes_stale_files() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("vector_index");
        fs::create_dir_all(dir.join("old_collection")).unwrap();
        fs::write(dir.join("stale.sqlite3"), b"old").unwrap();
        fs::write(dir.join("old_collection").join("data.bin"), b"old").unwrap();

        let index = FlatIndex::create(&dir).unwrap();

        assert!(dir.is_dir());
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0, "no file may survive a rebuild");
        assert_eq!(index.dir(), Some(dir.as_path()));
    }

    #[test]
    fn rebuild_replaces_previous_contents() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("vector_index");

        let mut first = FlatIndex::create(&dir).unwrap();
        first.upsert(sample_entries()).unwrap();

        let mut second = FlatIndex::create(&dir).unwrap();
        second.upsert(vec![entry("only", 9, vec![0.5, 0.5])]).unwrap();

        let reopened = FlatIndex::open(&dir).unwrap();
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.search(&[1.0, 1.0], 5).unwrap()[0].chunk.text, "only");
    }

    #[test]
    fn open_detects_count_mismatch() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("vector_index");
        let mut index = FlatIndex::create(&dir).unwrap();
        index.upsert(sample_entries()).unwrap();

        let meta = fs::read_to_string(dir.join(META_FILE)).unwrap();
        fs::write(dir.join(META_FILE), meta.replace("\"entry_count\": 3", "\"entry_count\": 4")).unwrap();

        assert!(matches!(FlatIndex::open(&dir), Err(IndexError::Corrupt { .. })));
    }

    #[test]
    fn open_missing_index_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            FlatIndex::open(tmp.path().join("absent")),
            Err(IndexError::Io(_))
        ));
    }
}
