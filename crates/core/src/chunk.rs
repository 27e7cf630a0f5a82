use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A bounded span of extracted document text, the unit of embedding and
/// retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub text: String,
    /// File name of the originating document (not the full path).
    pub source: String,
    /// 1-based page number.
    pub page: u32,
}

impl DocumentChunk {
    pub fn new(text: impl Into<String>, source: impl Into<String>, page: u32) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
            page: page.max(1),
        }
    }

    pub fn citation(&self) -> Citation {
        Citation {
            source: self.source.clone(),
            page: self.page,
        }
    }
}

/// A chunk together with its embedding vector, as stored in the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddedChunk {
    pub chunk: DocumentChunk,
    pub embedding: Vec<f32>,
}

/// One similarity-search hit.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: DocumentChunk,
    pub score: f32,
}

/// Where a piece of an answer came from.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Citation {
    pub source: String,
    pub page: u32,
}

impl fmt::Display for Citation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "- {} (Page: {})", self.source, self.page)
    }
}

/// Render the citation block for a set of chunks: one line per unique
/// source/page, sorted on the rendered line.
pub fn citation_lines<'a>(chunks: impl IntoIterator<Item = &'a DocumentChunk>) -> Vec<String> {
    chunks
        .into_iter()
        .map(|c| c.citation().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
