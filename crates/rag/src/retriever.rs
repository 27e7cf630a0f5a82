use std::sync::Arc;

use pdfqa_core::DocumentChunk;
use pdfqa_index::VectorIndex;
use pdfqa_ingest::Embedder;
use pdfqa_llm::QueryExpander;
use tracing::{debug, info};

use crate::RagError;

/// Hits taken from the index for each query.
pub const TOP_K: usize = 7;

/// Searches the index once per query phrasing and merges the hits.
pub struct MultiQueryRetriever {
    expander: QueryExpander,
    embedder: Arc<dyn Embedder>,
    index: Box<dyn VectorIndex>,
    k: usize,
}

impl MultiQueryRetriever {
    pub fn new(
        expander: QueryExpander,
        embedder: Arc<dyn Embedder>,
        index: Box<dyn VectorIndex>,
    ) -> Self {
        Self {
            expander,
            embedder,
            index,
            k: TOP_K,
        }
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Merged hits for every phrasing of `question`, in first-seen order.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<DocumentChunk>, RagError> {
        let queries = self.expander.expand(question).await?;

        let mut merged: Vec<DocumentChunk> = Vec::new();
        for query in &queries {
            let vector = self.embedder.embed_query(query).await?;
            let hits = self.index.search(&vector, self.k)?;
            debug!(query = %query, hits = hits.len(), "searched index");

            for hit in hits {
                if !merged.contains(&hit.chunk) {
                    merged.push(hit.chunk);
                }
            }
        }

        info!(queries = queries.len(), chunks = merged.len(), "retrieved context");
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfqa_core::EmbeddedChunk;
    use pdfqa_index::FlatIndex;
    use pdfqa_ingest::embedding::fake::FakeEmbedder;
    use pdfqa_llm::provider::mock::MockLlmProvider;
    use std::collections::HashSet;

    fn indexed(embedder: &FakeEmbedder, texts: &[(&str, u32)]) -> FlatIndex {
        let mut index = FlatIndex::in_memory();
        index
            .upsert(
                texts
                    .iter()
                    .map(|(text, page)| EmbeddedChunk {
                        chunk: DocumentChunk::new(*text, "doc.pdf", *page),
                        embedding: embedder.vector_for(text),
                    })
                    .collect(),
            )
            .unwrap();
        index
    }

    fn retriever(reply: &str, index: FlatIndex, k: usize) -> MultiQueryRetriever {
        let provider = Arc::new(MockLlmProvider::new());
        provider.queue_text(reply);
        let expander = QueryExpander::new(provider, 0.0, 256);
        MultiQueryRetriever::new(expander, Arc::new(FakeEmbedder::new(64)), Box::new(index)).with_k(k)
    }

    #[tokio::test]
    async fn hits_from_every_query_are_merged_without_duplicates() {
        let embedder = FakeEmbedder::new(64);
        let index = indexed(
            &embedder,
            &[
                ("solar panels convert sunlight", 1),
                ("wind turbines spin", 2),
                ("solar wind interaction", 3),
            ],
        );

        let chunks = retriever("wind turbines", index, 2)
            .retrieve("solar panels")
            .await
            .unwrap();

        let pages: Vec<u32> = chunks.iter().map(|c| c.page).collect();
        assert_eq!(pages[0], 1, "original query's best hit comes first");
        assert!(pages.contains(&2), "rewrite's hit is merged in");
        let unique: HashSet<u32> = pages.iter().copied().collect();
        assert_eq!(unique.len(), pages.len());
    }

    #[tokio::test]
    async fn empty_index_yields_no_chunks() {
        let chunks = retriever("rewrite", FlatIndex::in_memory(), TOP_K)
            .retrieve("anything")
            .await
            .unwrap();
        assert!(chunks.is_empty());
    }

    #[tokio::test]
    async fn same_text_on_different_pages_is_kept_twice() {
        let embedder = FakeEmbedder::new(64);
        let index = indexed(&embedder, &[("repeated footer", 1), ("repeated footer", 2)]);

        let chunks = retriever("", index, TOP_K)
            .retrieve("repeated footer")
            .await
            .unwrap();
        assert_eq!(chunks.len(), 2);
    }
}
