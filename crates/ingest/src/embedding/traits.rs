use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("embedding service returned an empty vector")]
    EmptyEmbedding,

    #[error("embedder not configured: {0}")]
    NotConfigured(String),
}

/// Trait for embedding backends (Gemini, OpenAI, Ollama).
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a document chunk for storage in the index.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embed a search query. Backends that distinguish query and document
    /// embeddings override this.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed(text).await
    }

    /// Model identifier, for logs and index metadata.
    fn model(&self) -> &str;
}

/// Reject empty vectors so they never reach the index.
pub(crate) fn non_empty(embedding: Vec<f32>) -> Result<Vec<f32>, EmbeddingError> {
    if embedding.is_empty() {
        Err(EmbeddingError::EmptyEmbedding)
    } else {
        Ok(embedding)
    }
}
