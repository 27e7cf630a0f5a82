pub mod gemini;
pub mod ollama;
pub mod openai;
pub mod traits;

#[cfg(any(test, feature = "test-utils"))]
pub mod fake;

use pdfqa_core::Config;

pub use gemini::GeminiEmbedder;
pub use ollama::OllamaEmbedder;
pub use openai::OpenAiEmbedder;
pub use traits::{Embedder, EmbeddingError};

/// Create the embedding backend selected by `EMBEDDING_PROVIDER`.
pub fn create_embedder(config: &Config) -> Result<Box<dyn Embedder>, EmbeddingError> {
    let embedding = &config.embedding;
    match embedding.provider.as_str() {
        "gemini" => {
            let api_key = config
                .llm
                .google_api_key
                .as_ref()
                .ok_or_else(|| EmbeddingError::NotConfigured("GOOGLE_API_KEY not set".into()))?;
            Ok(Box::new(GeminiEmbedder::new(
                api_key.clone(),
                embedding.gemini_model.clone(),
            )))
        }
        "openai" => {
            let api_key = config
                .llm
                .openai_api_key
                .as_ref()
                .ok_or_else(|| EmbeddingError::NotConfigured("OPENAI_API_KEY not set".into()))?;
            Ok(Box::new(OpenAiEmbedder::new(
                api_key.clone(),
                embedding.openai_model.clone(),
                config.llm.openai_base_url.clone(),
            )))
        }
        "ollama" => Ok(Box::new(OllamaEmbedder::new(
            config.ollama.url.clone(),
            config.ollama.embedding_model.clone(),
        ))),
        other => Err(EmbeddingError::NotConfigured(format!(
            "unknown embedding provider: '{}'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let vars: std::collections::HashMap<&str, &str> = pairs.iter().copied().collect();
        Config::from_lookup("", &|key: &str| vars.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn gemini_requires_google_key() {
        let result = create_embedder(&config(&[]));
        assert!(matches!(result, Err(EmbeddingError::NotConfigured(_))));
    }

    #[test]
    fn selects_backend_by_provider() {
        let embedder = create_embedder(&config(&[("GOOGLE_API_KEY", "k")])).unwrap();
        assert_eq!(embedder.model(), "models/embedding-001");

        let embedder = create_embedder(&config(&[("EMBEDDING_PROVIDER", "ollama")])).unwrap();
        assert_eq!(embedder.model(), "nomic-embed-text");

        let embedder = create_embedder(&config(&[
            ("EMBEDDING_PROVIDER", "openai"),
            ("OPENAI_API_KEY", "k"),
        ]))
        .unwrap();
        assert_eq!(embedder.model(), "text-embedding-3-small");
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let result = create_embedder(&config(&[("EMBEDDING_PROVIDER", "word2vec")]));
        assert!(matches!(result, Err(EmbeddingError::NotConfigured(_))));
    }
}
