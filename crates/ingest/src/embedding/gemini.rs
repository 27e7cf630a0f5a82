use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::traits::{non_empty, Embedder, EmbeddingError};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini `embedContent` backend.
///
/// Document chunks are embedded with task type `RETRIEVAL_DOCUMENT` and
/// questions with `RETRIEVAL_QUERY`, which the model uses to place them in
/// compatible regions of the vector space.
pub struct GeminiEmbedder {
    client: Client,
    api_key: String,
    /// Always in `models/<name>` form.
    model: String,
    base_url: String,
}

#[derive(Debug, Clone, Copy)]
enum TaskType {
    RetrievalDocument,
    RetrievalQuery,
}

impl TaskType {
    fn as_str(self) -> &'static str {
        match self {
            TaskType::RetrievalDocument => "RETRIEVAL_DOCUMENT",
            TaskType::RetrievalQuery => "RETRIEVAL_QUERY",
        }
    }
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: EmbeddingValues,
}

#[derive(Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

impl GeminiEmbedder {
    pub fn new(api_key: String, model: String) -> Self {
        let model = if model.starts_with("models/") {
            model
        } else {
            format!("models/{model}")
        };
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_key,
            model,
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    /// Point at a different API host (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn build_request_body(model: &str, text: &str, task: TaskType) -> serde_json::Value {
        json!({
            "model": model,
            "content": { "parts": [{ "text": text }] },
            "taskType": task.as_str(),
        })
    }

    async fn embed_with_task(&self, text: &str, task: TaskType) -> Result<Vec<f32>, EmbeddingError> {
        // The key travels in a header so it never shows up in URLs quoted by errors.
        let url = format!("{}/v1beta/{}:embedContent", self.base_url, self.model);
        let body = Self::build_request_body(&self.model, text, task);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api(format!("{status}: {body}")));
        }

        let parsed: EmbedResponse = response.json().await?;
        non_empty(parsed.embedding.values)
    }
}

#[async_trait]
impl Embedder for GeminiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed_with_task(text, TaskType::RetrievalDocument).await
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed_with_task(text, TaskType::RetrievalQuery).await
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_name_is_normalized() {
        let e = GeminiEmbedder::new("k".into(), "embedding-001".into());
        assert_eq!(e.model(), "models/embedding-001");
        let e = GeminiEmbedder::new("k".into(), "models/embedding-001".into());
        assert_eq!(e.model(), "models/embedding-001");
    }

    #[test]
    fn request_body_structure() {
        let body = GeminiEmbedder::build_request_body(
            "models/embedding-001",
            "What is attention?",
            TaskType::RetrievalQuery,
        );
        assert_eq!(body["model"], "models/embedding-001");
        assert_eq!(body["content"]["parts"][0]["text"], "What is attention?");
        assert_eq!(body["taskType"], "RETRIEVAL_QUERY");
    }

    #[tokio::test]
    async fn failed_request_does_not_leak_api_key() {
        let embedder = GeminiEmbedder::new("SECRET-KEY-123".into(), "embedding-001".into())
            .with_base_url("http://127.0.0.1:1");

        let err = embedder.embed("hello").await.unwrap_err();
        assert!(matches!(err, EmbeddingError::Http(_)));
        assert!(!err.to_string().contains("SECRET-KEY-123"), "leaked key: {err}");
    }

    #[test]
    fn response_parses_values() {
        let parsed: EmbedResponse =
            serde_json::from_str(r#"{"embedding": {"values": [0.5, -0.25]}}"#).unwrap();
        assert_eq!(parsed.embedding.values, vec![0.5, -0.25]);
    }
}
