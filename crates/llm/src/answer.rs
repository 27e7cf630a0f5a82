use std::sync::Arc;

use pdfqa_core::DocumentChunk;
use tracing::{debug, info};

use crate::provider::{LlmProvider, Message};
use crate::QueryError;

/// Largest stuffed context, in characters, sent in a single answer prompt.
pub const MAX_CONTEXT_CHARS: usize = 400_000;

/// Answers a question from retrieved chunks by placing all of them in one prompt.
pub struct AnswerSynthesizer {
    provider: Arc<dyn LlmProvider>,
    temperature: f32,
    max_tokens: u32,
    max_context_chars: usize,
}

impl AnswerSynthesizer {
    pub fn new(provider: Arc<dyn LlmProvider>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            provider,
            temperature,
            max_tokens,
            max_context_chars: MAX_CONTEXT_CHARS,
        }
    }

    /// Override the context budget.
    pub fn with_max_context_chars(mut self, limit: usize) -> Self {
        self.max_context_chars = limit;
        self
    }

    pub async fn synthesize(
        &self,
        question: &str,
        chunks: &[DocumentChunk],
    ) -> Result<String, QueryError> {
        let context = stuff_context(chunks);
        let chars = context.chars().count();
        if chars > self.max_context_chars {
            return Err(QueryError::ContextTooLarge {
                chars,
                limit: self.max_context_chars,
            });
        }

        info!("Answering from {} chunks ({} chars of context)", chunks.len(), chars);

        let messages = vec![Message::user(answer_prompt(&context, question))];
        let answer = self
            .provider
            .complete(messages, self.temperature, self.max_tokens)
            .await?;

        debug!("Answer: {}", answer);
        Ok(answer)
    }
}

fn stuff_context(chunks: &[DocumentChunk]) -> String {
    chunks
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn answer_prompt(context: &str, question: &str) -> String {
    format!(
        "Use the following pieces of context to answer the question at the end. \
         If you don't know the answer, just say that you don't know, don't try to make up an answer.\n\n\
         {context}\n\n\
         Question: {question}\n\
         Helpful Answer:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::MockLlmProvider;

    fn chunk(text: &str) -> DocumentChunk {
        DocumentChunk::new(text, "a.pdf", 1)
    }

    #[test]
    fn chunks_are_joined_with_blank_lines() {
        let context = stuff_context(&[chunk("first"), chunk("second")]);
        assert_eq!(context, "first\n\nsecond");
    }

    #[tokio::test]
    async fn prompt_contains_context_and_question() {
        let provider = Arc::new(MockLlmProvider::new());
        provider.queue_text("42");
        let synth = AnswerSynthesizer::new(provider.clone(), 0.0, 512);

        let answer = synth
            .synthesize("What is the answer?", &[chunk("The answer is 42.")])
            .await
            .unwrap();
        assert_eq!(answer, "42");

        let prompt = &provider.requests()[0][0].content;
        assert!(prompt.contains("The answer is 42."));
        assert!(prompt.contains("Question: What is the answer?"));
        assert!(prompt.contains("say that you don't know"));
    }

    #[tokio::test]
    async fn zero_chunks_still_calls_the_model() {
        let provider = Arc::new(MockLlmProvider::new());
        provider.queue_text("I don't know.");
        let synth = AnswerSynthesizer::new(provider.clone(), 0.0, 512);

        let answer = synth.synthesize("Unrelated?", &[]).await.unwrap();
        assert_eq!(answer, "I don't know.");
        assert_eq!(provider.requests().len(), 1);
    }

    #[tokio::test]
    async fn oversized_context_fails_without_calling_the_model() {
        let provider = Arc::new(MockLlmProvider::new());
        let synth = AnswerSynthesizer::new(provider.clone(), 0.0, 512).with_max_context_chars(10);

        let err = synth
            .synthesize("q", &[chunk("0123456789"), chunk("abc")])
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::ContextTooLarge { chars: 15, limit: 10 }));
        assert!(provider.requests().is_empty());
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let provider = Arc::new(MockLlmProvider::new());
        provider.queue_error("boom");
        let synth = AnswerSynthesizer::new(provider, 0.0, 512);

        assert!(matches!(
            synth.synthesize("q", &[chunk("x")]).await,
            Err(QueryError::LlmError(_))
        ));
    }
}
