use std::sync::Arc;

use tracing::{debug, info};

use crate::provider::{LlmProvider, Message};
use crate::QueryError;

/// Number of alternative phrasings requested from the model.
const REWRITE_COUNT: usize = 3;

/// Rewrites a question into several phrasings so retrieval is less
/// sensitive to the exact wording of the user's question.
pub struct QueryExpander {
    provider: Arc<dyn LlmProvider>,
    temperature: f32,
    max_tokens: u32,
}

impl QueryExpander {
    pub fn new(provider: Arc<dyn LlmProvider>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            provider,
            temperature,
            max_tokens,
        }
    }

    /// The original question followed by the model's rewrites, deduplicated.
    pub async fn expand(&self, question: &str) -> Result<Vec<String>, QueryError> {
        let messages = vec![Message::user(rewrite_prompt(question))];

        let response = self
            .provider
            .complete(messages, self.temperature, self.max_tokens)
            .await?;

        debug!("Rewrite response: {}", response);

        let queries = parse_rewrites(question, &response);
        info!("Expanded question into {} queries", queries.len());
        Ok(queries)
    }
}

fn rewrite_prompt(question: &str) -> String {
    format!(
        "You are helping search a collection of documents with a vector similarity search. \
         Write {REWRITE_COUNT} different versions of the question below, each approaching it \
         from a different angle, so that relevant passages are found even when they use \
         different wording. Put each version on its own line and write nothing else.\n\n\
         Question: {question}"
    )
}

/// Split a model reply into queries. The original always comes first.
fn parse_rewrites(question: &str, response: &str) -> Vec<String> {
    let original = question.trim();
    let mut queries = vec![original.to_string()];

    for line in response.lines() {
        let candidate = strip_list_marker(line.trim());
        if candidate.is_empty() || candidate == original {
            continue;
        }
        if !queries.iter().any(|q| q == candidate) {
            queries.push(candidate.to_string());
        }
    }

    queries
}

/// Drop a leading `1.`, `1)`, `-` or `*` marker.
fn strip_list_marker(line: &str) -> &str {
    if let Some(rest) = line.strip_prefix(['-', '*']) {
        return rest.trim_start();
    }

    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix(['.', ')']) {
            return rest.trim_start();
        }
    }

    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::MockLlmProvider;

    #[test]
    fn markers_are_stripped() {
        assert_eq!(strip_list_marker("1. What is X?"), "What is X?");
        assert_eq!(strip_list_marker("12) What is X?"), "What is X?");
        assert_eq!(strip_list_marker("- What is X?"), "What is X?");
        assert_eq!(strip_list_marker("* What is X?"), "What is X?");
        assert_eq!(strip_list_marker("2024 results"), "2024 results");
    }

    #[test]
    fn original_first_then_rewrites_in_order() {
        let reply = "1. How does X work?\n\n2. What is the mechanism of X?\n3. Explain X.\n";
        let queries = parse_rewrites("What is X?", reply);
        assert_eq!(
            queries,
            vec![
                "What is X?",
                "How does X work?",
                "What is the mechanism of X?",
                "Explain X.",
            ]
        );
    }

    #[test]
    fn duplicates_and_echoes_of_the_original_are_dropped() {
        let reply = "What is X?\n- Explain X.\n* Explain X.\n   \n";
        let queries = parse_rewrites("What is X?", reply);
        assert_eq!(queries, vec!["What is X?", "Explain X."]);
    }

    #[test]
    fn empty_reply_yields_only_the_original() {
        assert_eq!(parse_rewrites("  What is X?\n", ""), vec!["What is X?"]);
    }

    #[tokio::test]
    async fn expand_sends_one_prompt_containing_the_question() {
        let provider = Arc::new(MockLlmProvider::new());
        provider.queue_text("Alt one\nAlt two");
        let expander = QueryExpander::new(provider.clone(), 0.0, 256);

        let queries = expander.expand("Who wrote the report?").await.unwrap();
        assert_eq!(queries, vec!["Who wrote the report?", "Alt one", "Alt two"]);

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0][0].content.contains("Who wrote the report?"));
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let provider = Arc::new(MockLlmProvider::new());
        provider.queue_error("quota exceeded");
        let expander = QueryExpander::new(provider, 0.0, 256);

        let err = expander.expand("anything").await.unwrap_err();
        assert!(matches!(err, QueryError::LlmError(_)));
    }
}
