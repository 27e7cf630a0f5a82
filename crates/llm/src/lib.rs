pub mod answer;
pub mod expand;
pub mod provider;
pub mod providers;

pub use answer::{AnswerSynthesizer, MAX_CONTEXT_CHARS};
pub use expand::QueryExpander;
pub use provider::{LlmError, LlmProvider, Message, Role};
pub use providers::create_provider;

/// Errors from the question-answering steps built on top of a provider.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("LLM error: {0}")]
    LlmError(#[from] LlmError),
    #[error("retrieved context is {chars} characters, over the {limit} character budget")]
    ContextTooLarge { chars: usize, limit: usize },
}
