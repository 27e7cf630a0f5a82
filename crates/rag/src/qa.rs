use pdfqa_core::{citation_lines, DocumentChunk};
use pdfqa_llm::AnswerSynthesizer;
use tracing::info;

use crate::retriever::MultiQueryRetriever;
use crate::RagError;

/// A generated answer and the chunks it was generated from.
#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    /// Exactly the chunks placed in the prompt, in retrieval order.
    pub sources: Vec<DocumentChunk>,
}

impl Answer {
    /// `- <file> (Page: <n>)` lines, deduplicated and sorted.
    pub fn citations(&self) -> Vec<String> {
        citation_lines(&self.sources)
    }
}

/// Retrieve-then-synthesize question answering.
pub struct RetrievalQa {
    retriever: MultiQueryRetriever,
    synthesizer: AnswerSynthesizer,
}

impl RetrievalQa {
    pub fn new(retriever: MultiQueryRetriever, synthesizer: AnswerSynthesizer) -> Self {
        Self {
            retriever,
            synthesizer,
        }
    }

    pub async fn ask(&self, question: &str) -> Result<Answer, RagError> {
        info!("Answering question: {}", question);

        let sources = self.retriever.retrieve(question).await?;
        let text = self.synthesizer.synthesize(question, &sources).await?;

        Ok(Answer { text, sources })
    }
}
