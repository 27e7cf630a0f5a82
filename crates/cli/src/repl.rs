//! The question loop: read a line, answer it, print citations, repeat.

use std::io::{BufRead, Write};

use anyhow::Result;
use async_trait::async_trait;
use pdfqa_rag::{Answer, RagError, RetrievalQa};
use tracing::error;

use crate::terminal::Terminal;

pub const PROMPT: &str = "Enter a question (type 'exit' to quit): ";

/// Anything that can answer a question with sources.
#[async_trait]
pub trait Answerer {
    async fn answer(&self, question: &str) -> Result<Answer, RagError>;
}

#[async_trait]
impl Answerer for RetrievalQa {
    async fn answer(&self, question: &str) -> Result<Answer, RagError> {
        self.ask(question).await
    }
}

#[derive(Debug, PartialEq)]
enum Input<'a> {
    Exit,
    Blank,
    Question(&'a str),
}

fn classify(line: &str) -> Input<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        Input::Blank
    } else if line.trim_end_matches(['\r', '\n']).eq_ignore_ascii_case("exit") {
        Input::Exit
    } else {
        Input::Question(trimmed)
    }
}

/// Run until `exit` or end of input. A failed question is reported and
/// the loop keeps going.
pub async fn run<R, W>(mut input: R, terminal: &mut Terminal<W>, qa: &dyn Answerer) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    let mut line = String::new();
    loop {
        terminal.prompt(PROMPT)?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            terminal.print_info("\nGoodbye.")?;
            return Ok(());
        }

        let question = match classify(&line) {
            Input::Exit => {
                terminal.print_info("Goodbye.")?;
                return Ok(());
            }
            Input::Blank => continue,
            Input::Question(q) => q,
        };

        terminal.print_info("\nGenerating answer...")?;
        match qa.answer(question).await {
            Ok(answer) => terminal.print_answer(&answer)?,
            Err(e) => {
                error!(error = %e, "question failed");
                terminal.print_error(&format!("\nAn error occurred: {}", e))?;
            }
        }
    }
}
