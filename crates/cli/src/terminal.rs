use std::io::{self, Stdout, Write};

use anyhow::Result;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::tty::IsTty;
use crossterm::queue;
use pdfqa_rag::Answer;

/// Color scheme for terminal output.
struct Colors;

impl Colors {
    const PROMPT: Color = Color::Green;
    const ANSWER: Color = Color::Cyan;
    const SOURCES: Color = Color::Yellow;
    const ERROR: Color = Color::Red;
    const DIM: Color = Color::DarkGrey;
    const HEADER: Color = Color::Magenta;
}

/// Width of the rule printed after each answer.
const RULE_WIDTH: usize = 50;

/// Console output for startup progress and the question loop.
///
/// Colors are only emitted when writing to a real terminal.
pub struct Terminal<W: Write> {
    out: W,
    color: bool,
}

impl Terminal<Stdout> {
    pub fn stdout() -> Self {
        let out = io::stdout();
        let color = out.is_tty();
        Self { out, color }
    }
}

impl<W: Write> Terminal<W> {
    /// Uncolored output to any writer.
    #[cfg(test)]
    pub fn plain(out: W) -> Self {
        Self { out, color: false }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_styled(&mut self, color: Color, text: &str) -> Result<()> {
        if self.color {
            queue!(self.out, SetForegroundColor(color), Print(text), ResetColor)?;
        } else {
            self.out.write_all(text.as_bytes())?;
        }
        Ok(())
    }

    fn line(&mut self, color: Color, text: &str) -> Result<()> {
        self.write_styled(color, text)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }

    /// Print the banner shown once the index is ready.
    pub fn print_banner(&mut self, chunks: usize, model: &str) -> Result<()> {
        self.write_styled(Colors::HEADER, "\npdfqa")?;
        self.out.write_all(b" - setup complete\n")?;
        self.line(
            Colors::DIM,
            &format!("Indexed {} chunks | Model: {}\n", chunks, model),
        )
    }

    /// Show the question prompt without a trailing newline.
    pub fn prompt(&mut self, text: &str) -> Result<()> {
        self.write_styled(Colors::PROMPT, text)?;
        self.out.flush()?;
        Ok(())
    }

    /// Print an answer, its citations, and a closing rule.
    pub fn print_answer(&mut self, answer: &Answer) -> Result<()> {
        self.line(Colors::HEADER, "\nAnswer:")?;
        self.line(Colors::ANSWER, &answer.text)?;

        let citations = answer.citations();
        if !citations.is_empty() {
            self.line(Colors::SOURCES, "\n--- Sources ---")?;
            for citation in &citations {
                self.line(Colors::SOURCES, citation)?;
            }
        }

        self.line(Colors::DIM, &format!("\n{}", "=".repeat(RULE_WIDTH)))
    }

    pub fn print_error(&mut self, msg: &str) -> Result<()> {
        self.line(Colors::ERROR, msg)
    }

    pub fn print_info(&mut self, msg: &str) -> Result<()> {
        self.line(Colors::DIM, msg)
    }
}
