use std::path::PathBuf;

use clap::Parser;

/// Ask questions about a folder of PDF files.
///
/// Indexes every PDF in the documents directory at startup, then answers
/// questions in a prompt loop with page-level citations.
#[derive(Parser, Debug)]
#[command(name = "pdfqa", version, about = "Question answering over a folder of PDFs")]
pub struct CliArgs {
    /// Directory scanned for .pdf files (overrides DOCS_PATH)
    #[arg(long)]
    pub docs_dir: Option<PathBuf>,

    /// Directory for the vector index, wiped and rebuilt on every run (overrides INDEX_PATH)
    #[arg(long)]
    pub index_dir: Option<PathBuf>,

    /// Settings profile: `{PROFILE}_{KEY}` variables win over plain `{KEY}`
    #[arg(long, env = "PDFQA_PROFILE")]
    pub profile: Option<String>,
}
