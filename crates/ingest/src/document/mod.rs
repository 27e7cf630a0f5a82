pub mod chunker;
mod loader;
mod pdf;

use thiserror::Error;

pub use loader::{load_pdf_dir, FileFailure, LoadReport};
pub use pdf::extract_pdf;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("documents directory not found: {0}")]
    MissingDirectory(String),
    #[error("PDF extraction failed: {0}")]
    PdfError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A page of extracted text.
#[derive(Debug, Clone)]
pub struct PageContent {
    /// 1-based page number.
    pub page_number: u32,
    /// The extracted text content.
    pub text: String,
}

/// A PDF file whose pages have been extracted.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// File name only, used as the citation source.
    pub filename: String,
    pub pages: Vec<PageContent>,
}

impl LoadedDocument {
    /// Total character count across all pages.
    pub fn total_chars(&self) -> usize {
        self.pages.iter().map(|p| p.text.chars().count()).sum()
    }
}
