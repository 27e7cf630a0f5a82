use std::panic::{self, AssertUnwindSafe};

use super::{ExtractionError, PageContent};

pub fn extract_pdf(bytes: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
    // pdf-extract panics on some malformed inputs instead of returning an error.
    let texts = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }))
    .map_err(|_| ExtractionError::PdfError("extractor panicked on malformed PDF".to_string()))?
    .map_err(|e| ExtractionError::PdfError(e.to_string()))?;

    let pages = number_pages(texts);
    if pages.is_empty() {
        tracing::warn!("PDF contains no extractable text (scanned or image-only?)");
    }
    Ok(pages)
}

/// Turn per-page text into numbered pages.
///
/// Page `i` (0-based) becomes page number `i + 1`; blank pages are dropped
/// without shifting the numbering of later pages.
pub(crate) fn number_pages(texts: Vec<String>) -> Vec<PageContent> {
    texts
        .into_iter()
        .enumerate()
        .filter_map(|(i, text)| {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| PageContent {
                page_number: i as u32 + 1,
                text: trimmed.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_PAGES: &[u8] = include_bytes!("../../tests/fixtures/two_pages.pdf");

    fn texts(pages: &[&str]) -> Vec<String> {
        pages.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn real_pdf_pages_stay_separate() {
        let pages = extract_pdf(TWO_PAGES).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].page_number, 1);
        assert_eq!(pages[0].text, "AlphaPageOne");
        assert_eq!(pages[1].page_number, 2);
        assert_eq!(pages[1].text, "BravoPageTwo");
    }

    #[test]
    fn pages_numbered_from_one() {
        let pages = number_pages(texts(&["first page", "\n\nsecond page", "third page"]));
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].page_number, 1);
        assert_eq!(pages[2].page_number, 3);
        assert_eq!(pages[1].text, "second page");
    }

    #[test]
    fn blank_pages_keep_numbering() {
        let pages = number_pages(texts(&["cover", "   \n ", "body"]));
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].page_number, 1);
        assert_eq!(pages[1].page_number, 3);
    }

    #[test]
    fn all_blank_has_no_pages() {
        assert!(number_pages(texts(&["  \n", "", "\n "])).is_empty());
    }

    #[test]
    fn garbage_bytes_are_an_error() {
        let result = extract_pdf(b"definitely not a pdf");
        assert!(matches!(result, Err(ExtractionError::PdfError(_))));
    }
}
