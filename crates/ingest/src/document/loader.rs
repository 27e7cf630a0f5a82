//! Directory scan: every `*.pdf` (any case) directly inside the documents
//! directory is extracted page by page. A file that fails is recorded and
//! skipped; the rest are still processed.

use std::path::Path;

use tracing::{info, warn};
use walkdir::WalkDir;

use super::{extract_pdf, ExtractionError, LoadedDocument};

/// A file that could not be loaded, with the reason.
#[derive(Debug, Clone)]
pub struct FileFailure {
    pub filename: String,
    pub reason: String,
}

/// Outcome of scanning a documents directory.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub documents: Vec<LoadedDocument>,
    pub failures: Vec<FileFailure>,
}

/// Case-insensitive `.pdf` suffix check on a file name.
pub(crate) fn is_pdf(filename: &str) -> bool {
    filename.to_lowercase().ends_with(".pdf")
}

/// Load every PDF in `dir` (non-recursive, sorted by file name).
///
/// Returns `MissingDirectory` if `dir` does not exist or is not a directory.
pub fn load_pdf_dir(dir: &Path) -> Result<LoadReport, ExtractionError> {
    if !dir.is_dir() {
        return Err(ExtractionError::MissingDirectory(dir.display().to_string()));
    }

    let mut report = LoadReport::default();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let filename = entry.file_name().to_string_lossy().into_owned();
        if !is_pdf(&filename) {
            continue;
        }

        info!(file = %filename, "loading document");
        let loaded = std::fs::read(entry.path())
            .map_err(ExtractionError::from)
            .and_then(|bytes| extract_pdf(&bytes));

        match loaded {
            Ok(pages) => report.documents.push(LoadedDocument { filename, pages }),
            Err(e) => {
                warn!(file = %filename, error = %e, "failed to load document, skipping");
                report.failures.push(FileFailure {
                    filename,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(report)
}
