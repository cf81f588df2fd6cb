//! Text extraction from uploaded documents.
//!
//! Dispatches on the file extension:
//!
//! - `.txt` - read verbatim as UTF-8
//! - `.docx` - body paragraphs in document order
//! - `.csv` - rendered as a fixed-width text table
//! - `.pdf` - page text in page order, blank pages skipped
//!
//! Any other extension yields [`Extracted::Unsupported`] rather than an error.

mod docx;
mod pdf;
mod table;

pub use docx::docx_paragraphs;
pub use pdf::pdf_pages;
pub use table::render_csv;

use crate::error::{NexusError, Result};
use crate::models::Extracted;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};

/// Upper bound for parsing a single document on the blocking pool.
const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(60);

/// File extensions with an extractor.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "docx", "csv", "pdf"];

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Docx,
    Csv,
    Pdf,
}

impl DocumentKind {
    /// Detect the format from a path's extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = extension_of(path)?;
        match ext.as_str() {
            "txt" => Some(DocumentKind::PlainText),
            "docx" => Some(DocumentKind::Docx),
            "csv" => Some(DocumentKind::Csv),
            "pdf" => Some(DocumentKind::Pdf),
            _ => None,
        }
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Extract the text of a document on disk.
#[instrument(fields(path = %path.display()))]
pub async fn extract_file(path: &Path) -> Result<Extracted> {
    let Some(kind) = DocumentKind::from_path(path) else {
        let ext = extension_of(path).unwrap_or_default();
        debug!("No extractor for extension {:?}", ext);
        return Ok(Extracted::Unsupported(ext));
    };

    let text = match kind {
        DocumentKind::PlainText => {
            let bytes = tokio::fs::read(path).await?;
            String::from_utf8(bytes)
                .map_err(|e| NexusError::Extraction(format!("file is not valid UTF-8: {}", e)))?
        }
        DocumentKind::Csv => {
            let bytes = tokio::fs::read(path).await?;
            render_csv(&bytes)?
        }
        DocumentKind::Docx => {
            let bytes = tokio::fs::read(path).await?;
            run_blocking(move || docx_paragraphs(&bytes).map(|p| p.join("\n"))).await?
        }
        DocumentKind::Pdf => {
            let path = path.to_path_buf();
            run_blocking(move || pdf_pages(&path).map(|p| p.join("\n"))).await?
        }
    };

    debug!("Extracted {} bytes of text as {:?}", text.len(), kind);
    Ok(Extracted::from_text(text))
}

/// Run a parser on the blocking pool with a time limit.
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::time::timeout(EXTRACTION_TIMEOUT, tokio::task::spawn_blocking(f))
        .await
        .map_err(|_| NexusError::Timeout(EXTRACTION_TIMEOUT.as_secs()))?
        .map_err(|e| NexusError::Extraction(format!("extraction task failed: {}", e)))?
}
