//! Values passed between the extractors, the orchestrator and the front-ends.

use std::path::Path;

/// Shown instead of OCR output when an image contains no recognizable text.
pub const NO_TEXT_EXTRACTED: &str = "⚠️ No text extracted.";

/// Shown instead of a transcript when the speech model returns nothing.
pub const NO_TRANSCRIPT_RETURNED: &str = "⚠️ No transcript returned.";

/// Shown when an uploaded file's type has no extractor.
pub const UNSUPPORTED_FILE_TYPE: &str = "❌ Unsupported file type.";

/// Outcome of turning a file, image or recording into plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    /// Non-blank text.
    Text(String),
    /// The input was readable but held no text.
    Empty,
    /// No extractor exists for this file extension.
    Unsupported(String),
}

impl Extracted {
    /// Classify raw extractor output, treating whitespace-only text as empty.
    pub fn from_text(text: String) -> Self {
        if text.trim().is_empty() {
            Extracted::Empty
        } else {
            Extracted::Text(text)
        }
    }

    /// The extracted text, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Extracted::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Extracted::Empty)
    }

    /// Render for display, substituting `empty` for blank results.
    pub fn into_answer(self, empty: &str) -> String {
        match self {
            Extracted::Text(t) => t,
            Extracted::Empty => empty.to_string(),
            Extracted::Unsupported(_) => UNSUPPORTED_FILE_TYPE.to_string(),
        }
    }
}

/// An uploaded file held in memory.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    /// Read a local file into an upload named after its final path component.
    pub async fn from_path(path: &Path) -> crate::error::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        Ok(Self { filename, bytes })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Final path component of the client-supplied name, stripped of any directories.
    pub fn basename(&self) -> &str {
        self.filename
            .rsplit(|c| c == '/' || c == '\\')
            .find(|part| !part.is_empty())
            .unwrap_or("upload")
    }
}

/// A system instruction and user message for the completion endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub system: String,
    pub user: String,
}

impl PromptRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}
