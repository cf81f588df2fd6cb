//! Error types for Nexus.

use thiserror::Error;

/// Library-level error type for Nexus operations.
#[derive(Error, Debug)]
pub enum NexusError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("❌ File too large. Max size is {limit_mb}MB.")]
    FileTooLarge { size: usize, limit_mb: usize },

    #[error("Text extraction failed: {0}")]
    Extraction(String),

    #[error("Text recognition failed: {0}")]
    Ocr(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Failed to load web page: {0}")]
    WebLoad(String),

    #[error("Completion failed: {0}")]
    Completion(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("External tool failed: {0}")]
    ToolFailed(String),
}

impl NexusError {
    /// Whether the error was caused by the caller's input rather than a downstream failure.
    ///
    /// Validation errors are reported before any extractor or remote call runs.
    pub fn is_validation(&self) -> bool {
        matches!(self, NexusError::InvalidInput(_) | NexusError::FileTooLarge { .. })
    }
}

/// Result type alias for Nexus operations.
pub type Result<T> = std::result::Result<T, NexusError>;
