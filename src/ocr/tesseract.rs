//! Tesseract-backed text recognition.

use super::TextRecognizer;
use crate::config::OcrSettings;
use crate::error::{NexusError, Result};
use crate::models::Extracted;
use async_trait::async_trait;
use std::io::Cursor;
use std::time::Duration;
use tracing::{debug, instrument};

/// Runs the `tesseract` CLI on a normalized PNG copy of the image.
pub struct TesseractRecognizer {
    command: String,
    language: Option<String>,
    timeout: Duration,
}

impl TesseractRecognizer {
    /// Create a recognizer using `tesseract` from PATH.
    pub fn new() -> Self {
        Self::with_config(&OcrSettings::default())
    }

    /// Create a recognizer from OCR settings.
    pub fn with_config(settings: &OcrSettings) -> Self {
        Self {
            command: settings.tesseract_cmd.clone(),
            language: settings.language.clone(),
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }

    /// Decode any supported image format and re-encode it as PNG.
    fn normalize(image: &[u8]) -> Result<Vec<u8>> {
        let decoded = image::load_from_memory(image)
            .map_err(|e| NexusError::Ocr(format!("cannot decode image: {}", e)))?;

        let mut png = Vec::new();
        decoded
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .map_err(|e| NexusError::Ocr(format!("cannot re-encode image: {}", e)))?;
        Ok(png)
    }
}

impl Default for TesseractRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Interpret tesseract's stdout, trimming whitespace.
fn interpret_output(stdout: &[u8]) -> Extracted {
    Extracted::from_text(String::from_utf8_lossy(stdout).trim().to_string())
}

#[async_trait]
impl TextRecognizer for TesseractRecognizer {
    #[instrument(skip(self, image), fields(bytes = image.len()))]
    async fn recognize(&self, image: &[u8]) -> Result<Extracted> {
        let bytes = image.to_vec();
        let png = tokio::task::spawn_blocking(move || Self::normalize(&bytes))
            .await
            .map_err(|e| NexusError::Ocr(format!("image decoding task failed: {}", e)))??;

        let input = tempfile::Builder::new()
            .prefix("nexus-ocr-")
            .suffix(".png")
            .tempfile()?;
        tokio::fs::write(input.path(), &png).await?;

        let mut command = tokio::process::Command::new(&self.command);
        command.arg(input.path()).arg("stdout").kill_on_drop(true);
        if let Some(language) = &self.language {
            command.arg("-l").arg(language);
        }

        debug!("Running {}", self.command);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| NexusError::Timeout(self.timeout.as_secs()))?
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    NexusError::ToolNotFound(self.command.clone())
                } else {
                    NexusError::Ocr(format!("failed to run {}: {}", self.command, e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(NexusError::ToolFailed(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        let extracted = interpret_output(&output.stdout);
        debug!("OCR produced {} characters", extracted.text().map_or(0, str::len));
        Ok(extracted)
    }
}
