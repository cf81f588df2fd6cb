//! Pre-flight checks before operations that call external services.
//!
//! Validates that required tools and configuration are available
//! before starting operations that would otherwise fail midway.

use crate::config::{Settings, API_KEY_ENV_VARS};
use crate::error::{NexusError, Result};
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Questions and transcription need the API key.
    Ask,
    /// OCR needs the tesseract binary.
    Ocr,
    /// The in-process server needs both.
    Serve,
    /// Talking to a remote server needs nothing locally.
    Remote,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Ask => check_api_key(settings)?,
        Operation::Ocr => check_tool(&settings.ocr.tesseract_cmd)?,
        Operation::Serve => {
            check_api_key(settings)?;
            if let Err(e) = check_tool(&settings.ocr.tesseract_cmd) {
                tracing::warn!("Image text extraction will fail: {}", e);
            }
        }
        Operation::Remote => {}
    }
    Ok(())
}

/// Check that an API key for the completion service is configured.
fn check_api_key(settings: &Settings) -> Result<()> {
    if settings.api_key().is_some() {
        return Ok(());
    }
    Err(NexusError::Config(format!(
        "{} not set. Set it with: export {}='gsk_...'",
        API_KEY_ENV_VARS[0], API_KEY_ENV_VARS[0]
    )))
}

/// Check if an external tool is available.
fn check_tool(name: &str) -> Result<()> {
    match Command::new(name).arg("--version").output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(NexusError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(NexusError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(NexusError::ToolNotFound(format!("{}: {}", name, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_has_no_requirements() {
        assert!(check(Operation::Remote, &Settings::default()).is_ok());
    }

    #[test]
    fn test_ask_requires_api_key() {
        let mut settings = Settings::default();
        let err = check(Operation::Ask, &settings).unwrap_err();
        assert!(err.to_string().contains("GROQ_API_KEY"));

        settings.completion.api_key = Some("gsk_test".to_string());
        assert!(check(Operation::Ask, &settings).is_ok());
    }

    #[test]
    fn test_missing_tool_is_reported() {
        let mut settings = Settings::default();
        settings.ocr.tesseract_cmd = "nexus-no-such-binary".to_string();
        let err = check(Operation::Ocr, &settings).unwrap_err();
        assert!(matches!(err, NexusError::ToolNotFound(_)));
    }
}
