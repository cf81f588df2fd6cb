//! Speech-to-text for uploaded audio.

mod whisper;

pub use whisper::WhisperTranscriber;

use crate::error::Result;
use crate::models::{Extracted, Upload};
use async_trait::async_trait;

/// Trait for transcription services.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio upload. The filename's extension tells the service
    /// which container format it is receiving.
    async fn transcribe(&self, audio: &Upload) -> Result<Extracted>;
}
