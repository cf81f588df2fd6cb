//! Whisper transcription through an OpenAI-compatible `/audio/transcriptions` endpoint.

use super::Transcriber;
use crate::config::{CompletionSettings, TranscriptionSettings};
use crate::error::{NexusError, Result};
use crate::models::{Extracted, Upload};
use crate::openai::create_client;
use async_openai::types::{AudioInput, CreateTranscriptionRequestArgs};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// Whisper-based transcriber.
pub struct WhisperTranscriber {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    language: Option<String>,
    timeout: Duration,
}

impl WhisperTranscriber {
    /// Create a transcriber against the completion endpoint's provider.
    pub fn with_config(
        endpoint: &CompletionSettings,
        settings: &TranscriptionSettings,
    ) -> Result<Self> {
        Ok(Self {
            client: create_client(endpoint)?,
            model: settings.model.clone(),
            language: settings.language.clone(),
            timeout: Duration::from_secs(endpoint.timeout_secs),
        })
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    #[instrument(skip(self, audio), fields(filename = %audio.filename, bytes = audio.len()))]
    async fn transcribe(&self, audio: &Upload) -> Result<Extracted> {
        if audio.is_empty() {
            return Err(NexusError::InvalidInput("audio file is empty".to_string()));
        }

        let mut request_builder = CreateTranscriptionRequestArgs::default();
        request_builder
            .file(AudioInput::from_vec_u8(
                audio.basename().to_string(),
                audio.bytes.clone(),
            ))
            .model(&self.model);

        if let Some(lang) = &self.language {
            request_builder.language(lang);
        }

        let request = request_builder
            .build()
            .map_err(|e| NexusError::Transcription(format!("Failed to build request: {}", e)))?;

        let response = tokio::time::timeout(self.timeout, self.client.audio().transcribe(request))
            .await
            .map_err(|_| NexusError::Timeout(self.timeout.as_secs()))?
            .map_err(|e| NexusError::OpenAI(format!("Transcription API error: {}", e)))?;

        debug!("Transcript has {} characters", response.text.len());
        Ok(Extracted::from_text(response.text.trim().to_string()))
    }
}
