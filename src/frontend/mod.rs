//! Chat front-end logic shared by the CLI and any other interactive client.
//!
//! A [`ChatDesk`] keeps per-tab history in a [`SessionStore`] and replays it into
//! each question. The backend is either the in-process [`Orchestrator`] or a
//! running server reached through [`ApiClient`].

mod client;

pub use client::ApiClient;

use crate::error::{NexusError, Result};
use crate::models::{Upload, NO_TEXT_EXTRACTED, NO_TRANSCRIPT_RETURNED};
use crate::orchestrator::Orchestrator;
use crate::session::{ChatTurn, SessionKind, SessionStore};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Message for a file question without a file or question.
pub const MISSING_FILE_INPUT: &str = "⚠️ Please upload a file and enter a question.";

/// Message for a website question without a URL or question.
pub const MISSING_URL_INPUT: &str = "⚠️ Please enter both a valid URL and a question.";

/// The four capabilities as seen by a front-end: every call yields display text.
#[async_trait]
pub trait Assistant: Send + Sync {
    async fn chat_with_file(&self, upload: Upload, question: &str) -> Result<String>;

    async fn chat_with_url(&self, url: &str, question: &str) -> Result<String>;

    /// OCR result, with the "no text" placeholder for blank images.
    async fn extract_image_text(&self, upload: Upload) -> Result<String>;

    /// Transcript, with the "no transcript" placeholder for silence.
    async fn transcribe_audio(&self, upload: Upload) -> Result<String>;
}

#[async_trait]
impl Assistant for Orchestrator {
    async fn chat_with_file(&self, upload: Upload, question: &str) -> Result<String> {
        Orchestrator::chat_with_file(self, upload, question).await
    }

    async fn chat_with_url(&self, url: &str, question: &str) -> Result<String> {
        Orchestrator::chat_with_url(self, url, question).await
    }

    async fn extract_image_text(&self, upload: Upload) -> Result<String> {
        Ok(Orchestrator::extract_image_text(self, upload)
            .await?
            .into_answer(NO_TEXT_EXTRACTED))
    }

    async fn transcribe_audio(&self, upload: Upload) -> Result<String> {
        Ok(Orchestrator::transcribe_audio(self, upload)
            .await?
            .into_answer(NO_TRANSCRIPT_RETURNED))
    }
}

/// Multi-turn chat over an [`Assistant`] with client-side context replay.
pub struct ChatDesk {
    assistant: Arc<dyn Assistant>,
    sessions: SessionStore,
    max_upload_bytes: usize,
}

impl ChatDesk {
    pub fn new(assistant: Arc<dyn Assistant>, max_upload_bytes: usize) -> Self {
        Self {
            assistant,
            sessions: SessionStore::new(),
            max_upload_bytes,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Ask about a file. Returns the rendered file history on success.
    ///
    /// Nothing is recorded when the call fails.
    pub async fn ask_from_file(&self, upload: Option<Upload>, question: &str) -> Result<String> {
        let upload = match upload {
            Some(upload) if !question.trim().is_empty() => upload,
            _ => return Err(NexusError::InvalidInput(MISSING_FILE_INPUT.to_string())),
        };
        if upload.len() > self.max_upload_bytes {
            return Err(NexusError::FileTooLarge {
                size: upload.len(),
                limit_mb: self.max_upload_bytes / (1024 * 1024),
            });
        }

        let context = self.sessions.context_for(SessionKind::File, question);
        debug!("Sending file question with {} bytes of context", context.len());
        let answer = self.assistant.chat_with_file(upload, &context).await?;

        Ok(self
            .sessions
            .append(SessionKind::File, ChatTurn::new(question, answer)))
    }

    /// Ask about a web page. Returns the rendered URL history on success.
    pub async fn ask_from_url(&self, url: &str, question: &str) -> Result<String> {
        if url.trim().is_empty() || question.trim().is_empty() {
            return Err(NexusError::InvalidInput(MISSING_URL_INPUT.to_string()));
        }

        let context = self.sessions.context_for(SessionKind::Url, question);
        let answer = self.assistant.chat_with_url(url, &context).await?;

        Ok(self
            .sessions
            .append(SessionKind::Url, ChatTurn::new(question, answer)))
    }

    pub async fn extract_image_text(&self, upload: Upload) -> Result<String> {
        self.assistant.extract_image_text(upload).await
    }

    pub async fn transcribe_audio(&self, upload: Upload) -> Result<String> {
        self.assistant.transcribe_audio(upload).await
    }

    /// Start a new conversation of the given kind.
    pub fn clear(&self, kind: SessionKind) {
        self.sessions.clear(kind);
    }
}
