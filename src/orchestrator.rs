//! Pipeline orchestrator for Nexus.
//!
//! Every pipeline is linear: validate, extract, build the prompt, complete.
//! Image and audio pipelines stop after extraction.

use crate::completion::{ChatCompletionClient, CompletionClient};
use crate::config::{Prompts, QaPrompts, Settings};
use crate::error::{NexusError, Result};
use crate::extract::{extract_file, SUPPORTED_EXTENSIONS};
use crate::models::{Extracted, PromptRequest, Upload, UNSUPPORTED_FILE_TYPE};
use crate::ocr::{TesseractRecognizer, TextRecognizer};
use crate::transcription::{Transcriber, WhisperTranscriber};
use crate::web::{parse_url, HttpPageLoader, PageLoader};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// The main orchestrator for the Nexus pipelines.
pub struct Orchestrator {
    settings: Settings,
    prompts: Prompts,
    completion: Arc<dyn CompletionClient>,
    recognizer: Arc<dyn TextRecognizer>,
    transcriber: Arc<dyn Transcriber>,
    page_loader: Arc<dyn PageLoader>,
    upload_dir: PathBuf,
}

impl Orchestrator {
    /// Create a new orchestrator with the configured remote services and tools.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let completion = Arc::new(ChatCompletionClient::with_config(&settings.completion)?);
        info!(
            "Using {} at {}",
            completion.model(),
            settings.completion.api_base
        );

        let recognizer = Arc::new(TesseractRecognizer::with_config(&settings.ocr));
        let transcriber = Arc::new(WhisperTranscriber::with_config(
            &settings.completion,
            &settings.transcription,
        )?);
        let page_loader = Arc::new(HttpPageLoader::with_config(&settings.web)?);

        Self::with_components(
            settings,
            prompts,
            completion,
            recognizer,
            transcriber,
            page_loader,
        )
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        completion: Arc<dyn CompletionClient>,
        recognizer: Arc<dyn TextRecognizer>,
        transcriber: Arc<dyn Transcriber>,
        page_loader: Arc<dyn PageLoader>,
    ) -> Result<Self> {
        let upload_dir = settings.upload_dir();
        std::fs::create_dir_all(&upload_dir)?;

        Ok(Self {
            settings,
            prompts,
            completion,
            recognizer,
            transcriber,
            page_loader,
            upload_dir,
        })
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Directory uploads are written to.
    pub fn upload_dir(&self) -> &PathBuf {
        &self.upload_dir
    }

    /// Answer a question about an uploaded document.
    #[instrument(skip(self, upload, question), fields(filename = %upload.filename, bytes = upload.len()))]
    pub async fn chat_with_file(&self, upload: Upload, question: &str) -> Result<String> {
        require_non_empty(question, "question")?;
        self.check_upload_size(&upload)?;

        let path = self.persist_upload(&upload).await?;
        let document = match extract_file(&path).await? {
            Extracted::Text(text) => text,
            Extracted::Empty => {
                return Err(NexusError::InvalidInput(format!(
                    "no text could be extracted from {}",
                    upload.basename()
                )))
            }
            Extracted::Unsupported(ext) => {
                debug!("Rejecting upload with extension {:?}", ext);
                return Err(NexusError::InvalidInput(format!(
                    "{} Supported: .{}",
                    UNSUPPORTED_FILE_TYPE,
                    SUPPORTED_EXTENSIONS.join(", .")
                )));
            }
        };

        info!("Extracted {} characters from {}", document.len(), upload.basename());
        let request = self.build_prompt(&self.prompts.file, &document, question);
        self.completion.complete(&request).await
    }

    /// Answer a question about the content of a web page.
    #[instrument(skip(self, question))]
    pub async fn chat_with_url(&self, url: &str, question: &str) -> Result<String> {
        require_non_empty(url, "URL")?;
        require_non_empty(question, "question")?;
        let url = parse_url(url)?;

        let document = self.page_loader.load(url.as_str()).await?;
        info!("Loaded {} characters from {}", document.len(), url);

        let request = self.build_prompt(&self.prompts.url, &document, question);
        self.completion.complete(&request).await
    }

    /// Recognize the text in an uploaded image.
    #[instrument(skip(self, upload), fields(filename = %upload.filename, bytes = upload.len()))]
    pub async fn extract_image_text(&self, upload: Upload) -> Result<Extracted> {
        if upload.is_empty() {
            return Err(NexusError::InvalidInput("image file is empty".to_string()));
        }
        self.recognizer.recognize(&upload.bytes).await
    }

    /// Transcribe an uploaded recording.
    #[instrument(skip(self, upload), fields(filename = %upload.filename, bytes = upload.len()))]
    pub async fn transcribe_audio(&self, upload: Upload) -> Result<Extracted> {
        self.transcriber.transcribe(&upload).await
    }

    fn check_upload_size(&self, upload: &Upload) -> Result<()> {
        let limit = self.settings.server.max_upload_bytes;
        if upload.len() > limit {
            return Err(NexusError::FileTooLarge {
                size: upload.len(),
                limit_mb: self.settings.server.max_upload_mb(),
            });
        }
        Ok(())
    }

    /// Write the upload into the upload directory under a collision-free name.
    async fn persist_upload(&self, upload: &Upload) -> Result<PathBuf> {
        let path = self
            .upload_dir
            .join(format!("{}_{}", Uuid::new_v4(), upload.basename()));
        tokio::fs::write(&path, &upload.bytes).await?;
        debug!("Saved upload to {}", path.display());
        Ok(path)
    }

    fn build_prompt(&self, template: &QaPrompts, document: &str, question: &str) -> PromptRequest {
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), question.to_string());
        vars.insert("document".to_string(), document.to_string());

        PromptRequest::new(
            self.prompts.render_with_custom(&template.system, &vars),
            self.prompts.render_with_custom(&template.user, &vars),
        )
    }
}

fn require_non_empty(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(NexusError::InvalidInput(format!("{} must not be empty", what)));
    }
    Ok(())
}
