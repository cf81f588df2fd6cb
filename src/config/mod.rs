//! Configuration module for Nexus.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, QaPrompts};
pub use settings::{
    CompletionSettings, GeneralSettings, OcrSettings, PromptSettings, ServerSettings, Settings,
    TranscriptionSettings, WebSettings, API_KEY_ENV_VARS, TESSERACT_CMD_ENV, USER_AGENT_ENV,
};
