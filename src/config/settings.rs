//! Configuration settings for Nexus.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variables holding the completion API key, checked in order.
pub const API_KEY_ENV_VARS: &[&str] = &["GROQ_API_KEY", "NEXUS_API_KEY"];

/// Environment variable overriding the Tesseract binary path.
pub const TESSERACT_CMD_ENV: &str = "TESSERACT_CMD";

/// Environment variable overriding the page fetcher's User-Agent.
pub const USER_AGENT_ENV: &str = "USER_AGENT";

const MB: usize = 1024 * 1024;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub completion: CompletionSettings,
    pub transcription: TranscriptionSettings,
    pub ocr: OcrSettings,
    pub web: WebSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory where uploaded files are written before extraction.
    pub upload_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            upload_dir: "~/.nexus/uploaded_files".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// Largest file accepted by the file chat pipeline, in bytes.
    pub max_upload_bytes: usize,
    /// Hard cap on request bodies, in bytes. Must stay above `max_upload_bytes`
    /// so oversized files reach the size check and get a descriptive error.
    pub body_limit_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            max_upload_bytes: 10 * MB,
            body_limit_bytes: 64 * MB,
        }
    }
}

impl ServerSettings {
    /// Upload limit expressed in whole megabytes, for messages.
    pub fn max_upload_mb(&self) -> usize {
        self.max_upload_bytes / MB
    }
}

/// Chat completion endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionSettings {
    /// Base URL of the OpenAI-compatible API.
    pub api_base: String,
    /// API key. Usually supplied through `GROQ_API_KEY` instead.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model used for file and website answers.
    pub model: String,
    /// Sampling temperature. Unset leaves the provider default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Upper bound for a single remote call, in seconds.
    pub timeout_secs: u64,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.groq.com/openai/v1".to_string(),
            api_key: None,
            model: "llama3-8b-8192".to_string(),
            temperature: None,
            timeout_secs: 120,
        }
    }
}

/// Speech-to-text settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    /// Whisper model served by the completion endpoint's provider.
    pub model: String,
    /// Optional language hint (ISO-639-1).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            model: "whisper-large-v3".to_string(),
            language: None,
        }
    }
}

/// OCR settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    /// Path to, or name of, the tesseract binary.
    pub tesseract_cmd: String,
    /// Tesseract language pack(s), e.g. "eng" or "eng+deu".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Upper bound for a single OCR run, in seconds.
    pub timeout_secs: u64,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            tesseract_cmd: "tesseract".to_string(),
            language: None,
            timeout_secs: 60,
        }
    }
}

/// Web page loader settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebSettings {
    /// User-Agent header sent when fetching pages.
    pub user_agent: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Largest response body accepted, in bytes.
    pub max_body_bytes: usize,
}

impl Default for WebSettings {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string(),
            timeout_secs: 30,
            max_body_bytes: 5 * MB,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    ///
    /// Environment overrides are applied on top of the file contents.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let mut settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Settings::default()
        };

        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Apply environment overrides using the given lookup.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = API_KEY_ENV_VARS.iter().find_map(|&k| non_empty(k)) {
            self.completion.api_key = Some(key);
        }
        if let Some(cmd) = non_empty(TESSERACT_CMD_ENV) {
            self.ocr.tesseract_cmd = cmd;
        }
        if let Some(agent) = non_empty(USER_AGENT_ENV) {
            self.web.user_agent = agent;
        }
    }

    /// Save settings to a specific path. The API key is never written.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut persisted = self.clone();
        persisted.completion.api_key = None;
        let content = toml::to_string_pretty(&persisted)
            .map_err(|e| crate::error::NexusError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nexus")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded upload directory path.
    pub fn upload_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.upload_dir)
    }

    /// The configured API key, if any.
    pub fn api_key(&self) -> Option<&str> {
        self.completion.api_key.as_deref().filter(|k| !k.is_empty())
    }
}
