//! OpenAI-compatible client configuration.
//!
//! Groq, OpenAI and local servers speaking the same API are all reached through
//! `async-openai` with a custom base URL.

use crate::config::CompletionSettings;
use crate::error::{NexusError, Result};
use async_openai::{config::OpenAIConfig, Client};
use backoff::ExponentialBackoffBuilder;
use std::time::Duration;

/// Create a client for the configured endpoint with the configured timeout.
pub fn create_client(settings: &CompletionSettings) -> Result<Client<OpenAIConfig>> {
    create_client_with_timeout(settings, Duration::from_secs(settings.timeout_secs))
}

/// Create a client for the configured endpoint with a custom timeout.
pub fn create_client_with_timeout(
    settings: &CompletionSettings,
    timeout: Duration,
) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| NexusError::Config(format!("failed to create HTTP client: {}", e)))?;

    let mut config = OpenAIConfig::new().with_api_base(settings.api_base.trim_end_matches('/'));
    if let Some(key) = settings.api_key.as_deref().filter(|k| !k.is_empty()) {
        config = config.with_api_key(key);
    }

    // Provider errors, rate limits included, surface on the first reply.
    let no_retry = ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build();

    Ok(Client::with_config(config)
        .with_http_client(http_client)
        .with_backoff(no_retry))
}
