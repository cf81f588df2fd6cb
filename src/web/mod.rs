//! Web page loading for website question answering.

mod html;

pub use html::html_to_text;

use crate::config::WebSettings;
use crate::error::{NexusError, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Trait for fetching a page and reducing it to text.
#[async_trait]
pub trait PageLoader: Send + Sync {
    /// Fetch `url` and return its textual content.
    ///
    /// Network, status and parse failures are errors: without content there is
    /// nothing to answer from.
    async fn load(&self, url: &str) -> Result<String>;
}

/// Parse and validate a user-supplied URL. Only http and https are accepted.
pub fn parse_url(input: &str) -> Result<Url> {
    let url = Url::parse(input.trim())
        .map_err(|e| NexusError::InvalidInput(format!("invalid URL {:?}: {}", input, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(NexusError::InvalidInput(format!(
            "unsupported URL scheme: {}",
            other
        ))),
    }
}

/// Loads pages over HTTP with reqwest.
pub struct HttpPageLoader {
    client: reqwest::Client,
    max_body_bytes: usize,
}

impl HttpPageLoader {
    /// Create a loader from web settings.
    pub fn with_config(settings: &WebSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| NexusError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_body_bytes: settings.max_body_bytes,
        })
    }
}

#[async_trait]
impl PageLoader for HttpPageLoader {
    #[instrument(skip(self))]
    async fn load(&self, url: &str) -> Result<String> {
        let url = parse_url(url)?;

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| NexusError::WebLoad(format!("failed to fetch {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NexusError::WebLoad(format!(
                "{} returned HTTP {} {}",
                url,
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        if let Some(length) = response.content_length() {
            if length > self.max_body_bytes as u64 {
                return Err(NexusError::WebLoad(format!(
                    "response too large: {} bytes (max: {} bytes)",
                    length, self.max_body_bytes
                )));
            }
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_lowercase();

        let body = response
            .bytes()
            .await
            .map_err(|e| NexusError::WebLoad(format!("failed to read response body: {}", e)))?;

        if body.len() > self.max_body_bytes {
            return Err(NexusError::WebLoad(format!(
                "response too large: {} bytes (max: {} bytes)",
                body.len(),
                self.max_body_bytes
            )));
        }

        let body = String::from_utf8_lossy(&body);
        let text = if content_type.is_empty()
            || content_type.contains("text/html")
            || content_type.contains("application/xhtml")
        {
            html_to_text(&body)
        } else {
            body.into_owned()
        };

        debug!("Loaded {} characters of text ({})", text.len(), content_type);
        Ok(text)
    }
}
