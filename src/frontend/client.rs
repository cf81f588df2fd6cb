//! HTTP client for a running Nexus server.

use super::Assistant;
use crate::error::{NexusError, Result};
use crate::models::{Upload, NO_TEXT_EXTRACTED, NO_TRANSCRIPT_RETURNED};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Shown when the server answers successfully but without an answer field.
pub const NO_ANSWER_RETURNED: &str = "⚠️ No answer returned.";

#[derive(Debug, Deserialize)]
struct ApiReply {
    answer: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct UrlQuery<'a> {
    url: &'a str,
    question: &'a str,
}

/// Calls the four HTTP endpoints of a Nexus server.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the server at `base_url`, e.g. `http://127.0.0.1:8000`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NexusError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn file_part(upload: Upload) -> Part {
        let filename = upload.basename().to_string();
        Part::bytes(upload.bytes).file_name(filename)
    }

    async fn post_file(&self, path: &str, form: Form, placeholder: &str) -> Result<String> {
        let response = self
            .client
            .post(self.endpoint(path))
            .multipart(form)
            .send()
            .await?;
        Self::decode(response, placeholder).await
    }

    /// Turn a reply into the answer, or into [`NexusError::Api`] for error statuses.
    async fn decode(response: reqwest::Response, placeholder: &str) -> Result<String> {
        let status = response.status();
        let body = response.text().await?;
        debug!("Server replied {} with {} bytes", status, body.len());

        let reply: Option<ApiReply> = serde_json::from_str(&body).ok();

        if !status.is_success() {
            let message = reply
                .and_then(|r| r.error)
                .unwrap_or_else(|| body.trim().to_string());
            return Err(NexusError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let reply = reply.ok_or_else(|| NexusError::Api {
            status: status.as_u16(),
            message: format!("unexpected response body: {}", body.trim()),
        })?;

        Ok(reply.answer.unwrap_or_else(|| placeholder.to_string()))
    }
}

#[async_trait]
impl Assistant for ApiClient {
    #[instrument(skip(self, upload, question), fields(filename = %upload.filename))]
    async fn chat_with_file(&self, upload: Upload, question: &str) -> Result<String> {
        let form = Form::new()
            .part("file", Self::file_part(upload))
            .text("question", question.to_string());
        self.post_file("chat-with-file", form, NO_ANSWER_RETURNED)
            .await
    }

    #[instrument(skip(self, question))]
    async fn chat_with_url(&self, url: &str, question: &str) -> Result<String> {
        let response = self
            .client
            .post(self.endpoint("chat-with-url"))
            .json(&UrlQuery { url, question })
            .send()
            .await?;
        Self::decode(response, NO_ANSWER_RETURNED).await
    }

    async fn extract_image_text(&self, upload: Upload) -> Result<String> {
        let form = Form::new().part("file", Self::file_part(upload));
        self.post_file("extract-text-from-image", form, NO_TEXT_EXTRACTED)
            .await
    }

    async fn transcribe_audio(&self, upload: Upload) -> Result<String> {
        let form = Form::new().part("file", Self::file_part(upload));
        self.post_file("transcribe-audio", form, NO_TRANSCRIPT_RETURNED)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(&format!("{}/", server.uri()), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_url_question_is_sent_as_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat-with-url"))
            .and(body_json(serde_json::json!({
                "url": "https://example.com",
                "question": "Q: Who?"
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "answer": "Us." })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let answer = client_for(&server)
            .chat_with_url("https://example.com", "Q: Who?")
            .await
            .unwrap();
        assert_eq!(answer, "Us.");
    }

    #[tokio::test]
    async fn test_file_is_sent_as_multipart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat-with-file"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "answer": "$500" })),
            )
            .mount(&server)
            .await;

        let answer = client_for(&server)
            .chat_with_file(Upload::new("report.txt", b"Revenue: $500".to_vec()), "Q: revenue?")
            .await
            .unwrap();
        assert_eq!(answer, "$500");

        let requests = server.received_requests().await.unwrap();
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains("name=\"file\"; filename=\"report.txt\""));
        assert!(body.contains("Revenue: $500"));
        assert!(body.contains("name=\"question\""));
        assert!(body.contains("Q: revenue?"));
    }

    #[tokio::test]
    async fn test_error_body_becomes_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat-with-file"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "❌ File too large. Max size is 10MB."
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .chat_with_file(Upload::new("a.txt", vec![1]), "q")
            .await
            .unwrap_err();

        match err {
            NexusError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "❌ File too large. Max size is 10MB.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_keeps_body_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .transcribe_audio(Upload::new("a.wav", vec![1]))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "API returned 502: Bad Gateway");
    }

    #[tokio::test]
    async fn test_missing_answer_uses_placeholder() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/extract-text-from-image"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let text = client_for(&server)
            .extract_image_text(Upload::new("a.png", vec![1]))
            .await
            .unwrap();
        assert_eq!(text, NO_TEXT_EXTRACTED);
    }
}
