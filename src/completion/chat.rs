//! OpenAI-compatible chat completion client.

use super::CompletionClient;
use crate::config::CompletionSettings;
use crate::error::{NexusError, Result};
use crate::models::PromptRequest;
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// Completion client for Groq, OpenAI or any API-compatible server.
pub struct ChatCompletionClient {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: Option<f32>,
    timeout: Duration,
}

impl ChatCompletionClient {
    /// Create a client from completion settings.
    pub fn with_config(settings: &CompletionSettings) -> Result<Self> {
        Ok(Self {
            client: create_client(settings)?,
            model: settings.model.clone(),
            temperature: settings.temperature,
            timeout: Duration::from_secs(settings.timeout_secs),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionClient for ChatCompletionClient {
    #[instrument(skip(self, request), fields(model = %self.model, prompt_bytes = request.user.len()))]
    async fn complete(&self, request: &PromptRequest) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(request.system.clone())
                .build()
                .map_err(|e| NexusError::Completion(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(request.user.clone())
                .build()
                .map_err(|e| NexusError::Completion(e.to_string()))?
                .into(),
        ];

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(&self.model).messages(messages);
        if let Some(temperature) = self.temperature {
            builder.temperature(temperature);
        }
        let chat_request = builder
            .build()
            .map_err(|e| NexusError::Completion(e.to_string()))?;

        let response = tokio::time::timeout(self.timeout, self.client.chat().create(chat_request))
            .await
            .map_err(|_| NexusError::Timeout(self.timeout.as_secs()))?
            .map_err(|e| NexusError::OpenAI(format!("Failed to generate response: {}", e)))?;

        let answer = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| NexusError::Completion("Empty response from model".to_string()))?
            .clone();

        debug!("Generated {} characters", answer.len());
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings_for(server: &MockServer) -> CompletionSettings {
        CompletionSettings {
            api_base: server.uri(),
            api_key: Some("gsk_test".to_string()),
            ..CompletionSettings::default()
        }
    }

    fn completion_body(content: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1_700_000_000,
            "model": "llama3-8b-8192",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        })
    }

    #[tokio::test]
    async fn test_sends_system_and_user_messages() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer gsk_test"))
            .and(body_partial_json(serde_json::json!({
                "model": "llama3-8b-8192",
                "messages": [
                    { "role": "system", "content": "Use the file." },
                    { "role": "user", "content": "Revenue: $500\n\nQuestion: What is the revenue?" }
                ]
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(completion_body("The revenue is $500.".into())),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ChatCompletionClient::with_config(&settings_for(&server)).unwrap();
        let answer = client
            .complete(&PromptRequest::new(
                "Use the file.",
                "Revenue: $500\n\nQuestion: What is the revenue?",
            ))
            .await
            .unwrap();

        assert_eq!(answer, "The revenue is $500.");
    }

    #[tokio::test]
    async fn test_missing_content_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(serde_json::Value::Null)))
            .mount(&server)
            .await;

        let client = ChatCompletionClient::with_config(&settings_for(&server)).unwrap();
        let err = client
            .complete(&PromptRequest::new("s", "u"))
            .await
            .unwrap_err();

        assert!(matches!(err, NexusError::Completion(_)));
    }

    #[tokio::test]
    async fn test_api_error_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {
                    "message": "Invalid API Key",
                    "type": "invalid_request_error",
                    "param": null,
                    "code": "invalid_api_key"
                }
            })))
            .mount(&server)
            .await;

        let client = ChatCompletionClient::with_config(&settings_for(&server)).unwrap();
        let err = client
            .complete(&PromptRequest::new("s", "u"))
            .await
            .unwrap_err();

        assert!(matches!(err, NexusError::OpenAI(_)));
        assert!(err.to_string().contains("Invalid API Key"));
    }

    #[tokio::test]
    async fn test_rate_limit_is_surfaced_after_one_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": {
                    "message": "Rate limit reached for model llama3-8b-8192",
                    "type": "tokens",
                    "param": null,
                    "code": "rate_limit_exceeded"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let settings = CompletionSettings {
            timeout_secs: 30,
            ..settings_for(&server)
        };
        let client = ChatCompletionClient::with_config(&settings).unwrap();
        let started = std::time::Instant::now();
        let err = client
            .complete(&PromptRequest::new("s", "u"))
            .await
            .unwrap_err();

        assert!(matches!(err, NexusError::OpenAI(_)));
        assert!(err.to_string().contains("Rate limit reached"));
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_slow_endpoint_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion_body("late".into()))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let settings = CompletionSettings {
            timeout_secs: 1,
            ..settings_for(&server)
        };
        let client = ChatCompletionClient::with_config(&settings).unwrap();
        let err = client
            .complete(&PromptRequest::new("s", "u"))
            .await
            .unwrap_err();

        assert!(matches!(err, NexusError::Timeout(1) | NexusError::OpenAI(_)));
    }
}
