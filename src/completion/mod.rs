//! Chat completion against a remote large language model.

mod chat;

pub use chat::ChatCompletionClient;

use crate::error::Result;
use crate::models::PromptRequest;
use async_trait::async_trait;

/// Trait for completion backends.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send the system and user messages and return the generated reply.
    async fn complete(&self, request: &PromptRequest) -> Result<String>;
}
