use super::client::OpenAiHttpClient;
use super::types::{ChatCompletionRequest, ChatCompletionResponse};
use crate::ai::ChatService;
use crate::models::ChatMessage;
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;

const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

pub struct OpenAiChatClient {
    http: OpenAiHttpClient,
    model: String,
}

impl OpenAiChatClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, Duration::from_secs(30), reqwest::Client::new())
    }

    pub fn new_with_client(
        api_key: String,
        model: String,
        timeout: Duration,
        client: reqwest::Client,
    ) -> Self {
        Self {
            http: OpenAiHttpClient::new_with_client(api_key, timeout, client),
            model,
        }
    }
}

super::impl_with_openai_base_url!(OpenAiChatClient);

#[async_trait]
impl ChatService for OpenAiChatClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        if messages.is_empty() {
            return Err(Error::InvalidInput(
                "chat completion needs at least one message".to_string(),
            ));
        }

        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
        };

        let response: ChatCompletionResponse =
            self.http.post(CHAT_COMPLETIONS_PATH, &request).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::AiProvider("No response from OpenAI chat API".to_string()))?;

        if let Some(reason) = choice.finish_reason.as_deref() {
            tracing::debug!("Chat completion finished ({})", reason);
        }

        Ok(choice.message.content.unwrap_or_default())
    }
}
