//! AI service integration for chat, image generation, and embeddings
//!
//! Each capability is a trait so the game and chat layers can be driven by
//! the OpenAI clients in production and by the mocks in tests.

pub mod mock;
pub mod openai;

pub use mock::{MockChatClient, MockEmbeddingClient, MockImageGenerationClient};
pub use openai::{OpenAiChatClient, OpenAiEmbeddingClient, OpenAiImageClient};

use crate::image::GeneratedImage;
use crate::models::ChatMessage;
use crate::semantic::EmbeddingVector;
use crate::{Error, Result};
use async_trait::async_trait;

#[async_trait]
pub trait ChatService: Send + Sync {
    /// Produce the assistant reply for a conversation so far.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}

#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage>;
}

#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// Embed a batch of texts, returning vectors in input order.
    async fn embed_texts(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>>;

    /// Embed a single text.
    ///
    /// Blank input is rejected before the provider is called.
    async fn embed(&self, text: &str) -> Result<EmbeddingVector> {
        ensure_not_blank(text, "embedding input")?;

        self.embed_texts(&[text])
            .await?
            .pop()
            .ok_or_else(|| Error::AiProvider("Provider returned no embedding".to_string()))
    }
}

/// Reject empty or whitespace-only text with [`Error::InvalidInput`].
pub fn ensure_not_blank(text: &str, what: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(Error::InvalidInput(format!("{} must not be empty", what)));
    }
    Ok(())
}
