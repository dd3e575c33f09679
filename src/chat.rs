//! Multi-turn chat conversation kept on the client side.

use crate::ai::{ensure_not_blank, ChatService};
use crate::models::{ChatMessage, ChatRole};
use crate::Result;
use std::sync::Arc;

/// A running conversation; every request sends the whole history.
pub struct ChatSession {
    chat: Arc<dyn ChatService>,
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new(chat: Arc<dyn ChatService>) -> Self {
        Self {
            chat,
            messages: Vec::new(),
        }
    }

    /// Start the conversation with a system instruction.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.messages.push(ChatMessage::system(prompt));
        self
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Send a user message and record the assistant's reply.
    ///
    /// The user message stays in the history even when the request fails.
    pub async fn send(&mut self, input: &str) -> Result<String> {
        ensure_not_blank(input, "chat message")?;

        self.messages.push(ChatMessage::user(input));
        let reply = self.chat.complete(&self.messages).await?;
        self.messages.push(ChatMessage::assistant(reply.clone()));

        tracing::debug!("Chat history now has {} messages", self.messages.len());
        Ok(reply)
    }

    pub fn clear(&mut self) {
        self.messages.retain(|m| m.role == ChatRole::System);
    }
}
