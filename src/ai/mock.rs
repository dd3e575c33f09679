use super::{ensure_not_blank, ChatService, EmbeddingService, ImageGenerationService};
use crate::image::GeneratedImage;
use crate::models::ChatMessage;
use crate::semantic::EmbeddingVector;
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock chat client that replays queued responses (cycling) or echoes the
/// last user message when none are configured.
#[derive(Clone)]
pub struct MockChatClient {
    responses: Arc<Mutex<Vec<String>>>,
    fail_with: Arc<Mutex<Option<String>>>,
    call_count: Arc<Mutex<usize>>,
    last_history: Arc<Mutex<Vec<ChatMessage>>>,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            fail_with: Arc::new(Mutex::new(None)),
            call_count: Arc::new(Mutex::new(0)),
            last_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_response(self, response: String) -> Self {
        self.responses.lock().unwrap().push(response);
        self
    }

    /// Make every call fail with an [`Error::AiProvider`] carrying `message`.
    pub fn with_failure(self, message: String) -> Self {
        *self.fail_with.lock().unwrap() = Some(message);
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// History sent on the most recent call.
    pub fn last_history(&self) -> Vec<ChatMessage> {
        self.last_history.lock().unwrap().clone()
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatService for MockChatClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;
        *self.last_history.lock().unwrap() = messages.to_vec();

        if let Some(message) = self.fail_with.lock().unwrap().clone() {
            return Err(Error::AiProvider(message));
        }

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            let last = messages.last().map(|m| m.content.as_str()).unwrap_or("");
            Ok(format!("You said: {}", last))
        } else {
            let index = (*count - 1) % responses.len();
            Ok(responses[index].clone())
        }
    }
}

/// Mock image generator returning a fixed URL or queued images.
#[derive(Clone)]
pub struct MockImageGenerationClient {
    image_responses: Arc<Mutex<Vec<GeneratedImage>>>,
    fail_with: Arc<Mutex<Option<String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockImageGenerationClient {
    pub fn new() -> Self {
        Self {
            image_responses: Arc::new(Mutex::new(Vec::new())),
            fail_with: Arc::new(Mutex::new(None)),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_image_response(self, response: GeneratedImage) -> Self {
        self.image_responses.lock().unwrap().push(response);
        self
    }

    pub fn with_failure(self, message: String) -> Self {
        *self.fail_with.lock().unwrap() = Some(message);
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockImageGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenerationService for MockImageGenerationClient {
    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage> {
        ensure_not_blank(prompt, "image prompt")?;

        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        if let Some(message) = self.fail_with.lock().unwrap().clone() {
            return Err(Error::AiProvider(message));
        }

        let responses = self.image_responses.lock().unwrap();
        if responses.is_empty() {
            Ok(GeneratedImage::Url(format!(
                "https://mock.images/{}.png",
                *count
            )))
        } else {
            let index = (*count - 1) % responses.len();
            Ok(responses[index].clone())
        }
    }
}

/// Mock embedding client backed by a text -> vector table.
///
/// Texts without an entry fail as a provider error, so tests notice
/// unexpected lookups. `get_call_count` counts provider round-trips (one
/// per `embed_texts` call); blank inputs are rejected before counting.
#[derive(Clone)]
pub struct MockEmbeddingClient {
    embeddings: Arc<Mutex<HashMap<String, Vec<f32>>>>,
    failing_texts: Arc<Mutex<HashMap<String, String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockEmbeddingClient {
    pub fn new() -> Self {
        Self {
            embeddings: Arc::new(Mutex::new(HashMap::new())),
            failing_texts: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_embedding(self, text: &str, values: Vec<f32>) -> Self {
        self.embeddings
            .lock()
            .unwrap()
            .insert(text.to_string(), values);
        self
    }

    /// Make lookups of `text` fail with an [`Error::AiProvider`] carrying `message`.
    pub fn with_failure(self, text: &str, message: String) -> Self {
        self.failing_texts
            .lock()
            .unwrap()
            .insert(text.to_string(), message);
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockEmbeddingClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingService for MockEmbeddingClient {
    async fn embed_texts(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        for text in texts {
            ensure_not_blank(text, "embedding input")?;
        }

        *self.call_count.lock().unwrap() += 1;

        let failing = self.failing_texts.lock().unwrap();
        let embeddings = self.embeddings.lock().unwrap();

        texts
            .iter()
            .map(|text| {
                if let Some(message) = failing.get(*text) {
                    return Err(Error::AiProvider(message.clone()));
                }
                let values = embeddings.get(*text).cloned().ok_or_else(|| {
                    Error::AiProvider(format!("No mock embedding for '{}'", text))
                })?;
                EmbeddingVector::new(values)
                    .map_err(|e| Error::AiProvider(format!("Malformed mock embedding: {}", e)))
            })
            .collect()
    }
}
