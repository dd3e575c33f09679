//! OpenAI embedding client implementation.
//!
//! Uses `/v1/embeddings` to embed the reference prompt and the player's guess.

use super::client::OpenAiHttpClient;
use super::types::{EmbeddingsRequest, EmbeddingsResponse};
use crate::ai::{ensure_not_blank, EmbeddingService};
use crate::semantic::EmbeddingVector;
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;

const EMBEDDINGS_PATH: &str = "/v1/embeddings";

/// OpenAI implementation of [`EmbeddingService`].
pub struct OpenAiEmbeddingClient {
    http: OpenAiHttpClient,
    model: String,
}

impl OpenAiEmbeddingClient {
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

super::impl_with_openai_base_url!(OpenAiEmbeddingClient);

#[async_trait]
impl EmbeddingService for OpenAiEmbeddingClient {
    async fn embed_texts(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        for text in texts {
            ensure_not_blank(text, "embedding input")?;
        }

        let request = EmbeddingsRequest {
            model: &self.model,
            input: texts,
            // Raw floats rather than base64 so the body maps onto `Vec<f32>`.
            encoding_format: "float",
        };

        let response: EmbeddingsResponse = self.http.post(EMBEDDINGS_PATH, &request).await?;

        let mut indexed = response.data;
        indexed.sort_by_key(|item| item.index);

        if indexed.len() != texts.len() {
            return Err(Error::AiProvider(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                indexed.len()
            )));
        }

        if indexed
            .iter()
            .enumerate()
            .any(|(expected_idx, item)| item.index != expected_idx)
        {
            return Err(Error::AiProvider(
                "Embedding indices were non-contiguous or out of range".to_string(),
            ));
        }

        tracing::debug!(
            "Received {} embeddings from OpenAI (model: {})",
            indexed.len(),
            self.model
        );

        indexed
            .into_iter()
            .map(|item| {
                EmbeddingVector::new(item.embedding).map_err(|e| {
                    Error::AiProvider(format!("Malformed embedding at index {}: {}", item.index, e))
                })
            })
            .collect()
    }
}
