//! Application wiring: builds the provider clients and hands out the chat,
//! image and game front-ends that share them.

use crate::ai::{
    ChatService, EmbeddingService, ImageGenerationService, OpenAiChatClient,
    OpenAiEmbeddingClient, OpenAiImageClient,
};
use crate::chat::ChatSession;
use crate::game::{GuessEvaluator, GuessGame};
use crate::image::GeneratedImage;
use crate::models::Config;
use crate::Result;
use std::sync::Arc;
use tracing::info;

/// Shared AI services behind the three features.
#[derive(Clone)]
pub struct App {
    chat: Arc<dyn ChatService>,
    image_gen: Arc<dyn ImageGenerationService>,
    embeddings: Arc<dyn EmbeddingService>,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub chat: Arc<dyn ChatService>,
    pub image_gen: Arc<dyn ImageGenerationService>,
    pub embeddings: Arc<dyn EmbeddingService>,
}

impl App {
    pub fn with_services(services: AppServices) -> Self {
        Self {
            chat: services.chat,
            image_gen: services.image_gen,
            embeddings: services.embeddings,
        }
    }

    /// Build OpenAI-backed services from configuration.
    pub fn from_config(config: &Config) -> Self {
        // Reuse one HTTP connection pool across provider clients.
        let http_client = reqwest::Client::new();
        let timeout = config.request_timeout;
        let key = config.openai_api_key.clone();

        let mut chat = OpenAiChatClient::new_with_client(
            key.clone(),
            config.chat_model.clone(),
            timeout,
            http_client.clone(),
        );
        let mut image_gen = OpenAiImageClient::new_with_client(
            key.clone(),
            config.image_model.clone(),
            timeout,
            http_client.clone(),
        );
        let mut embeddings = OpenAiEmbeddingClient::new_with_client(
            key,
            config.embedding_model.clone(),
            timeout,
            http_client,
        );

        if let Some(base_url) = &config.openai_base_url {
            info!("Using OpenAI base URL override: {}", base_url);
            chat = chat.with_base_url(base_url.clone());
            image_gen = image_gen.with_base_url(base_url.clone());
            embeddings = embeddings.with_base_url(base_url.clone());
        }

        info!(
            "Models: chat={}, image={}, embedding={}",
            config.chat_model, config.image_model, config.embedding_model
        );

        Self::with_services(AppServices {
            chat: Arc::new(chat),
            image_gen: Arc::new(image_gen),
            embeddings: Arc::new(embeddings),
        })
    }

    /// Construct an app from environment configuration (`Config::from_env`).
    pub fn from_env() -> Result<Self> {
        let config = Config::from_env()?;
        Ok(Self::from_config(&config))
    }

    pub fn chat_session(&self) -> ChatSession {
        ChatSession::new(Arc::clone(&self.chat))
    }

    pub fn evaluator(&self) -> GuessEvaluator {
        GuessEvaluator::new(Arc::clone(&self.embeddings))
    }

    pub fn guess_game(&self) -> GuessGame {
        GuessGame::new(Arc::clone(&self.image_gen), self.evaluator())
    }

    pub async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage> {
        self.image_gen.generate_image(prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{MockChatClient, MockEmbeddingClient, MockImageGenerationClient};
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_app_with_services_shares_mocks() {
        let chat = MockChatClient::new().with_response("hey".to_string());
        let images = MockImageGenerationClient::new();
        let embeddings = MockEmbeddingClient::new()
            .with_embedding("a red fox", vec![0.6, 0.8])
            .with_embedding("an orange fox", vec![0.6, 0.8]);

        let app = App::with_services(AppServices {
            chat: Arc::new(chat.clone()),
            image_gen: Arc::new(images.clone()),
            embeddings: Arc::new(embeddings.clone()),
        });

        assert_eq!(app.chat_session().send("hi").await.unwrap(), "hey");

        let game = app.guess_game();
        let mut round = game.start_round("a red fox").await.unwrap();
        let score = game.submit_guess(&mut round, "an orange fox").await.unwrap();
        assert_eq!(score.value(), 100);

        app.generate_image("another").await.unwrap();
        assert_eq!(images.get_call_count(), 2);
        assert_eq!(embeddings.get_call_count(), 2);
        assert_eq!(chat.get_call_count(), 1);
    }

    #[tokio::test]
    async fn test_from_config_honors_base_url_override() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{"index": 0, "embedding": [0.3, 0.4]}]
            })))
            .expect(2)
            .mount(&server)
            .await;

        let config = Config {
            openai_api_key: "sk-test".to_string(),
            openai_base_url: Some(server.uri()),
            chat_model: "gpt-4o".to_string(),
            image_model: "dall-e-3".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            request_timeout: Duration::from_secs(5),
        };

        let app = App::from_config(&config);
        let score = app
            .evaluator()
            .evaluate_guess("first", "second")
            .await
            .unwrap();
        assert_eq!(score.value(), 100);
    }
}
