use super::client::OpenAiHttpClient;
use super::types::{ImageGenerationRequest, ImageGenerationResponse};
use crate::ai::{ensure_not_blank, ImageGenerationService};
use crate::image::GeneratedImage;
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;

const IMAGE_GENERATIONS_PATH: &str = "/v1/images/generations";
const IMAGE_SIZE: &str = "1024x1024";

pub struct OpenAiImageClient {
    http: OpenAiHttpClient,
    model: String,
}

impl OpenAiImageClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, Duration::from_secs(60), reqwest::Client::new())
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

super::impl_with_openai_base_url!(OpenAiImageClient);

#[async_trait]
impl ImageGenerationService for OpenAiImageClient {
    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage> {
        ensure_not_blank(prompt, "image prompt")?;

        let request = ImageGenerationRequest {
            model: &self.model,
            prompt,
            n: 1,
            size: IMAGE_SIZE,
        };

        let response: ImageGenerationResponse =
            self.http.post(IMAGE_GENERATIONS_PATH, &request).await?;

        let image_data = response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| Error::AiProvider("No image data in OpenAI response".to_string()))?;

        let image = if let Some(url) = image_data.url.filter(|url| !url.is_empty()) {
            GeneratedImage::Url(url)
        } else if let Some(b64_json) = image_data.b64_json {
            use base64::Engine as _;
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(b64_json)
                .map_err(|e| {
                    Error::AiProvider(format!("Failed to decode base64 image: {}", e))
                })?;
            GeneratedImage::Bytes(bytes)
        } else {
            return Err(Error::AiProvider(
                "No image data (neither base64 nor URL) in response".to_string(),
            ));
        };

        tracing::info!("Generated image with {}", self.model);
        Ok(image)
    }
}
