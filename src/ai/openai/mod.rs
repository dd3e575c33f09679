/// Adds a `with_base_url` builder to a client that wraps [`client::OpenAiHttpClient`]
/// in an `http` field.
macro_rules! impl_with_openai_base_url {
    ($client:ty) => {
        impl $client {
            pub fn with_base_url(mut self, base_url: String) -> Self {
                self.http = self.http.with_base_url(base_url);
                self
            }
        }
    };
}

pub(crate) use impl_with_openai_base_url;

pub mod chat;
pub mod client;
pub mod embedding;
pub mod image;
pub mod types;

pub use chat::OpenAiChatClient;
pub use embedding::OpenAiEmbeddingClient;
pub use image::OpenAiImageClient;

#[cfg(test)]
pub(crate) mod test_support {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockBuilder};

    pub const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
    pub const IMAGE_GENERATIONS_PATH: &str = "/v1/images/generations";
    pub const EMBEDDINGS_PATH: &str = "/v1/embeddings";

    pub fn post(endpoint: &str) -> MockBuilder {
        Mock::given(method("POST")).and(path(endpoint))
    }
}
