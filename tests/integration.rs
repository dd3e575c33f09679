use guess_ai::{
    ai::{EmbeddingService, MockChatClient, MockEmbeddingClient, MockImageGenerationClient},
    app::{App, AppServices},
    game::{GuessEvaluator, RoundPhase},
    image::GeneratedImage,
    models::{ChatMessage, Config},
    semantic::{score, EmbeddingVector},
    Error,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mock_app(
    chat: MockChatClient,
    images: MockImageGenerationClient,
    embeddings: MockEmbeddingClient,
) -> App {
    App::with_services(AppServices {
        chat: Arc::new(chat),
        image_gen: Arc::new(images),
        embeddings: Arc::new(embeddings),
    })
}

fn test_config(server: &MockServer) -> Config {
    Config {
        openai_api_key: "sk-test".to_string(),
        openai_base_url: Some(server.uri()),
        chat_model: "gpt-4o".to_string(),
        image_model: "dall-e-3".to_string(),
        embedding_model: "text-embedding-3-small".to_string(),
        request_timeout: Duration::from_secs(5),
    }
}

#[tokio::test]
async fn test_full_round_with_mocks() {
    let images = MockImageGenerationClient::new().with_image_response(GeneratedImage::Url(
        "https://images.example/lighthouse.png".to_string(),
    ));
    let embeddings = MockEmbeddingClient::new()
        .with_embedding("a lighthouse in a storm", vec![0.9, 0.1, 0.4])
        .with_embedding("stormy lighthouse", vec![0.9, 0.1, 0.4]);
    let app = mock_app(MockChatClient::new(), images.clone(), embeddings.clone());

    let game = app.guess_game();
    let mut round = game.start_round("a lighthouse in a storm").await.unwrap();
    assert_eq!(
        round.image().display_source(),
        "https://images.example/lighthouse.png"
    );

    let result = game
        .submit_guess(&mut round, "stormy lighthouse")
        .await
        .unwrap();

    assert_eq!(result.value(), 100);
    assert_eq!(round.phase(), RoundPhase::Results);
    assert_eq!(images.get_call_count(), 1);
    assert_eq!(embeddings.get_call_count(), 2);
}

#[tokio::test]
async fn test_next_round_is_independent() {
    let embeddings = MockEmbeddingClient::new()
        .with_embedding("first prompt", vec![1.0, 0.0])
        .with_embedding("second prompt", vec![0.0, 1.0])
        .with_embedding("guess", vec![1.0, 0.0]);
    let app = mock_app(
        MockChatClient::new(),
        MockImageGenerationClient::new(),
        embeddings,
    );
    let game = app.guess_game();

    let mut first = game.start_round("first prompt").await.unwrap();
    let mut second = game.start_round("second prompt").await.unwrap();
    assert_ne!(first.id(), second.id());

    assert_eq!(game.submit_guess(&mut first, "guess").await.unwrap().value(), 100);
    assert_eq!(game.submit_guess(&mut second, "guess").await.unwrap().value(), 0);
}

#[tokio::test]
async fn test_evaluate_guess_empty_reference_makes_no_network_call() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let app = App::from_config(&test_config(&server));

    let err = app
        .evaluator()
        .evaluate_guess("", "anything")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[tokio::test]
async fn test_evaluate_guess_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(body_string_contains("\"input\":[\"a red balloon\"]"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{"index": 0, "embedding": [1.0, 1.0]}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(body_string_contains("\"input\":[\"the opposite\"]"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{"index": 0, "embedding": [-1.0, -1.0]}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = App::from_config(&test_config(&server));

    let result = app
        .evaluator()
        .evaluate_guess("a red balloon", "the opposite")
        .await
        .unwrap();
    assert_eq!(result.value(), -100);
}

#[tokio::test]
async fn test_evaluate_guess_provider_failure_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let app = App::from_config(&test_config(&server));

    let err = app
        .evaluator()
        .evaluate_guess("reference", "guess")
        .await
        .unwrap_err();
    assert!(err.is_provider_error());
}

#[tokio::test]
async fn test_chat_conversation_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{
                "message": { "role": "assistant", "content": "Paris." },
                "finish_reason": "stop"
            }]
        })))
        .mount(&server)
        .await;

    let app = App::from_config(&test_config(&server));
    let mut session = app.chat_session();

    let reply = session.send("Capital of France?").await.unwrap();
    assert_eq!(reply, "Paris.");
    assert_eq!(
        session.messages(),
        &[
            ChatMessage::user("Capital of France?"),
            ChatMessage::assistant("Paris.")
        ]
    );
}

#[tokio::test]
async fn test_image_generation_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{ "url": "https://images.example/castle.png" }]
        })))
        .mount(&server)
        .await;

    let app = App::from_config(&test_config(&server));

    let image = app.generate_image("a castle in the clouds").await.unwrap();
    assert_eq!(
        image,
        GeneratedImage::Url("https://images.example/castle.png".to_string())
    );
}

#[tokio::test]
async fn test_evaluator_accepts_any_embedding_service() {
    let service: Arc<dyn EmbeddingService> = Arc::new(
        MockEmbeddingClient::new()
            .with_embedding("x", vec![3.0, 4.0])
            .with_embedding("y", vec![6.0, 8.0]),
    );
    let evaluator = GuessEvaluator::new(service);

    assert_eq!(evaluator.evaluate_guess("x", "y").await.unwrap().value(), 100);
}

#[test]
fn test_scorer_properties() {
    let a = EmbeddingVector::new(vec![0.2, -0.5, 0.7, 0.1]).unwrap();
    let b = EmbeddingVector::new(vec![-0.3, 0.4, 0.6, 0.9]).unwrap();

    assert_eq!(score(&a, &a).unwrap().value(), 100);
    assert_eq!(score(&a, &b).unwrap(), score(&b, &a).unwrap());

    let s = score(&a, &b).unwrap().value();
    assert!((-100..=100).contains(&s));

    let mismatch = EmbeddingVector::new(vec![1.0, 2.0, 3.0]).unwrap();
    assert!(matches!(
        score(&a, &mismatch).unwrap_err(),
        Error::DimensionMismatch { .. }
    ));
}
