//! Gemini gateway against a mocked `generateContent` endpoint.

use olasis::chat::{GatewayError, GeminiGateway, LlmGateway};
use olasis::config::Config;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENDPOINT: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn config(mock: &MockServer) -> Config {
    Config {
        google_api_key: Some("test-key".to_string()),
        gemini_base_url: mock.uri(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_generate_sends_key_and_generation_config() {
    let mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "prompt text" }] }],
            "generationConfig": { "maxOutputTokens": 2000 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "Hello " }, { "text": "researcher" }] } }]
        })))
        .expect(1)
        .mount(&mock)
        .await;

    let gateway = GeminiGateway::new(&config(&mock)).unwrap();
    assert!(gateway.is_available());
    assert_eq!(gateway.model(), "gemini-2.5-flash");
    assert_eq!(gateway.generate("prompt text").await.unwrap(), "Hello researcher");
}

#[tokio::test]
async fn test_api_error_status() {
    let mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&mock)
        .await;

    let gateway = GeminiGateway::new(&config(&mock)).unwrap();
    match gateway.generate("p").await {
        Err(GatewayError::Api { code, message }) => {
            assert_eq!(code, 429);
            assert_eq!(message, "quota exceeded");
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_blank_candidate_is_empty_response() {
    let mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "   " }] } }]
        })))
        .mount(&mock)
        .await;

    let gateway = GeminiGateway::new(&config(&mock)).unwrap();
    assert!(matches!(gateway.generate("p").await, Err(GatewayError::EmptyResponse)));
}

#[tokio::test]
async fn test_missing_key_never_calls_api() {
    let mock = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock)
        .await;

    let gateway = GeminiGateway::new(&Config {
        gemini_base_url: mock.uri(),
        ..Default::default()
    })
    .unwrap();
    assert!(matches!(gateway.generate("p").await, Err(GatewayError::MissingCredentials)));
}
