//! Gemini client against a mock HTTP server.

use weatherchat_core::{
    LanguageModel, LlmError, config::GeminiConfig, llm::gemini::GeminiClient,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

const GENERATE_PATH: &str = "/models/gemini-2.5-flash:generateContent";

fn client(server: &MockServer) -> GeminiClient {
    let config = GeminiConfig {
        base_url: server.uri(),
        ..Default::default()
    };
    GeminiClient::new("TEST_KEY".into(), config)
}

fn answer(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }], "role": "model" },
            "finishReason": "STOP",
            "index": 0
        }],
        "usageMetadata": {
            "promptTokenCount": 12,
            "candidatesTokenCount": 3,
            "totalTokenCount": 15
        }
    })
}

#[tokio::test]
async fn generate_posts_prompt_with_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "TEST_KEY"))
        .and(body_partial_json(serde_json::json!({
            "contents": [{ "parts": [{ "text": "Qual a capital do clima?" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(answer("São Paulo")))
        .expect(1)
        .mount(&server)
        .await;

    let text = client(&server).generate("Qual a capital do clima?").await.unwrap();
    assert_eq!(text, "São Paulo");
}

#[tokio::test]
async fn http_error_is_request_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let err = client(&server).generate("oi").await.unwrap_err();
    assert!(matches!(err, LlmError::RequestFailed(msg) if msg.contains("503")));
}

#[tokio::test]
async fn malformed_json_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client(&server).generate("oi").await.unwrap_err();
    assert!(matches!(err, LlmError::ParseError(_)));
}

#[tokio::test]
async fn no_candidates_is_empty_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&server)
        .await;

    let err = client(&server).generate("oi").await.unwrap_err();
    assert!(matches!(err, LlmError::EmptyResponse));
}
