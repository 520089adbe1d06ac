use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{NarrationRequest, Narrator, Trend};
use narrator::{RelayNarrator, CONNECTIVITY_FALLBACK, INCONCLUSIVE};

fn request() -> NarrationRequest {
    NarrationRequest {
        pair_name: "EUR/USD (OTC)".into(),
        price: 1.0812,
        rsi: 24.5,
        stoch_k: 12.0,
        trend: Trend::Down,
    }
}

async fn relay(response: ResponseTemplate) -> (MockServer, RelayNarrator) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ai"))
        .respond_with(response)
        .mount(&server)
        .await;
    let narrator = RelayNarrator::new(format!("{}/api/ai", server.uri())).unwrap();
    (server, narrator)
}

#[tokio::test]
async fn returns_completion_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ai"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": "Oversold bounce forming. CALL." } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let narrator = RelayNarrator::new(format!("{}/api/ai", server.uri())).unwrap();
    assert_eq!(narrator.narrate(&request()).await, "Oversold bounce forming. CALL.");

    let received = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    let prompt = body["prompt"].as_str().unwrap();
    assert!(prompt.contains("EUR/USD (OTC)"));
    assert!(prompt.contains("RSI (14): 24.50"));
}

#[tokio::test]
async fn response_without_choices_is_inconclusive() {
    let (_server, narrator) = relay(ResponseTemplate::new(200).set_body_json(json!({ "id": "x" }))).await;
    assert_eq!(narrator.narrate(&request()).await, INCONCLUSIVE);
}

#[tokio::test]
async fn relay_error_is_connectivity_fallback() {
    let (_server, narrator) = relay(
        ResponseTemplate::new(500).set_body_json(json!({ "error": "GENAI_API_KEY is missing" })),
    )
    .await;
    assert_eq!(narrator.narrate(&request()).await, CONNECTIVITY_FALLBACK);
}

#[tokio::test]
async fn malformed_body_is_connectivity_fallback() {
    let (_server, narrator) = relay(ResponseTemplate::new(200).set_body_string("<html>")).await;
    assert_eq!(narrator.narrate(&request()).await, CONNECTIVITY_FALLBACK);
}

#[tokio::test]
async fn unreachable_relay_is_connectivity_fallback() {
    let narrator = RelayNarrator::new("http://127.0.0.1:9/api/ai").unwrap();
    assert_eq!(narrator.narrate(&request()).await, CONNECTIVITY_FALLBACK);
}
