use axum::{body::Bytes, extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::AppState;

pub fn ai_router() -> Router<AppState> {
    Router::new().route("/api/ai", post(relay))
}

#[derive(Deserialize)]
struct RelayRequest {
    prompt: Option<String>,
}

/// Forward a prompt to the chat-completion provider and return its JSON as-is.
///
/// The API key never leaves the server.
async fn relay(State(state): State<AppState>, body: Bytes) -> (StatusCode, Json<Value>) {
    let Some(api_key) = state.relay.api_key.as_deref() else {
        warn!("AI relay called without GENAI_API_KEY configured");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "GENAI_API_KEY is missing in server environment" })),
        );
    };

    let prompt = serde_json::from_slice::<RelayRequest>(&body)
        .ok()
        .and_then(|r| r.prompt)
        .filter(|p| !p.is_empty());
    let Some(prompt) = prompt else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing prompt" })),
        );
    };

    let payload = json!({
        "model": state.relay.model,
        "messages": [{ "role": "user", "content": prompt }],
    });

    debug!(model = %state.relay.model, chars = prompt.len(), "Relaying prompt");
    let result = async {
        let resp = state
            .http
            .post(&state.relay.upstream_url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;
        resp.json::<Value>().await
    }
    .await;

    match result {
        Ok(data) => (StatusCode::OK, Json(data)),
        Err(e) => {
            warn!(error = %e, "AI relay upstream request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        }
    }
}
