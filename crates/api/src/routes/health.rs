use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::AppState;

pub fn health_router() -> Router<AppState> {
    Router::new().route("/healthz", get(healthz))
}

/// Liveness plus the engine's current state.
async fn healthz(State(state): State<AppState>) -> Json<Value> {
    let snapshot = state.engine.snapshot().await;
    Json(json!({
        "status": "ok",
        "bot_state": snapshot.bot_state.to_string(),
        "pair": snapshot.pair.id,
    }))
}
