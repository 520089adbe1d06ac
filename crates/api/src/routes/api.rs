use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use common::pairs::{find_pair, trading_pairs};
use common::{DashboardSnapshot, EngineCommand, PairConfig, Timeframe};

use crate::AppState;

pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/pairs", get(get_pairs))
        .route("/api/timeframes", get(get_timeframes))
        .route("/api/state", get(get_state))
        .route("/api/pair", post(post_pair))
        .route("/api/timeframe", post(post_timeframe))
        .route("/api/narrate", post(post_narrate))
}

// ─── Catalog ──────────────────────────────────────────────────────────────────

async fn get_pairs() -> Json<Vec<PairConfig>> {
    Json(trading_pairs())
}

async fn get_timeframes() -> Json<Value> {
    let timeframes: Vec<Value> = Timeframe::ALL
        .iter()
        .map(|tf| {
            json!({
                "value": tf.as_str(),
                "label": tf.label(),
                "tick_interval_ms": tf.tick_interval().as_millis() as u64,
            })
        })
        .collect();
    Json(Value::Array(timeframes))
}

// ─── State ────────────────────────────────────────────────────────────────────

async fn get_state(State(state): State<AppState>) -> Json<DashboardSnapshot> {
    Json(state.engine.snapshot().await)
}

// ─── Selection ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct PairRequest {
    pair_id: String,
}

async fn post_pair(
    State(state): State<AppState>,
    Json(body): Json<PairRequest>,
) -> (StatusCode, Json<Value>) {
    let Some(pair) = find_pair(&body.pair_id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("unknown pair '{}'", body.pair_id) })),
        );
    };
    info!(pair = %pair.id, "Pair selection requested");
    state.engine.send(EngineCommand::SelectPair(pair.id.clone())).await;
    (StatusCode::ACCEPTED, Json(json!({ "status": "accepted", "pair": pair.id })))
}

#[derive(Deserialize)]
struct TimeframeRequest {
    timeframe: Timeframe,
}

async fn post_timeframe(
    State(state): State<AppState>,
    Json(body): Json<TimeframeRequest>,
) -> (StatusCode, Json<Value>) {
    info!(timeframe = %body.timeframe, "Timeframe selection requested");
    state
        .engine
        .send(EngineCommand::SelectTimeframe(body.timeframe))
        .await;
    (
        StatusCode::ACCEPTED,
        Json(json!({ "status": "accepted", "timeframe": body.timeframe })),
    )
}

// ─── Narration ────────────────────────────────────────────────────────────────

async fn post_narrate(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    if state.engine.snapshot().await.signal.is_none() {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "error": "no signal to analyze yet" })),
        );
    }
    state.engine.send(EngineCommand::RequestNarration).await;
    (StatusCode::ACCEPTED, Json(json!({ "status": "accepted" })))
}
