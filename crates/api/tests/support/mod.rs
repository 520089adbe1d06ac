#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};

use api::{AppState, RelayConfig};
use common::pairs::find_pair;
use common::{NarrationRequest, Narrator, RateSource, Result, Timeframe};
use engine::{AnchorResolver, Engine, EngineHandle, Session, TickGenerator};
use strategy::HiddenEntryStrategy;

struct FixedRates;

#[async_trait]
impl RateSource for FixedRates {
    async fn usd_rates(&self) -> Result<HashMap<String, f64>> {
        Ok(HashMap::from([("USD".to_string(), 1.0), ("EUR".to_string(), 0.8)]))
    }
}

struct CannedNarrator;

#[async_trait]
impl Narrator for CannedNarrator {
    async fn narrate(&self, _: &NarrationRequest) -> String {
        "Momentum fading, PUT.".into()
    }
}

/// Engine plus handle, not yet running.
pub fn engine() -> (Engine, EngineHandle) {
    let session = Session::new(
        find_pair("EURUSD_OTC").unwrap(),
        Timeframe::S15,
        TickGenerator::new(Some(3)),
        Box::new(HiddenEntryStrategy::default()),
    );
    Engine::new(
        session,
        AnchorResolver::new(Arc::new(FixedRates)),
        Arc::new(CannedNarrator),
        None,
    )
}

pub fn relay_config(api_key: Option<&str>, upstream_url: &str) -> RelayConfig {
    RelayConfig {
        api_key: api_key.map(str::to_string),
        model: "gpt-4o-mini".into(),
        upstream_url: upstream_url.into(),
    }
}

pub fn state(handle: EngineHandle, relay: RelayConfig) -> AppState {
    AppState::new(handle, relay).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_json(resp: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
