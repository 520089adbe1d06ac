pub mod routes;

use std::net::SocketAddr;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use common::{Config, Error, Result};
use engine::EngineHandle;

/// Upstream chat-completion settings used by the AI relay.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub upstream_url: String,
}

impl RelayConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            api_key: config.genai_api_key.clone(),
            model: config.ai_model.clone(),
            upstream_url: config.ai_upstream_url.clone(),
        }
    }
}

/// Shared application state injected into every route handler.
#[derive(Clone)]
pub struct AppState {
    pub engine: EngineHandle,
    pub relay: RelayConfig,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(engine: EngineHandle, relay: RelayConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;
        Ok(Self { engine, relay, http })
    }
}

/// All routes with CORS applied.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods(Any);

    Router::new()
        .merge(routes::api_router())
        .merge(routes::ai_router())
        .merge(routes::ws_router())
        .merge(routes::health_router())
        .with_state(state)
        .layer(cors)
}

/// Build and run the dashboard and relay server.
pub async fn serve(state: AppState, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router(state);

    info!(%addr, "Dashboard API listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
