use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use common::{Config, SettingsStore};
use engine::{AnchorResolver, Engine, HttpRateSource, RatesCache, Session, TickGenerator};
use narrator::RelayNarrator;
use strategy::{HiddenEntryStrategy, SignalParams};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env().context("invalid configuration")?;
    info!(port = cfg.dashboard_port, "PocketSignal starting");
    if cfg.genai_api_key.is_none() {
        warn!("GENAI_API_KEY not set, AI relay will reject requests");
    }

    // ── Signal parameters ─────────────────────────────────────────────────────
    let params = match &cfg.signal_config_path {
        Some(path) => SignalParams::load(path)
            .with_context(|| format!("failed to load signal config {}", path.display()))?,
        None => SignalParams::default(),
    };

    // ── Persisted selection ───────────────────────────────────────────────────
    let store = SettingsStore::new(&cfg.settings_path);
    let settings = store.load();
    info!(pair = %settings.pair.id, timeframe = %settings.timeframe, "Restored selection");

    // ── Collaborators ─────────────────────────────────────────────────────────
    let rates = HttpRateSource::new(&cfg.rates_url, Some(RatesCache::new(&cfg.rates_cache_dir)))
        .context("failed to build rates client")?;
    let narrator = RelayNarrator::new(&cfg.relay_url).context("failed to build narration client")?;

    // ── Engine ────────────────────────────────────────────────────────────────
    let session = Session::new(
        settings.pair,
        settings.timeframe,
        TickGenerator::new(cfg.rng_seed),
        Box::new(HiddenEntryStrategy::new(&params)),
    );
    let (engine, engine_handle) = Engine::new(
        session,
        AnchorResolver::new(Arc::new(rates)),
        Arc::new(narrator),
        Some(store),
    );

    // ── Dashboard API + AI relay ──────────────────────────────────────────────
    let api_state = api::AppState::new(engine_handle, api::RelayConfig::from_config(&cfg))
        .context("failed to build relay client")?;

    // ── Spawn all tasks ───────────────────────────────────────────────────────
    let port = cfg.dashboard_port;
    tokio::spawn(engine.run());
    let server = tokio::spawn(api::serve(api_state, port));

    info!("All subsystems started. Waiting for shutdown signal.");
    tokio::select! {
        res = server => {
            res.context("API server task panicked")?
                .context("API server stopped")?;
        }
        res = tokio::signal::ctrl_c() => {
            res.context("failed to listen for shutdown signal")?;
            info!("Shutdown signal received. Exiting.");
        }
    }
    Ok(())
}
