use std::path::PathBuf;
use std::str::FromStr;

use crate::{Error, Result};

pub const DEFAULT_RATES_URL: &str = "https://api.exchangerate-api.com/v4/latest/USD";
pub const DEFAULT_AI_UPSTREAM_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_AI_MODEL: &str = "gpt-4o-mini";

/// All configuration loaded from environment variables at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // Dashboard / relay server
    pub dashboard_port: u16,

    // Anchor price lookup
    pub rates_url: String,
    pub rates_cache_dir: PathBuf,

    // Persisted selection
    pub settings_path: PathBuf,

    // Optional TOML file overriding indicator periods and thresholds
    pub signal_config_path: Option<PathBuf>,

    /// Fixed seed for the tick generator. Entropy-seeded when unset.
    pub rng_seed: Option<u64>,

    // AI narration
    pub genai_api_key: Option<String>,
    pub ai_model: String,
    pub ai_upstream_url: String,
    /// Where the narration client posts prompts. Defaults to this server's relay.
    pub relay_url: String,
}

impl Config {
    /// Load configuration from the environment, reading `.env` if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // ignore error if .env not present

        let dashboard_port = parse_env("PS_DASHBOARD_PORT")?.unwrap_or(8080);

        Ok(Config {
            dashboard_port,
            rates_url: optional_env("PS_RATES_URL")
                .unwrap_or_else(|| DEFAULT_RATES_URL.to_string()),
            rates_cache_dir: optional_env("PS_RATES_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".pocketsignal_cache")),
            settings_path: optional_env("PS_SETTINGS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("pocketsignal.toml")),
            signal_config_path: optional_env("PS_SIGNAL_CONFIG_PATH").map(PathBuf::from),
            rng_seed: parse_env("PS_RNG_SEED")?,
            genai_api_key: optional_env("GENAI_API_KEY"),
            ai_model: optional_env("PS_AI_MODEL").unwrap_or_else(|| DEFAULT_AI_MODEL.to_string()),
            ai_upstream_url: optional_env("PS_AI_UPSTREAM_URL")
                .unwrap_or_else(|| DEFAULT_AI_UPSTREAM_URL.to_string()),
            relay_url: optional_env("PS_RELAY_URL")
                .unwrap_or_else(|| format!("http://127.0.0.1:{dashboard_port}/api/ai")),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T: FromStr>(key: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match optional_env(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| Error::Config(format!("{key}='{raw}' is invalid: {e}"))),
    }
}
