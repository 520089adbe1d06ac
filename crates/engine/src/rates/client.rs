use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use common::{Error, RateSource, Result};

use super::cache::RatesCache;

/// REST client for the public USD rate table, with an optional file cache.
pub struct HttpRateSource {
    url: String,
    http: Client,
    cache: Option<RatesCache>,
}

impl HttpRateSource {
    pub fn new(url: impl Into<String>, cache: Option<RatesCache>) -> Result<Self> {
        let http = Client::builder()
            .use_rustls_tls()
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;
        Ok(Self::with_client(url, http, cache))
    }

    pub fn with_client(url: impl Into<String>, http: Client, cache: Option<RatesCache>) -> Self {
        Self {
            url: url.into(),
            http,
            cache,
        }
    }

    async fn fetch(&self) -> Result<HashMap<String, f64>> {
        debug!(url = %self.url, "Fetching USD rate table");
        let resp = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Rates(format!("HTTP {status} from rate endpoint")));
        }

        let body: RatesResponse = resp.json().await.map_err(|e| Error::Http(e.to_string()))?;
        if body.base != "USD" {
            return Err(Error::Rates(format!(
                "expected USD-based table, got '{}'",
                body.base
            )));
        }
        Ok(body.rates)
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    async fn usd_rates(&self) -> Result<HashMap<String, f64>> {
        let now = Utc::now();
        if let Some(rates) = self.cache.as_ref().and_then(|c| c.load_fresh(now)) {
            debug!(currencies = rates.len(), "Using cached rate table");
            return Ok(rates);
        }

        let rates = self.fetch().await?;
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.store(&rates, now) {
                warn!(error = %e, "Failed to write rates cache");
            }
        }
        Ok(rates)
    }
}

// ─── Response types ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RatesResponse {
    base: String,
    rates: HashMap<String, f64>,
}
