use std::collections::HashMap;

use async_trait::async_trait;

use crate::{NarrationRequest, Result};

/// Source of a USD-denominated exchange-rate table (`1 USD = rate[CCY] CCY`).
///
/// `HttpRateSource` in `crates/engine` implements this against the public
/// rates endpoint with a one-hour file cache. Tests substitute fixed tables.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn usd_rates(&self) -> Result<HashMap<String, f64>>;
}

/// Produces free-text commentary for the current indicator snapshot.
///
/// Implementations never fail: any error is turned into a fixed message.
#[async_trait]
pub trait Narrator: Send + Sync {
    async fn narrate(&self, request: &NarrationRequest) -> String;
}
