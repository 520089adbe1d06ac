use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use common::{Error, RateSource, Result};

pub const JPY_FALLBACK_PRICE: f64 = 145.50;
pub const DEFAULT_FALLBACK_PRICE: f64 = 1.0800;

/// Split a pair id such as `"AUDCHF_OTC"` into `("AUD", "CHF")`.
///
/// Anything after the first `_` is a suffix and ignored.
pub fn split_pair(pair_id: &str) -> Result<(String, String)> {
    let code = pair_id.split('_').next().unwrap_or_default();
    if code.len() < 6 || !code.chars().take(6).all(|c| c.is_ascii_alphabetic()) {
        return Err(Error::Rates(format!("malformed pair id '{pair_id}'")));
    }
    let code = code.to_ascii_uppercase();
    Ok((code[..3].to_string(), code[3..6].to_string()))
}

/// Static price used when no real rate can be resolved.
pub fn fallback_price(pair_id: &str) -> f64 {
    if pair_id.to_ascii_uppercase().contains("JPY") {
        JPY_FALLBACK_PRICE
    } else {
        DEFAULT_FALLBACK_PRICE
    }
}

/// Price of one `base` in `quote`, from a USD-keyed table.
pub fn cross_rate(rates: &HashMap<String, f64>, base: &str, quote: &str) -> Result<f64> {
    let lookup = |ccy: &str| {
        rates
            .get(ccy)
            .copied()
            .filter(|r| r.is_finite() && *r > 0.0)
            .ok_or_else(|| Error::Rates(format!("no usable rate for {ccy}")))
    };
    let base_rate = lookup(base)?;
    let quote_rate = lookup(quote)?;

    let rate = (1.0 / base_rate) * quote_rate;
    if !rate.is_finite() {
        return Err(Error::Rates(format!("non-finite cross rate {base}/{quote}")));
    }
    Ok(rate)
}

/// Resolves the real-world starting price for a simulated pair.
#[derive(Clone)]
pub struct AnchorResolver {
    source: Arc<dyn RateSource>,
}

impl AnchorResolver {
    pub fn new(source: Arc<dyn RateSource>) -> Self {
        Self { source }
    }

    /// Anchor price for `pair_id`. Never fails: any error logs a warning and
    /// yields [`fallback_price`].
    pub async fn resolve(&self, pair_id: &str) -> f64 {
        match self.try_resolve(pair_id).await {
            Ok(price) => {
                info!(pair = %pair_id, price, "Anchor price resolved");
                price
            }
            Err(e) => {
                let price = fallback_price(pair_id);
                warn!(pair = %pair_id, error = %e, price, "Could not fetch real price, using fallback");
                price
            }
        }
    }

    async fn try_resolve(&self, pair_id: &str) -> Result<f64> {
        let (base, quote) = split_pair(pair_id)?;
        let rates = self.source.usd_rates().await?;
        cross_rate(&rates, &base, &quote)
    }
}
