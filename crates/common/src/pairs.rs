use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const RSI_PERIOD: usize = 14;
pub const SMA_PERIOD: usize = 20;
pub const STOCH_K_PERIOD: usize = 14;
pub const STOCH_D_PERIOD: usize = 3;

pub const OVERBOUGHT_THRESHOLD: f64 = 70.0;
pub const OVERSOLD_THRESHOLD: f64 = 30.0;

/// Maximum number of ticks kept in the rolling window.
pub const WINDOW_CAPACITY: usize = 60;

/// (id, display name, volatility) for every simulated OTC pair.
const PAIR_TABLE: [(&str, &str, f64); 12] = [
    ("AUDCHF_OTC", "AUD/CHF (OTC)", 0.0004),
    ("AUDNZD_OTC", "AUD/NZD (OTC)", 0.0005),
    ("CADCHF_OTC", "CAD/CHF (OTC)", 0.0004),
    ("EURGBP_OTC", "EUR/GBP (OTC)", 0.0003),
    ("EURNZD_OTC", "EUR/NZD (OTC)", 0.0006),
    ("EURUSD_OTC", "EUR/USD (OTC)", 0.0004),
    ("GBPUSD_OTC", "GBP/USD (OTC)", 0.0005),
    ("USDEGP_OTC", "USD/EGP (OTC)", 0.0012),
    ("USDJPY_OTC", "USD/JPY (OTC)", 0.0006),
    ("CHFJPY_OTC", "CHF/JPY (OTC)", 0.0006),
    ("USDCAD_OTC", "USD/CAD (OTC)", 0.0005),
    ("CADJPY_OTC", "CAD/JPY (OTC)", 0.0007),
];

/// Static description of a tradable pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairConfig {
    pub id: String,
    pub display_name: String,
    /// Scale of the random walk, in price units per tick.
    pub volatility: f64,
}

/// The full pair catalog, in display order.
pub fn trading_pairs() -> Vec<PairConfig> {
    PAIR_TABLE
        .iter()
        .map(|&(id, name, volatility)| PairConfig {
            id: id.to_string(),
            display_name: name.to_string(),
            volatility,
        })
        .collect()
}

pub fn find_pair(id: &str) -> Option<PairConfig> {
    trading_pairs().into_iter().find(|p| p.id == id)
}

pub fn default_pair() -> PairConfig {
    let (id, name, volatility) = PAIR_TABLE[0];
    PairConfig {
        id: id.to_string(),
        display_name: name.to_string(),
        volatility,
    }
}

/// Expiration timeframe picked by the user. Only changes the tick cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Timeframe {
    #[default]
    #[serde(rename = "15s")]
    S15,
    #[serde(rename = "30s")]
    S30,
    #[serde(rename = "1m")]
    M1,
}

impl Timeframe {
    pub const ALL: [Timeframe; 3] = [Timeframe::S15, Timeframe::S30, Timeframe::M1];

    /// Timer cadence. The three timeframes tick at a 1:2:4 ratio.
    pub fn tick_interval(self) -> Duration {
        match self {
            Timeframe::S15 => Duration::from_millis(1000),
            Timeframe::S30 => Duration::from_millis(2000),
            Timeframe::M1 => Duration::from_millis(4000),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Timeframe::S15 => "15 Seconds",
            Timeframe::S30 => "30 Seconds",
            Timeframe::M1 => "1 Minute",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Timeframe::S15 => "15s",
            Timeframe::S30 => "30s",
            Timeframe::M1 => "1m",
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Timeframe {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timeframe::ALL
            .into_iter()
            .find(|tf| tf.as_str() == s)
            .ok_or_else(|| crate::Error::Config(format!("unknown timeframe '{s}'")))
    }
}
