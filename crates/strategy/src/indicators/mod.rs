pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod trend;

pub use rsi::RsiIndicator;
pub use sma::SmaIndicator;
pub use stochastic::{StochasticDMode, StochasticIndicator, StochasticValue};
pub use trend::TrendIndicator;

use common::{IndicatorSnapshot, MarketPoint};

use crate::config::SignalParams;

/// Computes every indicator the classifier reads, with configured periods.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    rsi: RsiIndicator,
    stochastic: StochasticIndicator,
    trend: TrendIndicator,
}

impl IndicatorEngine {
    pub fn new(params: &SignalParams) -> Self {
        Self {
            rsi: RsiIndicator::new(params.rsi_period),
            stochastic: StochasticIndicator::new(
                params.stoch_k_period,
                params.stoch_d_period,
                params.stoch_d_mode,
            ),
            trend: TrendIndicator::new(params.sma_period),
        }
    }

    pub fn snapshot(&self, points: &[MarketPoint]) -> IndicatorSnapshot {
        let stoch = self.stochastic.compute(points);
        IndicatorSnapshot {
            rsi: self.rsi.compute(points),
            trend: self.trend.compute(points),
            stoch_k: stoch.map(|s| s.k),
            stoch_d: stoch.map(|s| s.d),
        }
    }
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new(&SignalParams::default())
    }
}
