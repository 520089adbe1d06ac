use chrono::{DateTime, Utc};
use tracing::{debug, info};

use common::{MarketPoint, PairConfig};

use crate::classifier::SignalRules;
use crate::config::SignalParams;
use crate::indicators::IndicatorEngine;
use crate::{Evaluation, Strategy};

/// RSI + stochastic + trend confirmation ("hidden entry") strategy.
pub struct HiddenEntryStrategy {
    indicators: IndicatorEngine,
    rules: SignalRules,
    min_window: usize,
}

impl HiddenEntryStrategy {
    pub fn new(params: &SignalParams) -> Self {
        info!(
            rsi = params.rsi_period,
            sma = params.sma_period,
            stoch_k = params.stoch_k_period,
            stoch_d = params.stoch_d_period,
            d_mode = ?params.stoch_d_mode,
            "Hidden-entry strategy configured"
        );
        Self {
            indicators: IndicatorEngine::new(params),
            rules: SignalRules::new(params),
            min_window: params.min_window(),
        }
    }
}

impl Default for HiddenEntryStrategy {
    fn default() -> Self {
        Self::new(&SignalParams::default())
    }
}

impl Strategy for HiddenEntryStrategy {
    fn name(&self) -> &str {
        "hidden-entry"
    }

    fn evaluate(&self, points: &[MarketPoint], pair: &PairConfig, now: DateTime<Utc>) -> Evaluation {
        let indicators = self.indicators.snapshot(points);

        if points.len() < self.min_window {
            return Evaluation {
                indicators,
                candidate: None,
            };
        }

        let candidate = self.rules.classify(&indicators, &pair.display_name, now);
        if let Some(signal) = &candidate {
            debug!(
                pair = %pair.id,
                kind = %signal.kind,
                strength = signal.strength,
                "Candidate signal"
            );
        }

        Evaluation {
            indicators,
            candidate,
        }
    }
}
