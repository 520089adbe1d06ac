use chrono::{DateTime, Utc};

use common::{IndicatorSnapshot, Signal, SignalType, Trend};

use crate::config::SignalParams;

pub const REASON_DOUBLE_OVERBOUGHT: &str = "Double Overbought (RSI + Stoch) - Reversal Imminent";
pub const REASON_DOUBLE_OVERSOLD: &str = "Double Oversold (RSI + Stoch) - Bounce Imminent";
pub const REASON_TREND_CONTINUATION: &str = "Trend Continuation (Hidden Entry)";
pub const REASON_SCANNING: &str = "Scanning for High Probability Setup...";

/// Strength cap for the double-extreme rules.
pub const MAX_STRENGTH: f64 = 99.0;
/// Fixed strength of the trend-continuation rules.
pub const CONTINUATION_STRENGTH: f64 = 75.0;
/// A same-type signal must move by more than this to replace the shown one.
pub const STRENGTH_DEBOUNCE: f64 = 10.0;

// Trend-continuation bands
const BEARISH_RSI_FLOOR: f64 = 55.0;
const BEARISH_STOCH_FLOOR: f64 = 60.0;
const BULLISH_RSI_CEILING: f64 = 45.0;
const BULLISH_STOCH_CEILING: f64 = 40.0;

/// Classifier verdict before it is stamped with pair and time.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub kind: SignalType,
    pub strength: f64,
    pub reason: &'static str,
}

/// Ordered rule ladder; the first matching rule wins.
#[derive(Debug, Clone)]
pub struct SignalRules {
    overbought: f64,
    oversold: f64,
    stoch_overbought: f64,
    stoch_oversold: f64,
}

impl SignalRules {
    pub fn new(params: &SignalParams) -> Self {
        Self {
            overbought: params.overbought,
            oversold: params.oversold,
            stoch_overbought: params.stoch_overbought,
            stoch_oversold: params.stoch_oversold,
        }
    }

    /// Classify raw indicator values.
    pub fn verdict(&self, rsi: f64, stoch_k: f64, trend: Trend) -> Verdict {
        if rsi > self.overbought && stoch_k > self.stoch_overbought {
            let excess = (rsi - self.overbought) + (stoch_k - self.stoch_overbought);
            return Verdict {
                kind: SignalType::Put,
                strength: (excess * 2.0 + 60.0).min(MAX_STRENGTH),
                reason: REASON_DOUBLE_OVERBOUGHT,
            };
        }

        if rsi < self.oversold && stoch_k < self.stoch_oversold {
            let excess = (self.oversold - rsi) + (self.stoch_oversold - stoch_k);
            return Verdict {
                kind: SignalType::Call,
                strength: (excess * 2.0 + 60.0).min(MAX_STRENGTH),
                reason: REASON_DOUBLE_OVERSOLD,
            };
        }

        if trend == Trend::Down
            && rsi > BEARISH_RSI_FLOOR
            && rsi < self.overbought
            && stoch_k > BEARISH_STOCH_FLOOR
        {
            return Verdict {
                kind: SignalType::Put,
                strength: CONTINUATION_STRENGTH,
                reason: REASON_TREND_CONTINUATION,
            };
        }

        if trend == Trend::Up
            && rsi > self.oversold
            && rsi < BULLISH_RSI_CEILING
            && stoch_k < BULLISH_STOCH_CEILING
        {
            return Verdict {
                kind: SignalType::Call,
                strength: CONTINUATION_STRENGTH,
                reason: REASON_TREND_CONTINUATION,
            };
        }

        Verdict {
            kind: SignalType::Wait,
            strength: 0.0,
            reason: REASON_SCANNING,
        }
    }

    /// Build a candidate signal from a snapshot.
    /// Returns `None` while RSI or %K is still unavailable.
    pub fn classify(
        &self,
        indicators: &IndicatorSnapshot,
        pair_name: &str,
        now: DateTime<Utc>,
    ) -> Option<Signal> {
        let rsi = indicators.rsi?;
        let stoch_k = indicators.stoch_k?;
        let verdict = self.verdict(rsi, stoch_k, indicators.trend);

        Some(Signal {
            kind: verdict.kind,
            strength: verdict.strength,
            reason: verdict.reason.to_string(),
            timestamp: now,
            pair: pair_name.to_string(),
            indicators: *indicators,
        })
    }
}

impl Default for SignalRules {
    fn default() -> Self {
        Self::new(&SignalParams::default())
    }
}

/// Whether `candidate` should replace the signal currently on display.
pub fn should_replace(current: Option<&Signal>, candidate: &Signal) -> bool {
    match current {
        None => true,
        Some(current) => {
            current.kind != candidate.kind
                || (current.strength - candidate.strength).abs() > STRENGTH_DEBOUNCE
        }
    }
}

/// The signal to display after evaluating `candidate`.
/// A retained signal keeps its original timestamp.
pub fn next_displayed(current: Option<Signal>, candidate: Signal) -> Signal {
    match current {
        Some(current) if !should_replace(Some(&current), &candidate) => current,
        _ => candidate,
    }
}
