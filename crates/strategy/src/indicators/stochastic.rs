use serde::{Deserialize, Serialize};

use common::MarketPoint;

/// How %D is derived from %K.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StochasticDMode {
    /// %D is reported equal to the latest %K. Signal thresholds are tuned
    /// against this behavior.
    #[default]
    Approximate,
    /// %D is the SMA of the last `d_period` %K values.
    Smoothed,
}

/// Latest %K / %D pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StochasticValue {
    pub k: f64,
    pub d: f64,
}

/// Stochastic oscillator.
///
/// %K = (close - lowest low) / (highest high - lowest low) * 100 over the last
/// `k_period` points, using each point's `low`/`high`. A flat range reports
/// 50 for both lines.
#[derive(Debug, Clone)]
pub struct StochasticIndicator {
    pub k_period: usize,
    pub d_period: usize,
    pub d_mode: StochasticDMode,
}

impl StochasticIndicator {
    pub fn new(k_period: usize, d_period: usize, d_mode: StochasticDMode) -> Self {
        assert!(k_period >= 1, "Stochastic %K period must be >= 1");
        assert!(d_period >= 1, "Stochastic %D period must be >= 1");
        Self {
            k_period,
            d_period,
            d_mode,
        }
    }

    pub fn min_points(&self) -> usize {
        self.k_period + self.d_period
    }

    /// Returns `None` until `k_period + d_period` points are available.
    pub fn compute(&self, points: &[MarketPoint]) -> Option<StochasticValue> {
        if points.len() < self.min_points() {
            return None;
        }

        let k = match percent_k(&points[points.len() - self.k_period..]) {
            Some(k) => k,
            None => return Some(StochasticValue { k: 50.0, d: 50.0 }),
        };

        let d = match self.d_mode {
            StochasticDMode::Approximate => k,
            StochasticDMode::Smoothed => {
                let sum: f64 = (0..self.d_period)
                    .map(|lag| {
                        let end = points.len() - lag;
                        percent_k(&points[end - self.k_period..end]).unwrap_or(50.0)
                    })
                    .sum();
                sum / self.d_period as f64
            }
        };

        Some(StochasticValue { k, d })
    }
}

/// %K for the last point of `window`; `None` when the range is flat.
fn percent_k(window: &[MarketPoint]) -> Option<f64> {
    let close = window.last()?.close;
    let lowest_low = window.iter().map(|p| p.low).fold(f64::INFINITY, f64::min);
    let highest_high = window
        .iter()
        .map(|p| p.high)
        .fold(f64::NEG_INFINITY, f64::max);

    if highest_high == lowest_low {
        return None;
    }
    Some((close - lowest_low) / (highest_high - lowest_low) * 100.0)
}
