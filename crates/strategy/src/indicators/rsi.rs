use common::MarketPoint;

/// RSI (Relative Strength Index) indicator.
///
/// Plain averages over the last `period` close-to-close changes; there is no
/// Wilder smoothing across earlier history.
/// Returns `None` until at least `period + 1` points are available.
#[derive(Debug, Clone)]
pub struct RsiIndicator {
    pub period: usize,
}

impl RsiIndicator {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self { period }
    }

    /// Compute RSI from the window (oldest first).
    pub fn compute(&self, points: &[MarketPoint]) -> Option<f64> {
        if points.len() < self.period + 1 {
            return None;
        }

        let recent = &points[points.len() - self.period - 1..];
        let (gains, losses) = recent
            .windows(2)
            .map(|w| w[1].close - w[0].close)
            .fold((0.0, 0.0), |(gains, losses), change| {
                if change > 0.0 {
                    (gains + change, losses)
                } else {
                    (gains, losses + change.abs())
                }
            });

        let avg_gain = gains / self.period as f64;
        let avg_loss = losses / self.period as f64;

        if avg_loss == 0.0 {
            return Some(100.0);
        }

        let rs = avg_gain / avg_loss;
        Some(100.0 - 100.0 / (1.0 + rs))
    }
}
