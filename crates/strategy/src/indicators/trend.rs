use common::{MarketPoint, Trend};

use super::SmaIndicator;

/// Trend label: latest close against the SMA of the last `sma_period` closes.
#[derive(Debug, Clone)]
pub struct TrendIndicator {
    sma: SmaIndicator,
}

impl TrendIndicator {
    pub fn new(sma_period: usize) -> Self {
        Self {
            sma: SmaIndicator::new(sma_period),
        }
    }

    pub fn compute(&self, points: &[MarketPoint]) -> Trend {
        let Some(latest) = points.last() else {
            return Trend::Neutral;
        };
        let Some(sma) = self.sma.compute(points) else {
            return Trend::Neutral;
        };

        if latest.close > sma {
            Trend::Up
        } else if latest.close < sma {
            Trend::Down
        } else {
            Trend::Neutral
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::points_from_closes;

    #[test]
    fn empty_window_is_neutral() {
        assert_eq!(TrendIndicator::new(20).compute(&[]), Trend::Neutral);
    }

    #[test]
    fn short_window_is_neutral() {
        let closes: Vec<f64> = (0..19).map(|i| 1.0 + i as f64).collect();
        assert_eq!(
            TrendIndicator::new(20).compute(&points_from_closes(&closes)),
            Trend::Neutral
        );
    }

    #[test]
    fn rising_closes_trend_up() {
        let closes: Vec<f64> = (0..20).map(|i| 1.0 + i as f64 * 0.01).collect();
        assert_eq!(TrendIndicator::new(20).compute(&points_from_closes(&closes)), Trend::Up);
    }

    #[test]
    fn falling_closes_trend_down() {
        let closes: Vec<f64> = (0..25).map(|i| 2.0 - i as f64 * 0.01).collect();
        assert_eq!(TrendIndicator::new(20).compute(&points_from_closes(&closes)), Trend::Down);
    }

    #[test]
    fn close_equal_to_sma_is_neutral() {
        assert_eq!(
            TrendIndicator::new(20).compute(&points_from_closes(&[1.25; 20])),
            Trend::Neutral
        );
    }
}
