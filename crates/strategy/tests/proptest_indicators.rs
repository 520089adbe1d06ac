use chrono::{TimeZone, Utc};
use common::{MarketPoint, Trend};
use proptest::prelude::*;
use strategy::indicators::{
    RsiIndicator, StochasticDMode, StochasticIndicator, TrendIndicator,
};

/// (close, distance below to low, distance above to high)
fn bars(min: usize, max: usize) -> impl Strategy<Value = Vec<MarketPoint>> {
    prop::collection::vec((0.5f64..200.0, 0.0f64..1.0, 0.0f64..1.0), min..max).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (close, down, up))| MarketPoint {
                timestamp: Utc.timestamp_millis_opt(i as i64 * 1000).unwrap(),
                price: close,
                open: close,
                high: close + up,
                low: close - down,
                close,
                volume: 50,
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn rsi_unavailable_below_period_plus_one(points in bars(0, 15)) {
        prop_assert!(RsiIndicator::new(14).compute(&points).is_none());
    }

    #[test]
    fn rsi_stays_within_bounds(points in bars(15, 60)) {
        let rsi = RsiIndicator::new(14).compute(&points).unwrap();
        prop_assert!((0.0..=100.0).contains(&rsi), "RSI out of range: {}", rsi);
    }

    #[test]
    fn rsi_is_100_when_no_losses(points in bars(15, 60)) {
        let rsi = RsiIndicator::new(14).compute(&points).unwrap();
        let recent = &points[points.len() - 15..];
        let losses: f64 = recent
            .windows(2)
            .map(|w| (w[0].close - w[1].close).max(0.0))
            .sum();
        if losses == 0.0 {
            prop_assert_eq!(rsi, 100.0);
        }
    }

    #[test]
    fn stochastic_unavailable_below_k_plus_d(points in bars(0, 17)) {
        let stoch = StochasticIndicator::new(14, 3, StochasticDMode::Approximate);
        prop_assert!(stoch.compute(&points).is_none());
    }

    #[test]
    fn stochastic_stays_within_bounds(points in bars(17, 60)) {
        for mode in [StochasticDMode::Approximate, StochasticDMode::Smoothed] {
            let value = StochasticIndicator::new(14, 3, mode).compute(&points).unwrap();
            prop_assert!((0.0..=100.0).contains(&value.k), "%K out of range: {}", value.k);
            prop_assert!((0.0..=100.0).contains(&value.d), "%D out of range: {}", value.d);
        }
    }

    #[test]
    fn trend_neutral_below_sma_period(points in bars(0, 20)) {
        prop_assert_eq!(TrendIndicator::new(20).compute(&points), Trend::Neutral);
    }
}
