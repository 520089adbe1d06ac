use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use common::MarketPoint;

/// Prices below this are rejected and the previous price is held.
pub const MIN_PRICE: f64 = 0.0001;

/// Random-walk tick generator with a slow sinusoidal drift.
///
/// The random source is owned and seedable so sequences are reproducible.
pub struct TickGenerator {
    rng: StdRng,
}

impl TickGenerator {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Produce the next point from `prev_price`.
    ///
    /// `now` drives both the drift term and the point's timestamp.
    pub fn next_point(&mut self, prev_price: f64, volatility: f64, now: DateTime<Utc>) -> MarketPoint {
        let noise = (self.rng.gen::<f64>() - 0.5) * volatility * 2.0;
        let drift = (now.timestamp_millis() as f64 / 10_000.0).sin() * (volatility / 2.0);

        let mut price = prev_price + noise + drift;
        if price < MIN_PRICE {
            price = prev_price;
        }

        let open = price - self.rng.gen::<f64>() * volatility;
        let high = price + self.rng.gen::<f64>() * volatility;
        let low = price - self.rng.gen::<f64>() * volatility;
        let volume = (self.rng.gen::<f64>() * 500.0).floor() as u32 + 50;

        MarketPoint {
            timestamp: now,
            price,
            open,
            high,
            low,
            close: price,
            volume,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = TickGenerator::new(Some(7));
        let mut b = TickGenerator::new(Some(7));
        let mut pa = 1.08;
        let mut pb = 1.08;
        for i in 0..50 {
            let x = a.next_point(pa, 0.0004, at(i * 1000));
            let y = b.next_point(pb, 0.0004, at(i * 1000));
            assert_eq!(x, y);
            pa = x.close;
            pb = y.close;
        }
    }

    #[test]
    fn step_is_bounded_by_volatility() {
        let mut gen = TickGenerator::new(Some(1));
        let v = 0.0005;
        let mut price = 1.08;
        for i in 0..500 {
            let point = gen.next_point(price, v, at(i * 1000));
            // |noise| <= v, |drift| <= v/2
            assert!((point.close - price).abs() <= v * 1.5 + 1e-12);
            price = point.close;
        }
    }

    #[test]
    fn ohlc_fields_bracket_the_close() {
        let mut gen = TickGenerator::new(Some(3));
        let v = 0.0007;
        for i in 0..200 {
            let p = gen.next_point(145.5, v, at(i * 1000));
            assert_eq!(p.close, p.price);
            assert!(p.low <= p.close && p.close <= p.high);
            assert!(p.open <= p.close);
            assert!(p.close - p.low <= v + 1e-9 && p.high - p.close <= v + 1e-9);
            assert!((50..550).contains(&p.volume));
        }
    }

    #[test]
    fn held_price_is_reused_verbatim() {
        let mut gen = TickGenerator::new(Some(5));
        // Volatility far larger than the price: every downward step goes negative
        let mut held = 0;
        for i in 0..200 {
            let p = gen.next_point(0.001, 10.0, at(i * 1000));
            if p.close == 0.001 {
                held += 1;
            } else {
                assert!(p.close >= MIN_PRICE);
            }
        }
        assert!(held > 0, "expected at least one rejected step");
    }

    #[test]
    fn timestamp_is_the_supplied_clock() {
        let mut gen = TickGenerator::new(Some(2));
        assert_eq!(gen.next_point(1.0, 0.0004, at(123_000)).timestamp, at(123_000));
    }
}
