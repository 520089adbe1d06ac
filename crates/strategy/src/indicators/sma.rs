use common::MarketPoint;

/// Simple moving average of the last `period` closes.
#[derive(Debug, Clone)]
pub struct SmaIndicator {
    pub period: usize,
}

impl SmaIndicator {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self { period }
    }

    pub fn compute(&self, points: &[MarketPoint]) -> Option<f64> {
        if points.len() < self.period {
            return None;
        }
        let sum: f64 = points[points.len() - self.period..]
            .iter()
            .map(|p| p.close)
            .sum();
        Some(sum / self.period as f64)
    }
}
