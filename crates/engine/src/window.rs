use std::collections::VecDeque;

use common::pairs::WINDOW_CAPACITY;
use common::MarketPoint;

/// Fixed-capacity tick history, oldest first. Appending past capacity drops
/// the oldest point.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    points: VecDeque<MarketPoint>,
    capacity: usize,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "window capacity must be > 0");
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a point, returning the evicted one if the window was full.
    pub fn push(&mut self, point: MarketPoint) -> Option<MarketPoint> {
        let evicted = if self.points.len() == self.capacity {
            self.points.pop_front()
        } else {
            None
        };
        self.points.push_back(point);
        evicted
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Oldest-first slice of the window. Rotates the ring buffer in place
    /// when it has wrapped.
    pub fn as_slice(&mut self) -> &[MarketPoint] {
        self.points.make_contiguous()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MarketPoint> {
        self.points.iter()
    }

    /// Owned copy, oldest first.
    pub fn to_vec(&self) -> Vec<MarketPoint> {
        self.points.iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<&MarketPoint> {
        self.points.back()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for RollingWindow {
    fn default() -> Self {
        Self::new(WINDOW_CAPACITY)
    }
}
