pub mod classifier;
pub mod config;
pub mod hidden_entry;
pub mod indicators;

pub use classifier::{next_displayed, should_replace, SignalRules, Verdict};
pub use config::SignalParams;
pub use hidden_entry::HiddenEntryStrategy;
pub use indicators::{IndicatorEngine, StochasticDMode};

use chrono::{DateTime, Utc};

use common::{IndicatorSnapshot, MarketPoint, PairConfig, Signal};

/// Result of evaluating one window.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Always computed, for display, even when no candidate is produced.
    pub indicators: IndicatorSnapshot,
    /// `None` while the window is too short or an indicator is unavailable.
    pub candidate: Option<Signal>,
}

/// All strategy implementations must satisfy this trait.
pub trait Strategy: Send + Sync {
    /// Human-readable name of this strategy.
    fn name(&self) -> &str;

    /// Evaluate the current window (oldest first) for `pair`.
    ///
    /// The candidate is not debounced; callers decide whether it replaces the
    /// signal on display.
    fn evaluate(&self, points: &[MarketPoint], pair: &PairConfig, now: DateTime<Utc>) -> Evaluation;
}
