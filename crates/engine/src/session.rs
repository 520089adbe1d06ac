use chrono::{DateTime, Utc};
use tracing::{debug, info};

use common::{
    BotState, DashboardSnapshot, IndicatorSnapshot, MarketPoint, NarrationRequest, PairConfig,
    Signal, Timeframe,
};
use strategy::{should_replace, Strategy};

use crate::ticker::TickGenerator;
use crate::window::RollingWindow;

/// What one tick changed.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub point: MarketPoint,
    /// True when the displayed signal was replaced by this tick's candidate.
    pub signal_replaced: bool,
}

/// All mutable simulation state for the selected pair.
///
/// Purely synchronous: callers drive it with explicit `tick` calls and feed
/// back async results tagged with the generation/epoch they were started in.
pub struct Session {
    pair: PairConfig,
    timeframe: Timeframe,
    window: RollingWindow,
    indicators: IndicatorSnapshot,
    signal: Option<Signal>,
    bot_state: BotState,
    /// Carried-forward price. `None` until the anchor for the current pair resolves.
    price: Option<f64>,
    anchor_price: Option<f64>,
    /// Bumped on every pair change; tags anchor fetches.
    generation: u64,
    /// Bumped on every pair or timeframe change; tags narration requests.
    narration_epoch: u64,
    narration: Option<String>,
    narration_pending: bool,
    ticker: TickGenerator,
    strategy: Box<dyn Strategy>,
}

impl Session {
    pub fn new(
        pair: PairConfig,
        timeframe: Timeframe,
        ticker: TickGenerator,
        strategy: Box<dyn Strategy>,
    ) -> Self {
        Self {
            pair,
            timeframe,
            window: RollingWindow::default(),
            indicators: IndicatorSnapshot::default(),
            signal: None,
            bot_state: BotState::Idle,
            price: None,
            anchor_price: None,
            generation: 0,
            narration_epoch: 0,
            narration: None,
            narration_pending: false,
            ticker,
            strategy,
        }
    }

    pub fn pair(&self) -> &PairConfig {
        &self.pair
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    pub fn window(&self) -> &RollingWindow {
        &self.window
    }

    pub fn signal(&self) -> Option<&Signal> {
        self.signal.as_ref()
    }

    pub fn indicators(&self) -> &IndicatorSnapshot {
        &self.indicators
    }

    pub fn bot_state(&self) -> BotState {
        self.bot_state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn narration(&self) -> Option<&str> {
        self.narration.as_deref()
    }

    /// True while waiting for the anchor price of the current pair.
    pub fn is_syncing(&self) -> bool {
        self.price.is_none()
    }

    /// Switch to `pair`. Clears the window, signal and narration and returns
    /// the generation the new anchor fetch must be tagged with.
    pub fn select_pair(&mut self, pair: PairConfig) -> u64 {
        info!(from = %self.pair.id, to = %pair.id, "Pair selected");
        self.pair = pair;
        self.generation += 1;
        self.window.clear();
        self.indicators = IndicatorSnapshot::default();
        self.price = None;
        self.anchor_price = None;
        self.clear_derived();
        self.generation
    }

    /// Change the tick cadence. The window is kept; signal and narration are cleared.
    pub fn select_timeframe(&mut self, timeframe: Timeframe) {
        info!(from = %self.timeframe, to = %timeframe, "Timeframe selected");
        self.timeframe = timeframe;
        self.clear_derived();
    }

    fn clear_derived(&mut self) {
        self.signal = None;
        self.narration = None;
        self.narration_pending = false;
        self.narration_epoch += 1;
        if self.bot_state == BotState::SignalFound {
            self.bot_state = BotState::Analyzing;
        }
    }

    /// Apply a resolved anchor price. Results from a superseded pair
    /// selection are ignored and `false` is returned.
    pub fn apply_anchor(&mut self, generation: u64, price: f64) -> bool {
        if generation != self.generation {
            debug!(
                stale = generation,
                current = self.generation,
                "Discarding anchor for a previous pair selection"
            );
            return false;
        }
        self.price = Some(price);
        self.anchor_price = Some(price);
        self.bot_state = BotState::Analyzing;
        true
    }

    /// Generate one point, recompute indicators and run the classifier.
    /// Returns `None` without side effects while the anchor is unresolved.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<TickOutcome> {
        let prev = self.price?;
        let point = self.ticker.next_point(prev, self.pair.volatility, now);
        self.price = Some(point.close);
        self.window.push(point.clone());

        let eval = self
            .strategy
            .evaluate(self.window.as_slice(), &self.pair, now);
        self.indicators = eval.indicators;

        let mut signal_replaced = false;
        if let Some(candidate) = eval.candidate {
            if should_replace(self.signal.as_ref(), &candidate) {
                info!(
                    pair = %self.pair.id,
                    kind = %candidate.kind,
                    strength = candidate.strength,
                    reason = %candidate.reason,
                    "Signal updated"
                );
                self.bot_state = if candidate.is_actionable() {
                    BotState::SignalFound
                } else {
                    BotState::Analyzing
                };
                self.signal = Some(candidate);
                signal_replaced = true;
            }
        }

        Some(TickOutcome {
            point,
            signal_replaced,
        })
    }

    /// Start a narration request for the displayed signal.
    ///
    /// Returns the epoch to tag the reply with, or `None` when there is no
    /// signal or no price yet.
    pub fn begin_narration(&mut self) -> Option<(u64, NarrationRequest)> {
        let signal = self.signal.as_ref()?;
        let latest = self.window.latest()?;
        let request = NarrationRequest {
            pair_name: self.pair.display_name.clone(),
            price: latest.close,
            rsi: signal.indicators.rsi?,
            stoch_k: signal.indicators.stoch_k?,
            trend: signal.indicators.trend,
        };
        self.narration_pending = true;
        Some((self.narration_epoch, request))
    }

    /// Apply a narration reply. Replies started before the last pair or
    /// timeframe change are discarded.
    pub fn apply_narration(&mut self, epoch: u64, text: String) -> bool {
        if epoch != self.narration_epoch {
            debug!(stale = epoch, current = self.narration_epoch, "Discarding stale narration");
            return false;
        }
        self.narration = Some(text);
        self.narration_pending = false;
        true
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> DashboardSnapshot {
        DashboardSnapshot {
            pair: self.pair.clone(),
            timeframe: self.timeframe,
            bot_state: self.bot_state,
            syncing: self.is_syncing(),
            anchor_price: self.anchor_price,
            latest_price: self.window.latest().map(|p| p.close),
            points: self.window.to_vec(),
            indicators: self.indicators,
            signal: self.signal.clone(),
            narration: self.narration.clone(),
            narration_pending: self.narration_pending,
            updated_at: now,
        }
    }
}
