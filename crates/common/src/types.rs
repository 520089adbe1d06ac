use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pairs::{PairConfig, Timeframe};

/// One simulated OHLCV tick.
///
/// Produced only by the tick generator and never mutated afterwards.
/// `close` is the price every indicator reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketPoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u32,
}

/// Short-term direction of the latest close relative to its moving average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Trend {
    Up,
    Down,
    #[default]
    Neutral,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Up => write!(f, "UP"),
            Trend::Down => write!(f, "DOWN"),
            Trend::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// Indicator values derived from the current window.
/// `None` means the window is still too short for that indicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct IndicatorSnapshot {
    pub rsi: Option<f64>,
    pub trend: Trend,
    pub stoch_k: Option<f64>,
    pub stoch_d: Option<f64>,
}

/// Direction of a binary-options entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalType {
    Call,
    Put,
    Wait,
}

impl std::fmt::Display for SignalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalType::Call => write!(f, "CALL"),
            SignalType::Put => write!(f, "PUT"),
            SignalType::Wait => write!(f, "WAIT"),
        }
    }
}

/// Classifier output shown on the signal card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    #[serde(rename = "type")]
    pub kind: SignalType,
    /// Confidence in `0..=99`.
    pub strength: f64,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
    /// Display name of the pair the signal was computed for.
    pub pair: String,
    pub indicators: IndicatorSnapshot,
}

impl Signal {
    pub fn is_actionable(&self) -> bool {
        self.kind != SignalType::Wait
    }
}

/// Operational state of the signal bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BotState {
    /// No anchor price has resolved yet.
    #[default]
    Idle,
    Analyzing,
    SignalFound,
}

impl std::fmt::Display for BotState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BotState::Idle => write!(f, "IDLE"),
            BotState::Analyzing => write!(f, "ANALYZING"),
            BotState::SignalFound => write!(f, "SIGNAL_FOUND"),
        }
    }
}

/// Read model published after every engine state change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub pair: PairConfig,
    pub timeframe: Timeframe,
    pub bot_state: BotState,
    /// True while the anchor price for the selected pair is being fetched.
    pub syncing: bool,
    pub anchor_price: Option<f64>,
    pub latest_price: Option<f64>,
    pub points: Vec<MarketPoint>,
    pub indicators: IndicatorSnapshot,
    pub signal: Option<Signal>,
    pub narration: Option<String>,
    pub narration_pending: bool,
    pub updated_at: DateTime<Utc>,
}

/// Inputs for one AI narration request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrationRequest {
    pub pair_name: String,
    pub price: f64,
    pub rsi: f64,
    pub stoch_k: f64,
    pub trend: Trend,
}

/// Commands sent to the engine via the command channel.
#[derive(Debug, Clone)]
pub enum EngineCommand {
    SelectPair(String),
    SelectTimeframe(Timeframe),
    RequestNarration,
}
