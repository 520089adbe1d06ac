pub mod config;
pub mod error;
pub mod exchange;
pub mod pairs;
pub mod settings;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use exchange::{Narrator, RateSource};
pub use pairs::{PairConfig, Timeframe};
pub use settings::{Settings, SettingsStore};
pub use types::*;
