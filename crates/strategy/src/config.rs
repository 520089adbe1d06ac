use std::path::Path;

use serde::{Deserialize, Serialize};

use common::pairs::{
    OVERBOUGHT_THRESHOLD, OVERSOLD_THRESHOLD, RSI_PERIOD, SMA_PERIOD, STOCH_D_PERIOD,
    STOCH_K_PERIOD,
};
use common::{Error, Result};

use crate::indicators::StochasticDMode;

/// Indicator periods and classifier thresholds.
///
/// Every field is optional in the TOML file; missing ones keep the defaults.
/// Example `config/signals.toml`:
/// ```toml
/// rsi_period = 14
/// sma_period = 20
/// stoch_k_period = 14
/// stoch_d_period = 3
/// overbought = 70.0
/// oversold = 30.0
/// stoch_d_mode = "smoothed"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SignalParams {
    pub rsi_period: usize,
    pub sma_period: usize,
    pub stoch_k_period: usize,
    pub stoch_d_period: usize,
    /// RSI level above which the market counts as overbought.
    pub overbought: f64,
    /// RSI level below which the market counts as oversold.
    pub oversold: f64,
    /// %K level confirming an overbought RSI.
    pub stoch_overbought: f64,
    /// %K level confirming an oversold RSI.
    pub stoch_oversold: f64,
    pub stoch_d_mode: StochasticDMode,
}

impl Default for SignalParams {
    fn default() -> Self {
        Self {
            rsi_period: RSI_PERIOD,
            sma_period: SMA_PERIOD,
            stoch_k_period: STOCH_K_PERIOD,
            stoch_d_period: STOCH_D_PERIOD,
            overbought: OVERBOUGHT_THRESHOLD,
            oversold: OVERSOLD_THRESHOLD,
            stoch_overbought: 80.0,
            stoch_oversold: 20.0,
            stoch_d_mode: StochasticDMode::Approximate,
        }
    }
}

impl SignalParams {
    /// Load from a TOML file and validate.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "failed to read signal config at '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let params: SignalParams = toml::from_str(content)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rsi_period == 0
            || self.sma_period == 0
            || self.stoch_k_period == 0
            || self.stoch_d_period == 0
        {
            return Err(Error::Config("indicator periods must be >= 1".into()));
        }
        if self.oversold >= self.overbought {
            return Err(Error::Config(format!(
                "oversold ({}) must be below overbought ({})",
                self.oversold, self.overbought
            )));
        }
        if self.stoch_oversold >= self.stoch_overbought {
            return Err(Error::Config(format!(
                "stoch_oversold ({}) must be below stoch_overbought ({})",
                self.stoch_oversold, self.stoch_overbought
            )));
        }
        Ok(())
    }

    /// Smallest window the classifier will evaluate.
    pub fn min_window(&self) -> usize {
        self.rsi_period + 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_keeps_defaults() {
        assert_eq!(SignalParams::from_toml("").unwrap(), SignalParams::default());
    }

    #[test]
    fn partial_file_overrides_named_fields() {
        let params = SignalParams::from_toml("rsi_period = 7\nstoch_d_mode = \"smoothed\"\n").unwrap();
        assert_eq!(params.rsi_period, 7);
        assert_eq!(params.stoch_d_mode, StochasticDMode::Smoothed);
        assert_eq!(params.sma_period, SMA_PERIOD);
        assert_eq!(params.min_window(), 9);
    }

    #[test]
    fn zero_period_is_rejected() {
        let err = SignalParams::from_toml("sma_period = 0").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        let err = SignalParams::from_toml("overbought = 20.0\noversold = 80.0").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signals.toml");
        std::fs::write(&path, "overbought = 75.0\n").unwrap();
        assert_eq!(SignalParams::load(&path).unwrap().overbought, 75.0);
        assert!(SignalParams::load(&dir.path().join("missing.toml")).is_err());
    }
}
