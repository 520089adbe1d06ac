use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::pairs::{default_pair, find_pair, PairConfig, Timeframe};
use crate::Result;

/// On-disk layout of the persisted selection. The two keys are fixed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredSettings {
    #[serde(rename = "pocketSignal_pairId", skip_serializing_if = "Option::is_none")]
    pair_id: Option<String>,
    #[serde(rename = "pocketSignal_timeframe", skip_serializing_if = "Option::is_none")]
    timeframe: Option<String>,
}

/// The user's last pair and timeframe selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub pair: PairConfig,
    pub timeframe: Timeframe,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pair: default_pair(),
            timeframe: Timeframe::default(),
        }
    }
}

/// Durable local storage for [`Settings`], backed by a small TOML file.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Restore the saved selection.
    ///
    /// A missing or unreadable file, an unknown pair id or an unknown timeframe
    /// each fall back independently to the first pair / shortest timeframe.
    pub fn load(&self) -> Settings {
        let stored = match std::fs::read_to_string(&self.path) {
            Ok(content) => match toml::from_str::<StoredSettings>(&content) {
                Ok(s) => s,
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "Ignoring unreadable settings file");
                    StoredSettings::default()
                }
            },
            Err(_) => {
                debug!(path = %self.path.display(), "No saved settings, using defaults");
                StoredSettings::default()
            }
        };

        let pair = stored
            .pair_id
            .as_deref()
            .and_then(find_pair)
            .unwrap_or_else(default_pair);
        let timeframe = stored
            .timeframe
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();

        Settings { pair, timeframe }
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        let stored = StoredSettings {
            pair_id: Some(settings.pair.id.clone()),
            timeframe: Some(settings.timeframe.as_str().to_string()),
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, toml::to_string(&stored)?)?;
        debug!(pair = %settings.pair.id, timeframe = %settings.timeframe, "Settings saved");
        Ok(())
    }
}
