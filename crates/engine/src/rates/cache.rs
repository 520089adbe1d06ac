use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use common::Result;

/// Fixed key the rate table is cached under.
pub const RATES_CACHE_KEY: &str = "REAL_MARKET_RATES";

/// How long a cached rate table is trusted.
pub const RATES_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Cached payload: `{ "timestamp": <epoch ms>, "data": { "EUR": 0.92, ... } }`.
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    timestamp: i64,
    data: HashMap<String, f64>,
}

/// File-backed cache for the USD rate table.
#[derive(Debug, Clone)]
pub struct RatesCache {
    path: PathBuf,
    ttl: Duration,
}

impl RatesCache {
    pub fn new(cache_dir: impl AsRef<Path>) -> Self {
        Self {
            path: cache_dir.as_ref().join(format!("{RATES_CACHE_KEY}.json")),
            ttl: RATES_CACHE_TTL,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The cached table if it was stored less than one TTL before `now`.
    pub fn load_fresh(&self, now: DateTime<Utc>) -> Option<HashMap<String, f64>> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        let entry: CacheEntry = match serde_json::from_str(&content) {
            Ok(e) => e,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to parse rates cache");
                return None;
            }
        };

        let age_ms = now.timestamp_millis() - entry.timestamp;
        if age_ms < 0 || age_ms as u128 >= self.ttl.as_millis() {
            debug!(age_ms, "Rates cache expired");
            return None;
        }
        Some(entry.data)
    }

    pub fn store(&self, rates: &HashMap<String, f64>, now: DateTime<Utc>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let entry = CacheEntry {
            timestamp: now.timestamp_millis(),
            data: rates.clone(),
        };
        std::fs::write(&self.path, serde_json::to_string(&entry)?)?;
        debug!(path = %self.path.display(), currencies = rates.len(), "Cached rate table");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    fn table() -> HashMap<String, f64> {
        HashMap::from([("USD".to_string(), 1.0), ("EUR".to_string(), 0.92)])
    }

    #[test]
    fn empty_cache_misses() {
        let dir = tempfile::tempdir().unwrap();
        assert!(RatesCache::new(dir.path()).load_fresh(Utc::now()).is_none());
    }

    #[test]
    fn fresh_entry_hits() {
        let dir = tempfile::tempdir().unwrap();
        let cache = RatesCache::new(dir.path());
        let now = Utc::now();
        cache.store(&table(), now).unwrap();
        let later = now + ChronoDuration::minutes(59);
        assert_eq!(cache.load_fresh(later), Some(table()));
    }

    #[test]
    fn entry_older_than_an_hour_misses() {
        let dir = tempfile::tempdir().unwrap();
        let cache = RatesCache::new(dir.path());
        let now = Utc::now();
        cache.store(&table(), now).unwrap();
        assert!(cache.load_fresh(now + ChronoDuration::minutes(60)).is_none());
    }

    #[test]
    fn payload_layout_is_timestamp_and_data() {
        let dir = tempfile::tempdir().unwrap();
        let cache = RatesCache::new(dir.path());
        let now = Utc::now();
        cache.store(&table(), now).unwrap();
        assert!(cache.path().ends_with("REAL_MARKET_RATES.json"));

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(cache.path()).unwrap()).unwrap();
        assert_eq!(raw["timestamp"], now.timestamp_millis());
        assert_eq!(raw["data"]["EUR"], 0.92);
    }

    #[test]
    fn corrupt_file_misses() {
        let dir = tempfile::tempdir().unwrap();
        let cache = RatesCache::new(dir.path());
        std::fs::write(cache.path(), "{not json").unwrap();
        assert!(cache.load_fresh(Utc::now()).is_none());
    }
}
