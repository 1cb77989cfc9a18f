use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AtlasError, Result};
use crate::source::HistoryQuery;

/// Longest history window a config file may ask for.
pub const MAX_WINDOW_DAYS: i64 = 36_500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    pub history: HistoryConfig,
    pub display: DisplayConfig,
    /// Upper bound for each individual source fetch; `None` waits forever.
    pub fetch_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub window_days: i64,
    pub max_results: usize,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub item_title_max: usize,
    pub group_title_max: usize,
    pub list_title_max: usize,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            history: HistoryConfig::default(),
            display: DisplayConfig::default(),
            fetch_timeout_ms: None,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            window_days: 7,
            max_results: 99,
            title: "History".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            item_title_max: 30,
            group_title_max: 35,
            list_title_max: 100,
        }
    }
}

impl HistoryConfig {
    /// Build the history search request relative to `now`.
    ///
    /// Negative windows count as zero. A window reaching past the
    /// representable range starts at the epoch.
    pub fn query_at(&self, now: DateTime<Utc>) -> HistoryQuery {
        let start = Duration::try_days(self.window_days.max(0))
            .and_then(|window| now.checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        HistoryQuery {
            text: String::new(),
            start_time: start.timestamp_millis(),
            max_results: self.max_results,
        }
    }
}

impl AtlasConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: AtlasConfig = serde_json::from_str(&content)?;
        config.validate()?;
        log::debug!("Loaded config from {:?}", path.as_ref());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let window_days = self.history.window_days;
        if !(0..=MAX_WINDOW_DAYS).contains(&window_days) {
            return Err(AtlasError::Generic(format!(
                "history.window_days must be between 0 and {}, got {}",
                MAX_WINDOW_DAYS, window_days
            )));
        }
        Ok(())
    }

    /// Load from `path` when given, otherwise fall back to defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Write;

    #[test]
    fn test_default_history_contract() {
        let config = AtlasConfig::default();
        assert_eq!(config.history.window_days, 7);
        assert_eq!(config.history.max_results, 99);
        assert_eq!(config.history.title, "History");
        assert_eq!(config.fetch_timeout_ms, None);
    }

    #[test]
    fn test_history_query_window() {
        let now = Utc.with_ymd_and_hms(2024, 3, 8, 12, 0, 0).unwrap();
        let query = HistoryConfig::default().query_at(now);

        let week_ms = 7 * 24 * 60 * 60 * 1000;
        assert_eq!(query.start_time, now.timestamp_millis() - week_ms);
        assert_eq!(query.max_results, 99);
        assert!(query.text.is_empty());
    }

    #[test]
    fn test_out_of_range_window_does_not_panic() {
        let now = Utc.with_ymd_and_hms(2024, 3, 8, 12, 0, 0).unwrap();

        let huge = HistoryConfig { window_days: 100_000_000, ..Default::default() };
        assert_eq!(huge.query_at(now).start_time, 0);

        let unbounded = HistoryConfig { window_days: i64::MAX, ..Default::default() };
        assert_eq!(unbounded.query_at(now).start_time, 0);

        let negative = HistoryConfig { window_days: -3, ..Default::default() };
        assert_eq!(negative.query_at(now).start_time, now.timestamp_millis());
    }

    #[test]
    fn test_config_file_rejects_bad_window() {
        for window_days in ["100000000", "-1"] {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            write!(file, r#"{{ "history": {{ "window_days": {} }} }}"#, window_days).unwrap();

            let result = AtlasConfig::load_from_file(file.path());
            assert!(matches!(result, Err(AtlasError::Generic(_))), "accepted {}", window_days);
        }
    }

    #[test]
    fn test_partial_config_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "history": {{ "max_results": 10 }}, "fetch_timeout_ms": 500 }}"#).unwrap();

        let config = AtlasConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.history.max_results, 10);
        assert_eq!(config.history.window_days, 7);
        assert_eq!(config.display, DisplayConfig::default());
        assert_eq!(config.fetch_timeout_ms, Some(500));
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        assert!(AtlasConfig::load(Some("/nonexistent/link-atlas.json")).is_err());
        assert_eq!(AtlasConfig::load(None).unwrap(), AtlasConfig::default());
    }
}
