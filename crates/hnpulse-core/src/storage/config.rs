//! JSON-based user configuration.
//!
//! Stores the two user preferences:
//! - how many stories the menu shows
//! - the keyword filter set
//!
//! Configuration is stored as `config.json` in the data directory. Loading is
//! lenient: each field is validated on its own and falls back to its default,
//! and the key names written by earlier releases (`maxStories`,
//! `searchFilters`) are still read.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;
use crate::filter::FilterSet;

/// Number of stories shown in the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct DisplayCount(u32);

impl DisplayCount {
    pub const ALLOWED: [u32; 5] = [5, 10, 15, 20, 25];

    /// # Errors
    ///
    /// Returns an error if `n` is not one of [`DisplayCount::ALLOWED`].
    pub fn new(n: u32) -> Result<Self, ConfigError> {
        if Self::ALLOWED.contains(&n) {
            Ok(Self(n))
        } else {
            Err(ConfigError::InvalidValue {
                key: "max_display_count".into(),
                message: format!("{n} is not one of {:?}", Self::ALLOWED),
            })
        }
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl Default for DisplayCount {
    fn default() -> Self {
        Self(15)
    }
}

impl TryFrom<u32> for DisplayCount {
    type Error = ConfigError;

    fn try_from(n: u32) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

impl From<DisplayCount> for u32 {
    fn from(c: DisplayCount) -> Self {
        c.0
    }
}

impl std::fmt::Display for DisplayCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Minimum number of stories fetched while filters are active, so a narrow
/// filter still has a decent pool to match against.
const MIN_FILTERED_FETCH: usize = 50;

/// Application configuration.
///
/// Serialized as `{"maxDisplayCount": 15, "filterSet": []}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "Value")]
pub struct Config {
    pub max_display_count: DisplayCount,
    pub filter_set: FilterSet,
}

impl From<Value> for Config {
    fn from(value: Value) -> Self {
        let mut cfg = Config::default();

        match field(&value, &["maxDisplayCount", "maxStories"]).map(Self::parse_display_count) {
            Some(Ok(count)) => cfg.max_display_count = count,
            Some(Err(e)) => tracing::debug!("ignoring stored display count: {e}"),
            None => {}
        }

        if let Some(list) = field(&value, &["filterSet", "searchFilters"]).and_then(Value::as_array) {
            cfg.filter_set = FilterSet::new(list.iter().filter_map(Value::as_str));
        }

        cfg
    }
}

/// First present key among `names`, so renamed keys keep loading.
fn field<'a>(value: &'a Value, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|name| value.get(*name))
}

impl Config {
    fn parse_display_count(value: &Value) -> Result<DisplayCount, ConfigError> {
        let n = value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| ConfigError::InvalidValue {
                key: "max_display_count".into(),
                message: format!("expected a small positive integer, got {value}"),
            })?;
        DisplayCount::new(n)
    }

    /// Parse stored JSON, falling back to defaults for anything unreadable.
    pub fn from_json(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => Self::from(value),
            Err(e) => {
                tracing::debug!("config is not valid JSON, using defaults: {e}");
                Self::default()
            }
        }
    }

    /// How many top stories to request from the API for one tick.
    pub fn fetch_limit(&self) -> usize {
        let shown = self.max_display_count.get();
        if self.filter_set.is_active() {
            (shown * 3).max(MIN_FILTERED_FETCH)
        } else {
            shown
        }
    }

    /// Get a config value as string by key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "max_display_count" | "maxDisplayCount" => Some(self.max_display_count.to_string()),
            "filters" | "filterSet" => Some(self.filter_set.to_string()),
            _ => None,
        }
    }

    /// Set a config value by key. The caller persists the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value is not allowed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "max_display_count" | "maxDisplayCount" => {
                let n: u32 = value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("cannot parse '{value}' as a number"),
                })?;
                self.max_display_count = DisplayCount::new(n)?;
                Ok(())
            }
            "filters" | "filterSet" => {
                self.filter_set = FilterSet::parse(value);
                Ok(())
            }
            _ => Err(ConfigError::UnknownKey(key.to_string())),
        }
    }

    /// Keys accepted by [`Config::get`] and [`Config::set`].
    pub fn keys() -> &'static [&'static str] {
        &["max_display_count", "filters"]
    }
}
