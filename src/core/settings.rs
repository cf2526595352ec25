//! Settings object and configuration presets
//!
//! Settings are the lowest-priority configuration layer; environment
//! variables of the same name override them (see [`crate::core::resolver`]).

use super::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Toggles the default console handler
pub const CONSOLE_LOGGING: &str = "CONSOLE_LOGGING";
/// Global minimum level; `MIN_LOG_LEVEL_<NAME>` overrides it per handler
pub const MIN_LOG_LEVEL: &str = "MIN_LOG_LEVEL";
pub const LOG_TIMESTAMP: &str = "LOG_TIMESTAMP";
pub const LOG_ENVIRONMENT: &str = "LOG_ENVIRONMENT";
pub const LOG_LEVEL: &str = "LOG_LEVEL";
pub const LOG_REQID: &str = "LOG_REQID";
pub const LOG_CALLER_PREFIX: &str = "LOG_CALLER_PREFIX";
/// Render metadata as JSON instead of key=value pairs
pub const JSONIFY: &str = "JSONIFY";
/// Name of the runtime environment shown in the prefix
pub const APP_ENV: &str = "APP_ENV";
pub const PRESETS: &str = "presets";

/// Top-level configuration object
///
/// # Example
///
/// ```
/// use rust_logger_chain::Settings;
///
/// let settings = Settings::new()
///     .with("MIN_LOG_LEVEL", "debug")
///     .with("LOG_LEVEL", true);
/// assert_eq!(settings.get_str("MIN_LOG_LEVEL"), Some("debug"));
///
/// let parsed = Settings::from_json_str(r#"{"presets": ["prefix"]}"#).unwrap();
/// assert!(parsed.contains_key("presets"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    values: BTreeMap<String, Value>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings from a JSON object
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use = "builder methods return a new value"]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Boolean reading of a field.
    ///
    /// `true`/`false` and the strings `"true"`/`"false"` are recognised,
    /// numbers count as `true` when non-zero. Anything else, including
    /// `null`, is treated as unset.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.values.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) if s == "true" => Some(true),
            Value::String(s) if s == "false" => Some(false),
            Value::Number(n) => Some(n.as_f64().is_some_and(|f| f != 0.0)),
            _ => None,
        }
    }

    /// Layer `self` on top of `base`: fields of `self` win
    #[must_use]
    pub fn over(&self, base: &Settings) -> Settings {
        let mut values = base.values.clone();
        values.extend(self.values.iter().map(|(k, v)| (k.clone(), v.clone())));
        Settings { values }
    }

    /// Expand the `presets` list, letting preset values overwrite fields.
    ///
    /// Presets are applied in list order; unknown names contribute nothing.
    #[must_use]
    pub fn with_presets_applied(mut self) -> Settings {
        let names: Vec<String> = match self.values.get(PRESETS) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => return self,
        };
        for preset in names.iter().filter_map(|n| Preset::from_name(n)) {
            for (key, value) in preset.values() {
                self.values.insert(key.to_string(), value);
            }
        }
        self
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Settings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Named configuration templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Turn every prefix segment on
    Prefix,
    /// Turn every prefix segment off
    NoPrefix,
}

impl Preset {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "prefix" => Some(Preset::Prefix),
            "no-prefix" => Some(Preset::NoPrefix),
            _ => None,
        }
    }

    /// Settings fields this preset sets
    pub fn values(&self) -> Vec<(&'static str, Value)> {
        let include = matches!(self, Preset::Prefix);
        [LOG_TIMESTAMP, LOG_ENVIRONMENT, LOG_LEVEL, LOG_REQID]
            .into_iter()
            .map(|key| (key, Value::Bool(include)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_bool_readings() {
        let settings = Settings::new()
            .with("A", true)
            .with("B", "false")
            .with("C", 0)
            .with("D", "yes")
            .with("E", Value::Null);

        assert_eq!(settings.get_bool("A"), Some(true));
        assert_eq!(settings.get_bool("B"), Some(false));
        assert_eq!(settings.get_bool("C"), Some(false));
        assert_eq!(settings.get_bool("D"), None);
        assert_eq!(settings.get_bool("E"), None);
        assert_eq!(settings.get_bool("missing"), None);
    }

    #[test]
    fn test_presets_expand_and_override() {
        let settings = Settings::new()
            .with(LOG_LEVEL, false)
            .with(PRESETS, serde_json::json!(["prefix"]))
            .with_presets_applied();

        assert_eq!(settings.get_bool(LOG_LEVEL), Some(true));
        assert_eq!(settings.get_bool(LOG_TIMESTAMP), Some(true));
        assert_eq!(settings.get_bool(LOG_REQID), Some(true));
    }

    #[test]
    fn test_later_presets_win() {
        let settings = Settings::new()
            .with(PRESETS, serde_json::json!(["prefix", "no-prefix"]))
            .with_presets_applied();

        assert_eq!(settings.get_bool(LOG_ENVIRONMENT), Some(false));
    }

    #[test]
    fn test_unknown_preset_is_ignored() {
        let settings = Settings::new()
            .with(PRESETS, serde_json::json!(["unicorn"]))
            .with_presets_applied();

        assert_eq!(settings.get(LOG_LEVEL), None);
    }

    #[test]
    fn test_over_prefers_self() {
        let base = Settings::new().with("A", 1).with("B", 1);
        let top = Settings::new().with("B", 2);
        let merged = top.over(&base);

        assert_eq!(merged.get("A"), Some(&Value::from(1)));
        assert_eq!(merged.get("B"), Some(&Value::from(2)));
    }

    #[test]
    fn test_from_json() {
        let settings = Settings::from_json_str(r#"{"CONSOLE_LOGGING": false}"#).unwrap();
        assert_eq!(settings.get_bool(CONSOLE_LOGGING), Some(false));

        assert!(Settings::from_json_str("[1, 2]").is_err());
    }
}
