//! Layered configuration resolution
//!
//! A value is looked up in four layers, highest priority first:
//!
//! 1. environment variable `<KEY>_<HANDLER>`
//! 2. settings field `<KEY>_<HANDLER>`
//! 3. environment variable `<KEY>`
//! 4. settings field `<KEY>`
//!
//! and falls back to a fixed default when none of them resolve.

use super::env::{EnvSource, ProcessEnv};
use super::log_level::LogLevel;
use super::settings::{Settings, APP_ENV, MIN_LOG_LEVEL};
use serde_json::Value;
use std::sync::Arc;

/// Environment name used when none is configured
pub const DEFAULT_ENVIRONMENT: &str = "local";

fn layered_keys(key: &str, handler: Option<&str>) -> Vec<String> {
    match handler.filter(|h| !h.is_empty()) {
        Some(name) => vec![format!("{}_{}", key, name), key.to_string()],
        None => vec![key.to_string()],
    }
}

/// Resolve the minimum level for a handler (or globally with `None`).
///
/// The first layer holding a non-empty value wins, even when that value is
/// not a level name; an unrecognised value yields [`LogLevel::Info`].
pub fn resolve_min_level(settings: &Settings, env: &dyn EnvSource, handler: Option<&str>) -> LogLevel {
    for key in layered_keys(MIN_LOG_LEVEL, handler) {
        if let Some(raw) = env.var(&key).filter(|v| !v.is_empty()) {
            return LogLevel::parse_or_default(Some(&raw));
        }
        match settings.get(&key) {
            None | Some(Value::Null) | Some(Value::Bool(false)) => {}
            Some(Value::String(s)) if s.is_empty() => {}
            Some(Value::String(s)) => return LogLevel::parse_or_default(Some(s)),
            Some(_) => return LogLevel::default(),
        }
    }
    LogLevel::default()
}

/// Resolve a boolean flag.
///
/// Environment values count only when they are literally `"true"` or
/// `"false"`; anything else is skipped and the settings layer is consulted.
/// Returns `None` when no layer resolves, leaving the default to the caller.
pub fn resolve_bool(key: &str, settings: &Settings, env: &dyn EnvSource, handler: Option<&str>) -> Option<bool> {
    layered_keys(key, handler).into_iter().find_map(|key| {
        match env.var(&key).as_deref() {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => settings.get_bool(&key),
        }
    })
}

/// Resolve a prefix segment toggle; unset means off
pub fn resolve_flag(key: &str, settings: &Settings, env: &dyn EnvSource) -> bool {
    resolve_bool(key, settings, env, None).unwrap_or(false)
}

/// Settings plus the environment they are read against.
///
/// Cheap to clone; handlers keep their own copy and resolve on every
/// message, so changes to the environment take effect immediately.
#[derive(Debug, Clone)]
pub struct Config {
    settings: Arc<Settings>,
    env: Arc<dyn EnvSource>,
}

impl Config {
    pub fn new(settings: Settings, env: Arc<dyn EnvSource>) -> Self {
        Self {
            settings: Arc::new(settings),
            env,
        }
    }

    /// Settings read against the process environment
    pub fn from_settings(settings: Settings) -> Self {
        Self::new(settings, Arc::new(ProcessEnv))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn env(&self) -> &dyn EnvSource {
        self.env.as_ref()
    }

    pub(crate) fn env_arc(&self) -> Arc<dyn EnvSource> {
        Arc::clone(&self.env)
    }

    /// Same environment, with handler-specific settings underneath ours
    #[must_use]
    pub fn with_defaults(&self, handler_settings: &Settings) -> Config {
        Config {
            settings: Arc::new(self.settings.over(handler_settings)),
            env: Arc::clone(&self.env),
        }
    }

    pub fn min_level(&self, handler: Option<&str>) -> LogLevel {
        resolve_min_level(&self.settings, self.env.as_ref(), handler)
    }

    pub fn bool(&self, key: &str, handler: Option<&str>) -> Option<bool> {
        resolve_bool(key, &self.settings, self.env.as_ref(), handler)
    }

    /// Enable/disable switch with a handler-chosen default
    pub fn is_enabled(&self, key: &str, handler: &str, default: bool) -> bool {
        self.bool(key, Some(handler)).unwrap_or(default)
    }

    pub fn flag(&self, key: &str) -> bool {
        resolve_flag(key, &self.settings, self.env.as_ref())
    }

    /// Whether `handler` should act on a message of `level`
    pub fn accepts(&self, handler: &str, level: LogLevel) -> bool {
        level >= self.min_level(Some(handler))
    }

    /// Name of the runtime environment, `"local"` when unset
    pub fn environment_name(&self) -> String {
        self.env
            .var(APP_ENV)
            .filter(|name| !name.is_empty())
            .or_else(|| self.settings.get_str(APP_ENV).map(str::to_string))
            .filter(|name| !name.is_empty() && name != "undefined")
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_settings(Settings::default())
    }
}
