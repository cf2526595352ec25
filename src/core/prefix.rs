//! Message prefix segments
//!
//! A prefix is made of optional segments, each switched on by its own flag:
//!
//! | Segment       | Flag                | Rendered as            |
//! |---------------|---------------------|------------------------|
//! | `timestamp`   | `LOG_TIMESTAMP`     | `2025-01-08T10:30:45.123Z:` |
//! | `environment` | `LOG_ENVIRONMENT`   | `staging:`             |
//! | `log_level`   | `LOG_LEVEL`         | `ERROR:`               |
//! | `req_id`      | `LOG_REQID`         | `<meta.reqId>`         |
//! | caller        | `LOG_CALLER_PREFIX` | `project:module:function:` |

use super::log_level::LogLevel;
use super::meta::Meta;
use super::resolver::Config;
use super::settings::{LOG_CALLER_PREFIX, LOG_ENVIRONMENT, LOG_LEVEL, LOG_REQID, LOG_TIMESTAMP};
use super::timestamp::TimestampFormat;
use chrono::Utc;
use serde::Serialize;
use std::path::Path;

/// Default segment delimiter
pub const DEFAULT_DELIMITER: &str = ":";

/// Function name used when the call site is not known
pub const ANONYMOUS: &str = "anonymous";

/// Where a message was logged from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallerInfo {
    /// Crate of the call site, empty when unknown
    pub project: String,
    /// Source file name of the call site
    pub module: String,
    /// Innermost module path segment below the crate, `anonymous` when unknown
    pub function: String,
    pub line: u32,
}

impl CallerInfo {
    /// Build from `module_path!()`, `file!()` and `line!()`; see [`crate::caller!`]
    pub fn new(module_path: &str, file: &str, line: u32) -> Self {
        let mut segments = module_path.split("::");
        let project = segments.next().unwrap_or_default().to_string();
        let function = segments
            .last()
            .map(str::to_string)
            .unwrap_or_else(|| ANONYMOUS.to_string());
        Self {
            project,
            module: file_name(file),
            function,
            line,
        }
    }

    /// Build from a `#[track_caller]` location, which carries no module path
    pub fn from_location(location: &std::panic::Location<'_>) -> Self {
        Self {
            project: String::new(),
            module: file_name(location.file()),
            function: ANONYMOUS.to_string(),
            line: location.line(),
        }
    }
}

fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Rendering options for [`Prefix`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixOptions {
    pub delimiter: String,
    pub timestamp_format: TimestampFormat,
}

impl Default for PrefixOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            timestamp_format: TimestampFormat::default(),
        }
    }
}

impl PrefixOptions {
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }
}

/// Caller segments of a prefix
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CallerSegments {
    pub project: String,
    pub module: String,
    pub function: String,
}

/// Rendered prefix segments; a disabled segment is an empty string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Prefix {
    pub timestamp: String,
    pub environment: String,
    pub log_level: String,
    pub req_id: String,
    /// Present only when caller prefixes are switched on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caller: Option<CallerSegments>,
    pub is_empty: bool,
}

impl Prefix {
    pub(crate) fn build(
        level: LogLevel,
        meta: &Meta,
        caller: Option<&CallerInfo>,
        config: &Config,
        options: &PrefixOptions,
    ) -> Self {
        let delimiter = options.delimiter.as_str();

        let timestamp = segment(config.flag(LOG_TIMESTAMP), delimiter, || {
            options.timestamp_format.format(&Utc::now())
        });
        let environment = segment(config.flag(LOG_ENVIRONMENT), delimiter, || config.environment_name());
        let log_level = segment(config.flag(LOG_LEVEL), delimiter, || level.to_str().to_string());
        let req_id = match meta.get("reqId") {
            Some(req_id) if req_id.is_present() && config.flag(LOG_REQID) => req_id.to_string(),
            _ => String::new(),
        };
        let caller = if config.flag(LOG_CALLER_PREFIX) {
            Some(match caller {
                Some(info) => CallerSegments {
                    project: suffixed(&info.project, delimiter),
                    module: suffixed(&info.module, delimiter),
                    function: suffixed(&info.function, delimiter),
                },
                None => CallerSegments {
                    function: suffixed(ANONYMOUS, delimiter),
                    ..CallerSegments::default()
                },
            })
        } else {
            None
        };

        let is_empty = [&timestamp, &environment, &log_level, &req_id]
            .iter()
            .all(|s| s.is_empty())
            && caller.is_none();

        Self {
            timestamp,
            environment,
            log_level,
            req_id,
            caller,
            is_empty,
        }
    }

    /// Text placed in front of the message, `""` when the prefix is empty
    ///
    /// ```text
    /// [2025-01-08T10:30:45.123Z:local:ERROR:req-42] [billing:invoice.rs:invoice:] text
    /// ```
    pub fn render(&self) -> String {
        let mut out = String::new();
        let base = [&self.timestamp, &self.environment, &self.log_level, &self.req_id];
        if base.iter().any(|s| !s.is_empty()) {
            out.push('[');
            for part in base {
                out.push_str(part);
            }
            out.push_str("] ");
        }
        if let Some(ref caller) = self.caller {
            out.push_str(&format!("[{}{}{}] ", caller.project, caller.module, caller.function));
        }
        out
    }
}

fn segment(enabled: bool, delimiter: &str, value: impl FnOnce() -> String) -> String {
    if enabled {
        format!("{}{}", value(), delimiter)
    } else {
        String::new()
    }
}

fn suffixed(value: &str, delimiter: &str) -> String {
    if value.is_empty() {
        String::new()
    } else {
        format!("{}{}", value, delimiter)
    }
}
