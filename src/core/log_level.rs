//! Log level definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Silly = 0,
    Verbose = 1,
    Debug = 2,
    #[default]
    Info = 3,
    Warn = 4,
    Error = 5,
}

impl LogLevel {
    /// All levels, lowest priority first
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Silly,
        LogLevel::Verbose,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ];

    /// Upper-case label, as rendered in message prefixes
    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Silly => "SILLY",
            LogLevel::Verbose => "VERBOSE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Lower-case configuration name (`MIN_LOG_LEVEL=debug`)
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Silly => "silly",
            LogLevel::Verbose => "verbose",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parse a level, degrading to the default level on absent or unknown input.
    ///
    /// Never fails: a typo in a configured level must not break logging.
    ///
    /// ```
    /// use rust_logger_chain::LogLevel;
    ///
    /// assert_eq!(LogLevel::parse_or_default(Some("warn")), LogLevel::Warn);
    /// assert_eq!(LogLevel::parse_or_default(Some("wran")), LogLevel::Info);
    /// assert_eq!(LogLevel::parse_or_default(None), LogLevel::Info);
    /// ```
    pub fn parse_or_default(s: Option<&str>) -> Self {
        s.and_then(|s| s.parse().ok()).unwrap_or_default()
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Silly => BrightBlack,
            LogLevel::Verbose => Cyan,
            LogLevel::Debug => Blue,
            LogLevel::Info => Green,
            LogLevel::Warn => Yellow,
            LogLevel::Error => Red,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silly" => Ok(LogLevel::Silly),
            "verbose" => Ok(LogLevel::Verbose),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}

/// Conversion into a [`LogLevel`] that never fails.
///
/// Strings go through [`LogLevel::parse_or_default`], so `log("oops", ..)`
/// is logged at `info` instead of raising.
pub trait IntoLevel {
    fn into_level(self) -> LogLevel;
}

impl IntoLevel for LogLevel {
    fn into_level(self) -> LogLevel {
        self
    }
}

impl IntoLevel for Option<LogLevel> {
    fn into_level(self) -> LogLevel {
        self.unwrap_or_default()
    }
}

impl IntoLevel for &str {
    fn into_level(self) -> LogLevel {
        LogLevel::parse_or_default(Some(self))
    }
}

impl IntoLevel for String {
    fn into_level(self) -> LogLevel {
        LogLevel::parse_or_default(Some(&self))
    }
}

impl IntoLevel for Option<&str> {
    fn into_level(self) -> LogLevel {
        LogLevel::parse_or_default(self)
    }
}

impl IntoLevel for Option<String> {
    fn into_level(self) -> LogLevel {
        LogLevel::parse_or_default(self.as_deref())
    }
}
