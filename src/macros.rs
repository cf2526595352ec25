//! Logging macros for ergonomic message formatting.
//!
//! Each macro formats its arguments like `format!`, records the call site
//! with [`caller!`](crate::caller) and returns the `Result` of the dispatch.
//! They work with anything that has a `log_with_caller` method: [`Pipeline`](crate::Pipeline),
//! [`PipelineHandle`](crate::PipelineHandle), [`Instance`](crate::Instance)
//! and [`LoggerAdapter`](crate::LoggerAdapter).
//!
//! # Examples
//!
//! ```
//! use rust_logger_chain::prelude::*;
//! use rust_logger_chain::info;
//!
//! let logger = Instance::new(Config::from_settings(Settings::new()));
//!
//! info!(logger, "Server started")?;
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port)?;
//! # Ok::<(), ChainError>(())
//! ```

/// Call site of the macro invocation, as a [`CallerInfo`](crate::CallerInfo).
///
/// # Examples
///
/// ```
/// let caller = rust_logger_chain::caller!();
/// assert!(caller.line > 0);
/// ```
#[macro_export]
macro_rules! caller {
    () => {
        $crate::CallerInfo::new(module_path!(), file!(), line!())
    };
}

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use rust_logger_chain::prelude::*;
/// # let logger = Instance::new(Config::from_settings(Settings::new()));
/// use rust_logger_chain::log;
/// log!(logger, LogLevel::Info, "Simple message")?;
/// log!(logger, "error", "Error code: {}", 500)?;
/// # Ok::<(), ChainError>(())
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log_with_caller($crate::caller!(), $level, format!($($arg)+), $crate::NO_META)
    };
}

/// Log a silly-level message.
#[macro_export]
macro_rules! silly {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Silly, $($arg)+)
    };
}

/// Log a verbose-level message.
#[macro_export]
macro_rules! verbose {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Verbose, $($arg)+)
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use rust_logger_chain::prelude::*;
/// # let logger = Instance::new(Config::from_settings(Settings::new()));
/// use rust_logger_chain::debug;
/// debug!(logger, "Counter value: {}", 10)?;
/// # Ok::<(), ChainError>(())
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_logger_chain::prelude::*;
/// # let logger = Instance::new(Config::from_settings(Settings::new()));
/// use rust_logger_chain::error;
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error")?;
/// # Ok::<(), ChainError>(())
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}
