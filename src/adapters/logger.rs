//! Logging facade bound as `"logger"`

use crate::core::{
    CallerInfo, IntoLevel, LogLevel, Meta, MetaArg, Payload, PipelineHandle, Result,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::panic::Location;
use std::time::{Duration, Instant};

/// Name the facade is bound under on every instance
pub const LOGGER_ADAPTER: &str = "logger";

/// Level-named shortcuts over a pipeline, plus simple profiling.
///
/// # Example
///
/// ```
/// use rust_logger_chain::{Config, LoggerAdapter, Pipeline, PipelineHandle, Settings, NO_META};
///
/// let pipeline = PipelineHandle::new(Pipeline::new(Config::from_settings(Settings::new())));
/// let logger = LoggerAdapter::new(pipeline);
///
/// logger.info("service started", NO_META)?;
/// assert_eq!(logger.profile("warmup")?, None);
/// assert!(logger.profile("warmup")?.is_some());
/// # Ok::<(), rust_logger_chain::ChainError>(())
/// ```
pub struct LoggerAdapter {
    pipeline: PipelineHandle,
    timers: Mutex<HashMap<String, Instant>>,
}

impl LoggerAdapter {
    pub fn new(pipeline: PipelineHandle) -> Self {
        Self {
            pipeline,
            timers: Mutex::new(HashMap::new()),
        }
    }

    pub fn pipeline(&self) -> &PipelineHandle {
        &self.pipeline
    }

    #[track_caller]
    pub fn log<L, P, M>(&self, level: L, payload: P, metas: M) -> Result<()>
    where
        L: IntoLevel,
        P: Into<Payload>,
        M: IntoIterator<Item = MetaArg>,
    {
        let caller = CallerInfo::from_location(Location::caller());
        self.pipeline.log_with_caller(caller, level, payload, metas)
    }

    pub fn log_with_caller<L, P, M>(&self, caller: CallerInfo, level: L, payload: P, metas: M) -> Result<()>
    where
        L: IntoLevel,
        P: Into<Payload>,
        M: IntoIterator<Item = MetaArg>,
    {
        self.pipeline.log_with_caller(caller, level, payload, metas)
    }

    #[track_caller]
    pub fn silly<P: Into<Payload>, M: IntoIterator<Item = MetaArg>>(&self, payload: P, metas: M) -> Result<()> {
        self.log(LogLevel::Silly, payload, metas)
    }

    #[track_caller]
    pub fn verbose<P: Into<Payload>, M: IntoIterator<Item = MetaArg>>(&self, payload: P, metas: M) -> Result<()> {
        self.log(LogLevel::Verbose, payload, metas)
    }

    #[track_caller]
    pub fn debug<P: Into<Payload>, M: IntoIterator<Item = MetaArg>>(&self, payload: P, metas: M) -> Result<()> {
        self.log(LogLevel::Debug, payload, metas)
    }

    #[track_caller]
    pub fn info<P: Into<Payload>, M: IntoIterator<Item = MetaArg>>(&self, payload: P, metas: M) -> Result<()> {
        self.log(LogLevel::Info, payload, metas)
    }

    #[track_caller]
    pub fn warn<P: Into<Payload>, M: IntoIterator<Item = MetaArg>>(&self, payload: P, metas: M) -> Result<()> {
        self.log(LogLevel::Warn, payload, metas)
    }

    #[track_caller]
    pub fn error<P: Into<Payload>, M: IntoIterator<Item = MetaArg>>(&self, payload: P, metas: M) -> Result<()> {
        self.log(LogLevel::Error, payload, metas)
    }

    /// Start or stop a named timer.
    ///
    /// The first call for `label` starts the timer and returns `None`. The
    /// second stops it, logs `label` at `info` with a `durationMs` field and
    /// returns the elapsed time.
    #[track_caller]
    pub fn profile(&self, label: &str) -> Result<Option<Duration>> {
        let started = {
            let mut timers = self.timers.lock();
            match timers.remove(label) {
                Some(started) => started,
                None => {
                    timers.insert(label.to_string(), Instant::now());
                    return Ok(None);
                }
            }
        };

        let elapsed = started.elapsed();
        let duration_ms = i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX);
        self.log(
            LogLevel::Info,
            label,
            [MetaArg::from(Meta::new().with_field("durationMs", duration_ms))],
        )?;
        Ok(Some(elapsed))
    }
}

impl fmt::Debug for LoggerAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerAdapter")
            .field("pipeline", &self.pipeline)
            .field("timers", &self.timers.lock().len())
            .finish()
    }
}
