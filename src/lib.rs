//! # Rust Logger Chain
//!
//! A pluggable log-message pipeline: every `log()` call is normalized into
//! an immutable [`Message`] and handed to an ordered chain of [`Handler`]s.
//! Each handler decides on its own, from layered configuration, whether to
//! act on the message.
//!
//! ## Features
//!
//! - **Ordered dispatch**: handlers run in registration order and every one
//!   of them sees every message
//! - **Layered configuration**: handler-specific environment variable, then
//!   handler-specific setting, then the global variable and setting
//! - **Prefixes**: optional timestamp, environment, level, request id and
//!   call site in front of each line
//! - **Adapters**: named capability objects exposed on the configured
//!   instance, first writer wins
//!
//! ## Example
//!
//! ```
//! use rust_logger_chain::prelude::*;
//! use std::sync::Arc;
//!
//! let env = Arc::new(MapEnv::new().with("CONSOLE_LOGGING", "false"));
//! let instance = rust_logger_chain::configure_with_env(Settings::new(), env)?;
//!
//! let logger = instance.adapter::<LoggerAdapter>("logger").expect("bound at configure");
//! logger.info("hello", NO_META)?;
//! # rust_logger_chain::reset();
//! # Ok::<(), ChainError>(())
//! ```

pub mod adapters;
pub mod core;
pub mod global;
pub mod handlers;
pub mod macros;

pub mod prelude {
    pub use crate::adapters::LoggerAdapter;
    pub use crate::core::{
        ChainError, Config, ErrorInfo, Handler, Instance, LogLevel, MapEnv, Message, Meta,
        MetaArg, MetaValue, Payload, Pipeline, PipelineHandle, ProcessEnv, Result, Settings,
        NO_META,
    };
    pub use crate::global::StagedHandler;
    pub use crate::handlers::ConsoleHandler;
}

pub use adapters::{LoggerAdapter, LOGGER_ADAPTER};
pub use core::{
    resolve_bool, resolve_flag, resolve_min_level, AdapterRef, AdapterRegistry, CallerInfo,
    CallerSegments, ChainError, Config, EnvSource, ErrorInfo, ExposedRecord, Handler, Instance,
    InstanceIdentity, IntoLevel, LinkState, LogLevel, MapEnv, Message, Meta, MetaArg, MetaValue,
    Payload, Pipeline, PipelineHandle, PipelineMetrics, Prefix, PrefixOptions, Preset, ProcessEnv,
    Result, Settings, TimestampFormat, CHAIN_SLOT, NO_META,
};
pub use global::{
    configure, configure_with_env, get_or_configure, instance, reset, stage_adapter,
    stage_handler, staged_count, AdapterFactory, HandlerFactory, StagedHandler,
};
pub use handlers::{ConsoleHandler, CONSOLE_HANDLER};
