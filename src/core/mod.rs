//! Core pipeline types and traits

pub mod adapter;
pub mod env;
pub mod error;
pub mod handler;
pub mod instance;
pub mod log_level;
pub mod message;
pub mod meta;
pub mod metrics;
pub mod pipeline;
pub mod prefix;
pub mod resolver;
pub mod settings;
pub mod timestamp;

pub use adapter::{AdapterRef, AdapterRegistry, ExposedRecord};
pub use env::{EnvSource, InstanceIdentity, MapEnv, ProcessEnv, DEFAULT_INSTANCE_NUMBER};
pub use error::{ChainError, Result};
pub use handler::Handler;
pub use instance::{Instance, CHAIN_SLOT};
pub use log_level::{IntoLevel, LogLevel};
pub use message::{Message, Payload, EMPTY_ERROR_TEXT};
pub use meta::{ErrorInfo, Meta, MetaArg, MetaValue, NO_META};
pub use metrics::PipelineMetrics;
pub use pipeline::{LinkState, Pipeline, PipelineHandle};
pub use prefix::{CallerInfo, CallerSegments, Prefix, PrefixOptions, ANONYMOUS, DEFAULT_DELIMITER};
pub use resolver::{resolve_bool, resolve_flag, resolve_min_level, Config, DEFAULT_ENVIRONMENT};
pub use settings::{
    Preset, Settings, APP_ENV, CONSOLE_LOGGING, JSONIFY, LOG_CALLER_PREFIX, LOG_ENVIRONMENT,
    LOG_LEVEL, LOG_REQID, LOG_TIMESTAMP, MIN_LOG_LEVEL, PRESETS,
};
pub use timestamp::TimestampFormat;
