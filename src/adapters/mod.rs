//! Adapters bound on every configured instance

pub mod logger;

pub use logger::{LoggerAdapter, LOGGER_ADAPTER};
