//! Error types for the logger chain

pub type Result<T> = std::result::Result<T, ChainError>;

#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// A handler failed while processing a message
    #[error("Handler '{handler}' failed: {message}")]
    HandlerFailed { handler: String, message: String },

    /// `log()` was invoked from inside a handler of the same pipeline
    #[error("Re-entrant dispatch: log() called while the pipeline is dispatching")]
    ReentrantDispatch,

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ChainError {
    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        ChainError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a handler failure
    pub fn handler(handler: impl Into<String>, message: impl Into<String>) -> Self {
        ChainError::HandlerFailed {
            handler: handler.into(),
            message: message.into(),
        }
    }

    /// Whether this error aborts pipeline construction
    pub fn is_configuration(&self) -> bool {
        matches!(self, ChainError::InvalidConfiguration { .. })
    }
}
