//! Handler trait for pipeline nodes

use super::{error::Result, message::Message};

/// One stage of the dispatch chain.
///
/// The pipeline owns its handlers and calls them in registration order.
/// Forwarding to the next handler is done by the pipeline, so a handler
/// only decides whether to act on the message it receives. It gets a
/// shared reference and cannot change what later handlers see.
///
/// `name()` is used for per-handler configuration keys such as
/// `MIN_LOG_LEVEL_<NAME>`; it must be non-empty and consist of ASCII
/// letters, digits and `_`.
///
/// # Example
///
/// ```
/// use rust_logger_chain::{Config, Handler, Message, Result};
///
/// struct Counter {
///     config: Config,
///     seen: usize,
/// }
///
/// impl Handler for Counter {
///     fn name(&self) -> &str {
///         "COUNTER"
///     }
///
///     fn handle(&mut self, message: &Message) -> Result<()> {
///         if self.config.accepts(self.name(), message.level()) {
///             self.seen += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Handler: Send {
    fn name(&self) -> &str;

    /// Process one message. An error aborts the dispatch and is returned
    /// to the caller of `log()`.
    fn handle(&mut self, message: &Message) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<H: Handler + ?Sized> Handler for Box<H> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn handle(&mut self, message: &Message) -> Result<()> {
        (**self).handle(message)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

/// Whether `name` can be used as a configuration key suffix
pub(crate) fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(is_valid_name("CONSOLE"));
        assert!(is_valid_name("SENTRY_2"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("my handler"));
        assert!(!is_valid_name("log-entries"));
    }
}
