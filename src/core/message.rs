//! Immutable log message
//!
//! A [`Message`] is built once per `log()` call and handed to every handler
//! by shared reference. Its fields are private and only exposed through
//! read-only accessors, so all handlers of one dispatch observe the same
//! level, text and metadata.

use super::env::InstanceIdentity;
use super::log_level::{IntoLevel, LogLevel};
use super::meta::{ErrorInfo, Meta, MetaArg, MetaValue};
use super::prefix::{CallerInfo, Prefix, PrefixOptions};
use super::resolver::Config;
use std::sync::OnceLock;

/// Text used for an error payload whose message is empty
pub const EMPTY_ERROR_TEXT: &str = "Error: ";

/// The main content of a log call
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Payload {
    #[default]
    Empty,
    Text(String),
    Error(ErrorInfo),
}

impl Payload {
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        Payload::Error(ErrorInfo::from_error(err))
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Payload::Text(s.to_string())
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Payload::Text(s)
    }
}

impl From<&String> for Payload {
    fn from(s: &String) -> Self {
        Payload::Text(s.clone())
    }
}

impl From<ErrorInfo> for Payload {
    fn from(err: ErrorInfo) -> Self {
        Payload::Error(err)
    }
}

impl From<()> for Payload {
    fn from(_: ()) -> Self {
        Payload::Empty
    }
}

impl<T: Into<Payload>> From<Option<T>> for Payload {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// One normalized log event
///
/// # Example
///
/// ```
/// use rust_logger_chain::{LogLevel, Message, Meta, MetaArg, MetaValue};
///
/// let message = Message::new("warn", "disk almost full", [MetaArg::from(Meta::new().with_field("disk", "/var"))]);
/// assert_eq!(message.level(), LogLevel::Warn);
/// assert_eq!(message.text(), "disk almost full");
/// assert_eq!(message.meta().get("notify"), Some(&MetaValue::Bool(true)));
/// ```
#[derive(Debug, Clone)]
pub struct Message {
    level: LogLevel,
    text: String,
    meta: Meta,
    error: Option<ErrorInfo>,
    caller: Option<CallerInfo>,
    prefix: OnceLock<Prefix>,
}

impl Message {
    /// Build a message stamped with this process's identity
    pub fn new<L, P, M>(level: L, payload: P, metas: M) -> Self
    where
        L: IntoLevel,
        P: Into<Payload>,
        M: IntoIterator<Item = MetaArg>,
    {
        Self::compose(InstanceIdentity::current().id(), level, payload, metas)
    }

    /// Build a message with an explicit `instanceId`.
    ///
    /// Never fails: an unknown level becomes `info`, an empty payload
    /// becomes empty text. `instanceId` and `notify: true` are set first,
    /// then each meta argument is merged over them from left to right.
    pub fn compose<L, P, M>(instance_id: &str, level: L, payload: P, metas: M) -> Self
    where
        L: IntoLevel,
        P: Into<Payload>,
        M: IntoIterator<Item = MetaArg>,
    {
        let mut meta = Meta::new()
            .with_field("instanceId", instance_id)
            .with_field("notify", true);

        let (text, error) = match payload.into() {
            Payload::Empty => (String::new(), None),
            Payload::Text(text) => (text, None),
            Payload::Error(err) => {
                let text = if err.message.is_empty() {
                    EMPTY_ERROR_TEXT.to_string()
                } else {
                    err.message.clone()
                };
                meta.insert("stack", err.stack.clone());
                meta.insert("error", err.clone());
                (text, Some(err))
            }
        };

        for fields in metas.into_iter().filter_map(MetaArg::into_meta) {
            meta.merge(fields);
        }

        Self {
            level: level.into_level(),
            text,
            meta,
            error,
            caller: None,
            prefix: OnceLock::new(),
        }
    }

    /// Attach the call site; used for caller prefixes
    #[must_use]
    pub fn with_caller(mut self, caller: CallerInfo) -> Self {
        self.caller = Some(caller);
        self
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// The originating error, when the payload was one
    pub fn error(&self) -> Option<&ErrorInfo> {
        self.error.as_ref()
    }

    pub fn caller(&self) -> Option<&CallerInfo> {
        self.caller.as_ref()
    }

    pub fn instance_id(&self) -> Option<&str> {
        self.meta.get("instanceId").and_then(MetaValue::as_str)
    }

    /// Whether notifier handlers should report this message
    pub fn notify(&self) -> bool {
        self.meta
            .get("notify")
            .and_then(MetaValue::as_bool)
            .unwrap_or(true)
    }

    /// Prefix with the default delimiter `:`
    pub fn prefix(&self, config: &Config) -> &Prefix {
        self.prefix_with(config, &PrefixOptions::default())
    }

    /// Prefix segments, computed on first call and cached.
    ///
    /// Later calls return the cached value whatever their arguments, so the
    /// timestamp is the same for every handler of the dispatch.
    pub fn prefix_with(&self, config: &Config, options: &PrefixOptions) -> &Prefix {
        self.prefix.get_or_init(|| {
            Prefix::build(self.level, &self.meta, self.caller.as_ref(), config, options)
        })
    }

    /// Metadata serialized as a JSON object
    pub fn jsonify_metadata(&self) -> String {
        self.meta.to_json_value().to_string()
    }
}
