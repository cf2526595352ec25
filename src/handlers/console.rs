//! Console handler implementation

use crate::core::{
    Config, Handler, LogLevel, Message, PrefixOptions, Result, CONSOLE_LOGGING, JSONIFY,
};
#[cfg(feature = "console")]
use colored::Colorize;
use std::fmt;
use std::io::Write;

/// Handler name, also the suffix of its configuration keys
pub const CONSOLE_HANDLER: &str = "CONSOLE";

/// Prints messages as `level: <prefix><text> <metadata>`.
///
/// Configuration (environment variables win over settings):
///
/// - `CONSOLE_LOGGING` / `CONSOLE_LOGGING_CONSOLE`: switch, on by default
/// - `MIN_LOG_LEVEL_CONSOLE`, then `MIN_LOG_LEVEL`: threshold
/// - `JSONIFY` / `JSONIFY_CONSOLE`: metadata as JSON instead of `k=v` pairs
///
/// `error` messages go to stderr, everything else to stdout, unless a
/// writer was set with [`ConsoleHandler::with_writer`].
pub struct ConsoleHandler {
    config: Config,
    use_colors: bool,
    prefix_options: PrefixOptions,
    writer: Option<Box<dyn Write + Send>>,
}

impl ConsoleHandler {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            use_colors: cfg!(feature = "console"),
            prefix_options: PrefixOptions::default(),
            writer: None,
        }
    }

    /// Colour the level name; ignored without the `console` feature
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Send every line to `writer` instead of stdout/stderr
    ///
    /// # Example
    ///
    /// ```
    /// use rust_logger_chain::{Config, ConsoleHandler, Settings};
    ///
    /// let handler = ConsoleHandler::new(Config::from_settings(Settings::new()))
    ///     .with_colors(false)
    ///     .with_writer(std::io::sink());
    /// ```
    #[must_use]
    pub fn with_writer<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.writer = Some(Box::new(writer));
        self
    }

    #[must_use]
    pub fn with_prefix_options(mut self, options: PrefixOptions) -> Self {
        self.prefix_options = options;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.config.is_enabled(CONSOLE_LOGGING, CONSOLE_HANDLER, true)
    }

    fn format_line(&self, message: &Message) -> String {
        let level = self.level_label(message.level());
        let prefix = message
            .prefix_with(&self.config, &self.prefix_options)
            .render();

        let metadata = if self.config.bool(JSONIFY, Some(CONSOLE_HANDLER)).unwrap_or(false) {
            message.jsonify_metadata()
        } else {
            message.meta().format_fields()
        };

        if metadata.is_empty() {
            format!("{}: {}{}", level, prefix, message.text())
        } else {
            format!("{}: {}{} {}", level, prefix, message.text(), metadata)
        }
    }

    #[cfg(feature = "console")]
    fn level_label(&self, level: LogLevel) -> String {
        if self.use_colors {
            level.name().color(level.color_code()).to_string()
        } else {
            level.name().to_string()
        }
    }

    #[cfg(not(feature = "console"))]
    fn level_label(&self, level: LogLevel) -> String {
        level.name().to_string()
    }
}

impl Handler for ConsoleHandler {
    fn name(&self) -> &str {
        CONSOLE_HANDLER
    }

    fn handle(&mut self, message: &Message) -> Result<()> {
        if !self.is_enabled() || !self.config.accepts(CONSOLE_HANDLER, message.level()) {
            return Ok(());
        }

        let line = self.format_line(message);
        match self.writer {
            Some(ref mut writer) => writeln!(writer, "{}", line)?,
            None if message.level() == LogLevel::Error => eprintln!("{}", line),
            None => println!("{}", line),
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        match self.writer {
            Some(ref mut writer) => writer.flush()?,
            None => {
                std::io::stdout().flush()?;
                std::io::stderr().flush()?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ConsoleHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleHandler")
            .field("use_colors", &self.use_colors)
            .field("prefix_options", &self.prefix_options)
            .field("redirected", &self.writer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        MapEnv, Meta, MetaArg, Pipeline, Settings, TimestampFormat, LOG_LEVEL, LOG_TIMESTAMP,
        NO_META,
    };
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn handler(settings: Settings, env: MapEnv) -> (ConsoleHandler, SharedBuffer) {
        let buffer = SharedBuffer::default();
        let config = Config::new(settings, Arc::new(env));
        let handler = ConsoleHandler::new(config)
            .with_colors(false)
            .with_writer(buffer.clone());
        (handler, buffer)
    }

    #[test]
    fn test_prints_text_and_metadata() {
        let (mut handler, buffer) = handler(Settings::new(), MapEnv::new());
        let message = Message::compose("web-1", "info", "ready", [MetaArg::from(Meta::new().with_field("port", 80))]);
        handler.handle(&message).unwrap();

        assert_eq!(buffer.contents(), "info: ready instanceId=web-1 notify=true port=80\n");
    }

    #[test]
    fn test_enabled_by_default_and_switchable() {
        let env = MapEnv::new();
        let (mut handler, buffer) = handler(Settings::new().with(CONSOLE_LOGGING, false), env);
        handler.handle(&Message::compose("h", "error", "x", NO_META)).unwrap();
        assert!(buffer.contents().is_empty());

        let (mut handler, buffer) = handler_with_env_override();
        handler.handle(&Message::compose("h", "error", "x", NO_META)).unwrap();
        assert!(buffer.contents().starts_with("error: x"));
    }

    fn handler_with_env_override() -> (ConsoleHandler, SharedBuffer) {
        handler(
            Settings::new().with(CONSOLE_LOGGING, false),
            MapEnv::new().with(CONSOLE_LOGGING, "true"),
        )
    }

    #[test]
    fn test_threshold() {
        let (mut handler, buffer) = handler(Settings::new().with("MIN_LOG_LEVEL_CONSOLE", "warn"), MapEnv::new());
        handler.handle(&Message::compose("h", "info", "quiet", NO_META)).unwrap();
        handler.handle(&Message::compose("h", "warn", "loud", NO_META)).unwrap();

        let output = buffer.contents();
        assert!(!output.contains("quiet"));
        assert!(output.contains("warn: loud"));
    }

    #[test]
    fn test_prefix_and_json_metadata() {
        let settings = Settings::new().with(LOG_LEVEL, true).with(JSONIFY, true);
        let (mut handler, buffer) = handler(settings, MapEnv::new());
        handler.handle(&Message::compose("h", "debug", "x", NO_META)).unwrap();

        assert_eq!(
            buffer.contents(),
            "debug: [DEBUG:] x {\"instanceId\":\"h\",\"notify\":true}\n"
        );
    }

    #[test]
    fn test_invalid_timestamp_format_does_not_abort_log() {
        let buffer = SharedBuffer::default();
        let config = Config::new(Settings::new().with(LOG_TIMESTAMP, true), Arc::new(MapEnv::new()));
        let options = PrefixOptions::default().with_timestamp_format(TimestampFormat::Custom("%Q".to_string()));
        let mut pipeline = Pipeline::new(config.clone());
        pipeline
            .add_handler(
                ConsoleHandler::new(config)
                    .with_colors(false)
                    .with_prefix_options(options)
                    .with_writer(buffer.clone()),
            )
            .unwrap();

        pipeline.log("info", "x", NO_META).unwrap();

        let output = buffer.contents();
        assert!(output.starts_with("info: ["), "unexpected line: {}", output);
        assert!(output.contains("Z:] x"));
    }
}
