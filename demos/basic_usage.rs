//! Basic pipeline usage example
//!
//! Demonstrates configuring the process-wide instance, a staged custom
//! handler, prefixes and the `logger` facade.
//!
//! Run with: cargo run --example basic_usage

use rust_logger_chain::prelude::*;
use rust_logger_chain::{info, warn, LOGGER_ADAPTER};
use std::time::Duration;

/// Counts error messages; acts only at or above its own threshold
struct ErrorCounter {
    config: Config,
    errors: usize,
}

impl Handler for ErrorCounter {
    fn name(&self) -> &str {
        "COUNTER"
    }

    fn handle(&mut self, message: &Message) -> Result<()> {
        if self.config.accepts(self.name(), message.level()) {
            self.errors += 1;
            println!("   [COUNTER] {} error(s) so far", self.errors);
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    println!("=== Rust Logger Chain - Basic Usage Example ===\n");

    // Handlers can be staged before the instance exists
    rust_logger_chain::stage_handler(
        StagedHandler::new(|config| ErrorCounter {
            config: config.clone(),
            errors: 0,
        })
        .with_settings(Settings::new().with("MIN_LOG_LEVEL_COUNTER", "error")),
    );

    let settings = Settings::new()
        .with("presets", serde_json::json!(["prefix"]))
        .with("LOG_TIMESTAMP", false)
        .with("MIN_LOG_LEVEL", "silly");
    let instance = rust_logger_chain::configure(settings)?;

    println!("1. Logging at different levels:");
    let logger = instance
        .adapter::<LoggerAdapter>(LOGGER_ADAPTER)
        .ok_or_else(|| ChainError::config("basic_usage", "logger adapter missing"))?;
    logger.silly("This is a silly message", NO_META)?;
    logger.verbose("This is a verbose message", NO_META)?;
    logger.debug("This is a debug message", NO_META)?;
    logger.info("This is an info message", NO_META)?;
    logger.warn("This is a warning message", NO_META)?;
    logger.error("This is an error message", NO_META)?;

    println!("\n2. Metadata and errors:");
    let meta = Meta::new().with_field("reqId", "req-7").with_field("user", 42);
    logger.info("Request handled", [MetaArg::from(meta)])?;
    let err = std::io::Error::new(std::io::ErrorKind::NotFound, "config.json missing");
    logger.error(Payload::from_error(&err), NO_META)?;

    println!("\n3. Macros record the call site:");
    info!(instance, "Listening on port {}", 8080)?;
    warn!(instance, "Retry attempt {} of {}", 3, 5)?;

    println!("\n4. Profiling:");
    logger.profile("warmup")?;
    std::thread::sleep(Duration::from_millis(20));
    logger.profile("warmup")?;

    instance.flush()?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
