//! Handler implementations

pub mod console;

pub use console::{ConsoleHandler, CONSOLE_HANDLER};
