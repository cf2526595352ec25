//! Tests for the process-wide instance lifecycle and the staging buffer
//!
//! All tests share one global instance, so each takes `SERIAL` first.

use parking_lot::Mutex;
use rust_logger_chain::prelude::*;
use rust_logger_chain::{
    configure_with_env, get_or_configure, instance, reset, stage_adapter, stage_handler,
    staged_count, CHAIN_SLOT, CONSOLE_HANDLER, LOGGER_ADAPTER,
};
use std::sync::Arc;

static SERIAL: Mutex<()> = Mutex::new(());

type Journal = Arc<Mutex<Vec<String>>>;

struct Recorder {
    name: &'static str,
    config: Config,
    journal: Journal,
}

impl Handler for Recorder {
    fn name(&self) -> &str {
        self.name
    }

    fn handle(&mut self, message: &Message) -> Result<()> {
        if self.config.accepts(self.name, message.level()) {
            self.journal.lock().push(format!("{}:{}", self.name, message.text()));
        }
        Ok(())
    }
}

fn quiet_env() -> Arc<MapEnv> {
    Arc::new(MapEnv::new().with("CONSOLE_LOGGING", "false"))
}

fn recorder(name: &'static str, journal: &Journal) -> StagedHandler {
    let journal = Arc::clone(journal);
    StagedHandler::new(move |config| Recorder {
        name,
        config: config.clone(),
        journal,
    })
}

#[test]
fn test_configure_installs_console_and_logger() {
    let _serial = SERIAL.lock();
    reset();

    let configured = configure_with_env(Settings::new(), quiet_env()).unwrap();
    let names = configured.pipeline().with(|p| p.handler_names().join(",")).unwrap();
    assert_eq!(names, CONSOLE_HANDLER);
    assert_eq!(
        configured.exposed_names(),
        vec![CHAIN_SLOT.to_string(), LOGGER_ADAPTER.to_string()]
    );

    let logger = configured.adapter::<LoggerAdapter>(LOGGER_ADAPTER).unwrap();
    assert!(logger.pipeline().ptr_eq(configured.pipeline()));
    reset();
}

#[test]
fn test_reconfigure_replaces_instance() {
    let _serial = SERIAL.lock();
    reset();

    let first = configure_with_env(Settings::new(), quiet_env()).unwrap();
    first.bind_adapter("cache", Arc::new(1u32)).unwrap();

    let second = configure_with_env(Settings::new(), quiet_env()).unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(second.adapter::<u32>("cache").is_none());
    assert!(Arc::ptr_eq(&instance().unwrap(), &second));
    reset();
}

#[test]
fn test_get_or_configure_reuses_instance() {
    let _serial = SERIAL.lock();
    reset();
    assert!(instance().is_none());

    let configured = configure_with_env(Settings::new(), quiet_env()).unwrap();
    let reused = get_or_configure().unwrap();
    assert!(Arc::ptr_eq(&configured, &reused));

    reset();
    assert!(instance().is_none());
}

#[test]
fn test_staged_handlers_run_after_console_in_order() {
    let _serial = SERIAL.lock();
    reset();

    let journal = Journal::default();
    stage_handler(recorder("FIRST", &journal));
    stage_handler(recorder("SECOND", &journal));
    assert_eq!(staged_count(), (2, 0));

    let configured = configure_with_env(Settings::new(), quiet_env()).unwrap();
    assert_eq!(staged_count(), (0, 0));
    let names = configured.pipeline().with(|p| p.handler_names().join(",")).unwrap();
    assert_eq!(names, "CONSOLE,FIRST,SECOND");

    configured.log("info", "hello", NO_META).unwrap();
    assert_eq!(*journal.lock(), vec!["FIRST:hello", "SECOND:hello"]);
    reset();
}

#[test]
fn test_staging_is_drained_once() {
    let _serial = SERIAL.lock();
    reset();

    let journal = Journal::default();
    stage_handler(recorder("ONCE", &journal));
    configure_with_env(Settings::new(), quiet_env()).unwrap();

    let again = configure_with_env(Settings::new(), quiet_env()).unwrap();
    assert_eq!(again.pipeline().with(Pipeline::len).unwrap(), 1);
    reset();
}

#[test]
fn test_staged_handler_settings_are_overridden_by_top_level() {
    let _serial = SERIAL.lock();
    reset();

    let journal = Journal::default();
    stage_handler(
        recorder("AUDIT", &journal)
            .with_settings(Settings::new().with("MIN_LOG_LEVEL_AUDIT", "error").with("MIN_LOG_LEVEL", "silly")),
    );
    let configured = configure_with_env(
        Settings::new().with("MIN_LOG_LEVEL_AUDIT", "warn"),
        quiet_env(),
    )
    .unwrap();

    configured.log("info", "skipped", NO_META).unwrap();
    configured.log("warn", "kept", NO_META).unwrap();
    assert_eq!(*journal.lock(), vec!["AUDIT:kept"]);
    reset();
}

#[test]
fn test_staged_adapters() {
    let _serial = SERIAL.lock();
    reset();

    let journal = Journal::default();
    stage_handler(recorder("MAILER", &journal).with_adapter("mailer", |_| Arc::new(String::from("smtp"))));
    stage_adapter("cache", |_| Arc::new(1u32));
    stage_adapter("cache", |_| Arc::new(2u32));
    stage_adapter(LOGGER_ADAPTER, |_| Arc::new(String::from("impostor")));
    stage_adapter(CHAIN_SLOT, |_| Arc::new(0u8));
    assert_eq!(staged_count(), (1, 3));

    let configured = configure_with_env(Settings::new(), quiet_env()).unwrap();

    assert_eq!(configured.adapter::<String>("mailer").as_deref().map(String::as_str), Some("smtp"));
    assert_eq!(configured.adapter::<u32>("cache").as_deref(), Some(&2));
    assert!(configured.adapter::<LoggerAdapter>(LOGGER_ADAPTER).is_some());
    assert!(configured.adapter::<PipelineHandle>(CHAIN_SLOT).is_some());
    reset();
}

#[test]
fn test_staged_handler_adapters_last_writer_wins() {
    let _serial = SERIAL.lock();
    reset();

    let journal = Journal::default();
    stage_adapter("notifier", |_| Arc::new(String::from("staged")));
    stage_handler(recorder("SLACK", &journal).with_adapter("notifier", |_| Arc::new(String::from("slack"))));
    stage_handler(recorder("EMAIL", &journal).with_adapter("notifier", |_| Arc::new(String::from("email"))));

    let configured = configure_with_env(Settings::new(), quiet_env()).unwrap();

    assert_eq!(
        configured.adapter::<String>("notifier").as_deref().map(String::as_str),
        Some("email")
    );
    let names = configured.pipeline().with(|p| p.handler_names().join(",")).unwrap();
    assert_eq!(names, "CONSOLE,SLACK,EMAIL");
    reset();
}

#[test]
fn test_staged_adapters_bind_after_all_handlers() {
    let _serial = SERIAL.lock();
    reset();

    let journal = Journal::default();
    stage_handler(recorder("FIRST", &journal).with_adapter("chain_len", |instance| {
        Arc::new(instance.pipeline().with(Pipeline::len).unwrap_or_default())
    }));
    stage_handler(recorder("SECOND", &journal));

    let configured = configure_with_env(Settings::new(), quiet_env()).unwrap();
    assert_eq!(configured.adapter::<usize>("chain_len").as_deref(), Some(&3));
    reset();
}

#[test]
fn test_staged_adapter_sees_instance() {
    let _serial = SERIAL.lock();
    reset();

    stage_adapter("chain_len", |instance| {
        Arc::new(instance.pipeline().with(Pipeline::len).unwrap_or_default())
    });
    let configured = configure_with_env(Settings::new(), quiet_env()).unwrap();

    assert_eq!(configured.adapter::<usize>("chain_len").as_deref(), Some(&1));
    reset();
}

#[test]
fn test_presets_are_expanded() {
    let _serial = SERIAL.lock();
    reset();

    let settings = Settings::from_json_str(r#"{"LOG_LEVEL": false, "presets": ["prefix"]}"#).unwrap();
    let configured = configure_with_env(settings, quiet_env()).unwrap();

    assert!(configured.config().flag("LOG_LEVEL"));
    assert!(configured.config().flag("LOG_TIMESTAMP"));

    let settings = Settings::new().with("presets", serde_json::json!(["prefix", "no-prefix", "unknown"]));
    let configured = configure_with_env(settings, quiet_env()).unwrap();
    assert!(!configured.config().flag("LOG_REQID"));
    reset();
}

#[test]
fn test_reset_clears_staging() {
    let _serial = SERIAL.lock();
    reset();

    let journal = Journal::default();
    stage_handler(recorder("DROPPED", &journal));
    reset();
    assert_eq!(staged_count(), (0, 0));
}
