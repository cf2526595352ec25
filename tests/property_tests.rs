//! Property-based tests for rust_logger_chain using proptest

use proptest::prelude::*;
use rust_logger_chain::prelude::*;
use rust_logger_chain::{resolve_bool, resolve_min_level, AdapterRegistry};
use std::sync::Arc;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Silly),
        Just(LogLevel::Verbose),
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
    ]
}

/// A level name, a typo, or nothing
fn raw_level() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        any_level().prop_map(|l| Some(l.name().to_string())),
        "[a-zA-Z]{0,8}".prop_map(Some),
    ]
}

fn layered(
    handler_env: Option<String>,
    handler_setting: Option<String>,
    global_env: Option<String>,
    global_setting: Option<String>,
) -> (Settings, MapEnv) {
    let mut settings = Settings::new();
    let env = MapEnv::new();
    if let Some(v) = handler_env {
        env.set("MIN_LOG_LEVEL_SINK", v);
    }
    if let Some(v) = handler_setting {
        settings = settings.with("MIN_LOG_LEVEL_SINK", v);
    }
    if let Some(v) = global_env {
        env.set("MIN_LOG_LEVEL", v);
    }
    if let Some(v) = global_setting {
        settings = settings.with("MIN_LOG_LEVEL", v);
    }
    (settings, env)
}

// ============================================================================
// Level resolution
// ============================================================================

proptest! {
    /// Level names parse back to the same level, in any letter case
    #[test]
    fn test_level_name_roundtrip(level in any_level(), upper in any::<bool>()) {
        let name = if upper { level.to_str().to_string() } else { level.name().to_string() };
        let parsed: LogLevel = name.parse().unwrap();
        prop_assert_eq!(parsed, level);
    }

    /// Whatever the layers hold, the result is one of the six levels
    #[test]
    fn test_min_level_is_always_valid(
        a in raw_level(), b in raw_level(), c in raw_level(), d in raw_level()
    ) {
        let (settings, env) = layered(a, b, c, d);
        let level = resolve_min_level(&settings, &env, Some("SINK"));
        prop_assert!(LogLevel::ALL.contains(&level));
    }

    /// The highest non-empty layer decides
    #[test]
    fn test_min_level_precedence(
        a in proptest::option::of(any_level()),
        b in proptest::option::of(any_level()),
        c in proptest::option::of(any_level()),
        d in proptest::option::of(any_level()),
    ) {
        let name = |l: Option<LogLevel>| l.map(|l| l.name().to_string());
        let (settings, env) = layered(name(a), name(b), name(c), name(d));

        let expected = a.or(b).or(c).or(d).unwrap_or(LogLevel::Info);
        prop_assert_eq!(resolve_min_level(&settings, &env, Some("SINK")), expected);
    }

    /// Boolean flags follow the same layer order
    #[test]
    fn test_bool_precedence(
        a in proptest::option::of(any::<bool>()),
        b in proptest::option::of(any::<bool>()),
        c in proptest::option::of(any::<bool>()),
        d in proptest::option::of(any::<bool>()),
    ) {
        let env = MapEnv::new();
        let mut settings = Settings::new();
        if let Some(v) = a {
            env.set("CONSOLE_LOGGING_SINK", v.to_string());
        }
        if let Some(v) = b {
            settings = settings.with("CONSOLE_LOGGING_SINK", v);
        }
        if let Some(v) = c {
            env.set("CONSOLE_LOGGING", v.to_string());
        }
        if let Some(v) = d {
            settings = settings.with("CONSOLE_LOGGING", v);
        }

        prop_assert_eq!(
            resolve_bool("CONSOLE_LOGGING", &settings, &env, Some("SINK")),
            a.or(b).or(c).or(d)
        );
    }

    /// Environment strings other than "true"/"false" are ignored
    #[test]
    fn test_bool_ignores_other_env_values(raw in "[a-z0-9]{1,6}", setting in any::<bool>()) {
        prop_assume!(raw != "true" && raw != "false");
        let env = MapEnv::new().with("JSONIFY", raw);
        let settings = Settings::new().with("JSONIFY", setting);
        prop_assert_eq!(resolve_bool("JSONIFY", &settings, &env, None), Some(setting));
    }
}

// ============================================================================
// Messages
// ============================================================================

proptest! {
    /// Later metas overwrite earlier ones, and the default notify survives
    /// unless overridden
    #[test]
    fn test_meta_fold_is_last_writer_wins(values in prop::collection::vec(any::<i64>(), 1..8)) {
        let metas: Vec<MetaArg> = values
            .iter()
            .map(|v| MetaArg::from(Meta::new().with_field("n", *v)))
            .collect();
        let message = Message::compose("host", "info", "x", metas);

        prop_assert_eq!(message.meta().get("n"), Some(&MetaValue::Int(*values.last().unwrap())));
        prop_assert!(message.notify());
    }

    /// Any text payload is kept as-is; levels always normalize
    #[test]
    fn test_text_and_level_normalization(text in ".*", level in raw_level()) {
        let message = Message::compose("host", level.clone(), text.as_str(), NO_META);
        prop_assert_eq!(message.text(), text.as_str());

        let expected = LogLevel::parse_or_default(level.as_deref());
        prop_assert_eq!(message.level(), expected);
    }
}

// ============================================================================
// Adapter binding
// ============================================================================

proptest! {
    /// The first bind under a name wins, however many follow
    #[test]
    fn test_first_bind_wins(name in "[a-z]{1,10}", values in prop::collection::vec(any::<u32>(), 1..6)) {
        let registry = AdapterRegistry::new();
        for (i, v) in values.iter().enumerate() {
            let bound = registry.bind(&name, Arc::new(*v)).unwrap();
            prop_assert_eq!(bound, i == 0);
        }
        let got = registry.get_as::<u32>(&name);
        prop_assert_eq!(got.as_deref(), Some(&values[0]));
    }
}
