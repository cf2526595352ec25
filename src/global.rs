//! Process-wide instance and the staging buffer
//!
//! Lifecycle: [`configure`] always builds a fresh [`Instance`] and replaces
//! the previous one, [`get_or_configure`] reuses it if there is one, and
//! [`reset`] drops it. Handlers and adapters staged before configuration
//! are installed by the next build and then forgotten.

use crate::adapters::{LoggerAdapter, LOGGER_ADAPTER};
use crate::core::{
    AdapterRef, Config, EnvSource, Handler, Instance, ProcessEnv, Result, Settings,
};
use crate::handlers::ConsoleHandler;
use parking_lot::{Mutex, RwLock};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Builds a staged handler from its configuration
pub type HandlerFactory = Box<dyn FnOnce(&Config) -> Box<dyn Handler> + Send>;

/// Builds an adapter for a freshly configured instance
pub type AdapterFactory = Box<dyn FnOnce(&Instance) -> AdapterRef + Send>;

static INSTANCE: RwLock<Option<Arc<Instance>>> = RwLock::new(None);
static STAGING: Mutex<Staging> = Mutex::new(Staging::new());

/// A handler registered before the instance exists.
///
/// # Example
///
/// ```
/// use rust_logger_chain::{ConsoleHandler, Settings, StagedHandler};
///
/// let staged = StagedHandler::new(|config| ConsoleHandler::new(config.clone()))
///     .with_settings(Settings::new().with("MIN_LOG_LEVEL_CONSOLE", "warn"));
/// rust_logger_chain::stage_handler(staged);
/// ```
pub struct StagedHandler {
    factory: HandlerFactory,
    settings: Option<Settings>,
    adapter: Option<(String, AdapterFactory)>,
}

impl StagedHandler {
    pub fn new<H, F>(factory: F) -> Self
    where
        H: Handler + 'static,
        F: FnOnce(&Config) -> H + Send + 'static,
    {
        Self {
            factory: Box::new(move |config| Box::new(factory(config)) as Box<dyn Handler>),
            settings: None,
            adapter: None,
        }
    }

    /// Handler-level settings; top-level settings still win over them
    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Adapter bound once every staged handler is added; a later staged
    /// adapter of the same name replaces it
    #[must_use]
    pub fn with_adapter<T, F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: FnOnce(&Instance) -> Arc<T> + Send + 'static,
    {
        self.adapter = Some((name.into(), erase(factory)));
        self
    }
}

impl fmt::Debug for StagedHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StagedHandler")
            .field("settings", &self.settings)
            .field("adapter", &self.adapter.as_ref().map(|(name, _)| name))
            .finish()
    }
}

#[derive(Default)]
struct Staging {
    handlers: Vec<StagedHandler>,
    adapters: Vec<(String, AdapterFactory)>,
}

impl Staging {
    const fn new() -> Self {
        Self {
            handlers: Vec::new(),
            adapters: Vec::new(),
        }
    }
}

fn erase<T, F>(factory: F) -> AdapterFactory
where
    T: Any + Send + Sync,
    F: FnOnce(&Instance) -> Arc<T> + Send + 'static,
{
    Box::new(move |instance| factory(instance) as AdapterRef)
}

/// Queue a handler for the next configuration
pub fn stage_handler(handler: StagedHandler) {
    STAGING.lock().handlers.push(handler);
}

/// Queue an adapter for the next configuration.
///
/// Staging the same name again replaces the earlier factory.
pub fn stage_adapter<T, F>(name: impl Into<String>, factory: F)
where
    T: Any + Send + Sync,
    F: FnOnce(&Instance) -> Arc<T> + Send + 'static,
{
    merge_adapter(&mut STAGING.lock().adapters, name.into(), erase(factory));
}

/// Number of handlers and adapters waiting for the next configuration
pub fn staged_count() -> (usize, usize) {
    let staging = STAGING.lock();
    (staging.handlers.len(), staging.adapters.len())
}

fn take_staging() -> Staging {
    std::mem::take(&mut *STAGING.lock())
}

/// Build a fresh instance from `settings` and the process environment
pub fn configure(settings: Settings) -> Result<Arc<Instance>> {
    configure_with_env(settings, Arc::new(ProcessEnv))
}

/// Build a fresh instance against `env`, replacing the current one
pub fn configure_with_env(settings: Settings, env: Arc<dyn EnvSource>) -> Result<Arc<Instance>> {
    let instance = Arc::new(build(settings, env, take_staging())?);
    *INSTANCE.write() = Some(Arc::clone(&instance));
    Ok(instance)
}

/// The current instance, if configured
pub fn instance() -> Option<Arc<Instance>> {
    INSTANCE.read().clone()
}

/// The current instance, configuring one with empty settings if needed
pub fn get_or_configure() -> Result<Arc<Instance>> {
    if let Some(existing) = instance() {
        return Ok(existing);
    }

    let built = Arc::new(build(Settings::new(), Arc::new(ProcessEnv), take_staging())?);
    let mut slot = INSTANCE.write();
    match slot.as_ref() {
        Some(existing) => Ok(Arc::clone(existing)),
        None => {
            *slot = Some(Arc::clone(&built));
            Ok(built)
        }
    }
}

/// Drop the current instance and anything still staged
pub fn reset() {
    *INSTANCE.write() = None;
    *STAGING.lock() = Staging::new();
}

/// Install, in order: console handler, `"logger"` adapter, staged handlers,
/// then every staged adapter.
///
/// Adapters are merged by name before binding: staged adapters first, then
/// the adapters of staged handlers in registration order, the last one
/// winning.
fn build(settings: Settings, env: Arc<dyn EnvSource>, staging: Staging) -> Result<Instance> {
    let config = Config::new(settings.with_presets_applied(), env);
    let instance = Instance::new(config.clone());

    instance.add_handler(ConsoleHandler::new(config.clone()))?;
    let logger = Arc::new(LoggerAdapter::new(instance.pipeline().clone()));
    instance.bind_adapter(LOGGER_ADAPTER, logger)?;

    let mut adapters = staging.adapters;
    for staged in staging.handlers {
        let handler_config = match staged.settings {
            Some(ref handler_settings) => config.with_defaults(handler_settings),
            None => config.clone(),
        };
        instance.pipeline().add_boxed((staged.factory)(&handler_config))?;

        if let Some((name, factory)) = staged.adapter {
            merge_adapter(&mut adapters, name, factory);
        }
    }

    for (name, factory) in adapters {
        bind_staged(&instance, &name, factory)?;
    }

    Ok(instance)
}

fn merge_adapter(adapters: &mut Vec<(String, AdapterFactory)>, name: String, factory: AdapterFactory) {
    adapters.retain(|(staged, _)| *staged != name);
    adapters.push((name, factory));
}

fn bind_staged(instance: &Instance, name: &str, factory: AdapterFactory) -> Result<()> {
    let adapter = factory(instance);
    if !instance.adapters().bind_ref(name, adapter)? {
        eprintln!(
            "[LOGGER WARNING] Adapter '{}' not bound: name already exposed",
            name
        );
    }
    Ok(())
}
