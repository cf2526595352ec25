//! Ordered handler chain and message dispatch

use super::{
    env::InstanceIdentity,
    error::{ChainError, Result},
    handler::{is_valid_name, Handler},
    log_level::IntoLevel,
    message::{Message, Payload},
    meta::MetaArg,
    metrics::PipelineMetrics,
    prefix::CallerInfo,
    resolver::Config,
};
use parking_lot::ReentrantMutex;
use std::cell::RefCell;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Whether next-links reflect the current handler list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// Handlers registered, next-links not built yet
    Unlinked,
    /// Each handler linked to its successor in registration order
    Linked,
}

/// Ordered sequence of handlers, dispatched in registration order.
///
/// Linking is lazy: the first `log()` builds the next-links, and adding a
/// handler to a linked pipeline re-links it right away. The pipeline walks
/// the links itself, so every handler sees every message whether or not it
/// acts on it, and a handler can not cut the chain short.
///
/// # Example
///
/// ```
/// use rust_logger_chain::{Config, Handler, Message, Pipeline, Result, Settings, NO_META};
///
/// struct Noop;
///
/// impl Handler for Noop {
///     fn name(&self) -> &str { "NOOP" }
///     fn handle(&mut self, _message: &Message) -> Result<()> { Ok(()) }
/// }
///
/// let mut pipeline = Pipeline::new(Config::from_settings(Settings::new()));
/// assert_eq!(pipeline.add_handler(Noop)?, 0);
/// pipeline.log("info", "hello", NO_META)?;
/// assert!(pipeline.is_linked());
/// # Ok::<(), rust_logger_chain::ChainError>(())
/// ```
pub struct Pipeline {
    config: Config,
    identity: InstanceIdentity,
    handlers: Vec<Box<dyn Handler>>,
    links: Vec<Option<usize>>,
    state: LinkState,
    chain_start: Option<usize>,
    chain_end: Option<usize>,
    metrics: Arc<PipelineMetrics>,
}

impl Pipeline {
    #[must_use]
    pub fn new(config: Config) -> Self {
        let identity = InstanceIdentity::from_env(config.env());
        Self {
            config,
            identity,
            handlers: Vec::new(),
            links: Vec::new(),
            state: LinkState::Unlinked,
            chain_start: None,
            chain_end: None,
            metrics: Arc::new(PipelineMetrics::new()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn identity(&self) -> &InstanceIdentity {
        &self.identity
    }

    /// Append a handler; returns its position in the chain
    pub fn add_handler<H: Handler + 'static>(&mut self, handler: H) -> Result<usize> {
        self.add_boxed(Box::new(handler))
    }

    /// Append an already boxed handler
    pub fn add_boxed(&mut self, handler: Box<dyn Handler>) -> Result<usize> {
        if !is_valid_name(handler.name()) {
            return Err(ChainError::config(
                "Pipeline",
                format!(
                    "handler name '{}' must be non-empty ASCII letters, digits or '_'",
                    handler.name()
                ),
            ));
        }

        self.handlers.push(handler);
        let index = self.handlers.len() - 1;
        self.chain_start = Some(0);
        self.chain_end = Some(index);

        if self.state == LinkState::Linked {
            self.link();
        }
        Ok(index)
    }

    /// Append a handler if there is one; `None` is not an error
    pub fn add_optional<H: Handler + 'static>(&mut self, handler: Option<H>) -> Result<Option<usize>> {
        handler.map(|h| self.add_handler(h)).transpose()
    }

    /// Link each handler to its successor, in registration order
    pub fn link(&mut self) {
        let count = self.handlers.len();
        self.links = (0..count)
            .map(|i| if i + 1 < count { Some(i + 1) } else { None })
            .collect();
        self.state = LinkState::Linked;
        self.metrics.record_relink();
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn is_linked(&self) -> bool {
        self.state == LinkState::Linked
    }

    /// Successor of the handler at `index`, `None` for the last one
    pub fn next_of(&self, index: usize) -> Option<usize> {
        self.links.get(index).copied().flatten()
    }

    /// Build a message and dispatch it through the chain
    #[track_caller]
    pub fn log<L, P, M>(&mut self, level: L, payload: P, metas: M) -> Result<()>
    where
        L: IntoLevel,
        P: Into<Payload>,
        M: IntoIterator<Item = MetaArg>,
    {
        let caller = CallerInfo::from_location(Location::caller());
        self.log_with_caller(caller, level, payload, metas)
    }

    /// Same as [`Pipeline::log`] with an explicit call site
    pub fn log_with_caller<L, P, M>(&mut self, caller: CallerInfo, level: L, payload: P, metas: M) -> Result<()>
    where
        L: IntoLevel,
        P: Into<Payload>,
        M: IntoIterator<Item = MetaArg>,
    {
        if !self.is_linked() {
            self.link();
        }
        let message = Message::compose(self.identity.id(), level, payload, metas).with_caller(caller);
        self.dispatch(&message)
    }

    /// Hand an existing message to every handler, first to last.
    ///
    /// The first handler error stops the walk and is returned.
    pub fn dispatch(&mut self, message: &Message) -> Result<()> {
        if !self.is_linked() {
            self.link();
        }
        self.metrics.record_dispatched();

        let mut cursor = self.chain_start;
        while let Some(index) = cursor {
            if let Err(e) = self.handlers[index].handle(message) {
                self.metrics.record_failed();
                return Err(e);
            }
            cursor = self.next_of(index);
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        for handler in self.handlers.iter_mut() {
            handler.flush()?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn handler(&self, index: usize) -> Option<&dyn Handler> {
        self.handlers.get(index).map(|h| h.as_ref())
    }

    pub fn handler_names(&self) -> Vec<&str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    /// Name of the first handler
    pub fn chain_start(&self) -> Option<&str> {
        self.chain_start.map(|i| self.handlers[i].name())
    }

    /// Name of the last handler
    pub fn chain_end(&self) -> Option<&str> {
        self.chain_end.map(|i| self.handlers[i].name())
    }

    pub fn metrics(&self) -> &PipelineMetrics {
        &self.metrics
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("handlers", &self.handler_names())
            .field("state", &self.state)
            .finish()
    }
}

/// Shared handle to a [`Pipeline`].
///
/// Calls from other threads wait for the current dispatch to finish. A
/// handler that calls back into the pipeline it is being dispatched from
/// gets [`ChainError::ReentrantDispatch`].
#[derive(Clone)]
pub struct PipelineHandle {
    inner: Arc<ReentrantMutex<RefCell<Pipeline>>>,
    metrics: Arc<PipelineMetrics>,
}

impl PipelineHandle {
    pub fn new(pipeline: Pipeline) -> Self {
        let metrics = Arc::clone(&pipeline.metrics);
        Self {
            inner: Arc::new(ReentrantMutex::new(RefCell::new(pipeline))),
            metrics,
        }
    }

    fn with_mut<R>(&self, f: impl FnOnce(&mut Pipeline) -> Result<R>) -> Result<R> {
        let guard = self.inner.lock();
        let mut pipeline = guard
            .try_borrow_mut()
            .map_err(|_| ChainError::ReentrantDispatch)?;
        f(&mut pipeline)
    }

    /// Read-only access to the pipeline
    pub fn with<R>(&self, f: impl FnOnce(&Pipeline) -> R) -> Result<R> {
        let guard = self.inner.lock();
        let pipeline = guard
            .try_borrow()
            .map_err(|_| ChainError::ReentrantDispatch)?;
        Ok(f(&pipeline))
    }

    #[track_caller]
    pub fn log<L, P, M>(&self, level: L, payload: P, metas: M) -> Result<()>
    where
        L: IntoLevel,
        P: Into<Payload>,
        M: IntoIterator<Item = MetaArg>,
    {
        let caller = CallerInfo::from_location(Location::caller());
        self.log_with_caller(caller, level, payload, metas)
    }

    pub fn log_with_caller<L, P, M>(&self, caller: CallerInfo, level: L, payload: P, metas: M) -> Result<()>
    where
        L: IntoLevel,
        P: Into<Payload>,
        M: IntoIterator<Item = MetaArg>,
    {
        self.with_mut(|pipeline| pipeline.log_with_caller(caller, level, payload, metas))
    }

    pub fn dispatch(&self, message: &Message) -> Result<()> {
        self.with_mut(|pipeline| pipeline.dispatch(message))
    }

    pub fn add_handler<H: Handler + 'static>(&self, handler: H) -> Result<usize> {
        self.with_mut(|pipeline| pipeline.add_handler(handler))
    }

    pub fn add_boxed(&self, handler: Box<dyn Handler>) -> Result<usize> {
        self.with_mut(|pipeline| pipeline.add_boxed(handler))
    }

    pub fn add_optional<H: Handler + 'static>(&self, handler: Option<H>) -> Result<Option<usize>> {
        self.with_mut(|pipeline| pipeline.add_optional(handler))
    }

    pub fn flush(&self) -> Result<()> {
        self.with_mut(Pipeline::flush)
    }

    pub fn config(&self) -> Result<Config> {
        self.with(|pipeline| pipeline.config().clone())
    }

    pub fn metrics(&self) -> &PipelineMetrics {
        &self.metrics
    }

    /// Whether both handles refer to the same pipeline
    pub fn ptr_eq(&self, other: &PipelineHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for PipelineHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineHandle")
            .field("dispatched", &self.metrics.dispatched_count())
            .finish()
    }
}
