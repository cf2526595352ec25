//! A configured pipeline together with its adapters

use super::{
    adapter::{AdapterRef, AdapterRegistry, ExposedRecord},
    error::Result,
    handler::Handler,
    log_level::IntoLevel,
    message::Payload,
    meta::MetaArg,
    pipeline::{Pipeline, PipelineHandle},
    prefix::CallerInfo,
    resolver::Config,
};
use std::any::Any;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Slot on the exposed record holding the instance's own pipeline
pub const CHAIN_SLOT: &str = "chain";

/// Pipeline, adapter registry and the record of everything exposed by name.
///
/// The record starts out holding the pipeline under `"chain"`, so no
/// adapter can ever be bound under that name.
pub struct Instance {
    config: Config,
    pipeline: PipelineHandle,
    adapters: AdapterRegistry,
}

impl Instance {
    pub fn new(config: Config) -> Self {
        let pipeline = PipelineHandle::new(Pipeline::new(config.clone()));
        let exposed = ExposedRecord::default();
        let chain: AdapterRef = Arc::new(pipeline.clone());
        exposed.write().insert(CHAIN_SLOT.to_string(), chain);

        Self {
            config,
            pipeline,
            adapters: AdapterRegistry::with_record(exposed),
        }
    }

    /// Top-level configuration, presets already expanded
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pipeline(&self) -> &PipelineHandle {
        &self.pipeline
    }

    pub fn adapters(&self) -> &AdapterRegistry {
        &self.adapters
    }

    #[track_caller]
    pub fn log<L, P, M>(&self, level: L, payload: P, metas: M) -> Result<()>
    where
        L: IntoLevel,
        P: Into<Payload>,
        M: IntoIterator<Item = MetaArg>,
    {
        let caller = CallerInfo::from_location(Location::caller());
        self.pipeline.log_with_caller(caller, level, payload, metas)
    }

    pub fn log_with_caller<L, P, M>(&self, caller: CallerInfo, level: L, payload: P, metas: M) -> Result<()>
    where
        L: IntoLevel,
        P: Into<Payload>,
        M: IntoIterator<Item = MetaArg>,
    {
        self.pipeline.log_with_caller(caller, level, payload, metas)
    }

    pub fn add_handler<H: Handler + 'static>(&self, handler: H) -> Result<usize> {
        self.pipeline.add_handler(handler)
    }

    /// First-writer-wins bind; see [`AdapterRegistry::bind`]
    pub fn bind_adapter<T: Any + Send + Sync>(&self, name: &str, adapter: Arc<T>) -> Result<bool> {
        self.adapters.bind(name, adapter)
    }

    pub fn unbind_adapter(&self, name: &str) -> Result<bool> {
        self.adapters.unbind(name)
    }

    /// Typed lookup on the exposed record, `"chain"` included
    pub fn adapter<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        let adapter = self.adapters.exposed().read().get(name).cloned()?;
        adapter.downcast::<T>().ok()
    }

    /// Everything currently exposed, sorted by name
    pub fn exposed_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.adapters.exposed().read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn flush(&self) -> Result<()> {
        self.pipeline.flush()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("pipeline", &self.pipeline)
            .field("exposed", &self.exposed_names())
            .finish()
    }
}
