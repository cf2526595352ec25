//! Named capability objects exposed to the embedding application

use super::error::{ChainError, Result};
use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A bound adapter, downcast with [`Arc::downcast`]
pub type AdapterRef = Arc<dyn Any + Send + Sync>;

/// Names visible on the singleton, shared between the registry and its owner
pub type ExposedRecord = Arc<RwLock<HashMap<String, AdapterRef>>>;

/// Registry of adapters bound under unique names.
///
/// Binding is first-writer-wins: a name already bound here, or already
/// occupied on the exposed record by anything else, is left untouched.
///
/// # Example
///
/// ```
/// use rust_logger_chain::AdapterRegistry;
/// use std::sync::Arc;
///
/// let registry = AdapterRegistry::new();
/// assert!(registry.bind("metrics", Arc::new(1u32))?);
/// assert!(!registry.bind("metrics", Arc::new(2u32))?);
/// assert_eq!(registry.get_as::<u32>("metrics").as_deref(), Some(&1));
/// # Ok::<(), rust_logger_chain::ChainError>(())
/// ```
pub struct AdapterRegistry {
    bound: RwLock<HashMap<String, AdapterRef>>,
    exposed: ExposedRecord,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::with_record(ExposedRecord::default())
    }

    /// Registry publishing into an existing record
    pub fn with_record(exposed: ExposedRecord) -> Self {
        Self {
            bound: RwLock::new(HashMap::new()),
            exposed,
        }
    }

    /// Bind `instance` under `name`.
    ///
    /// Returns `Ok(false)` without touching anything when the name is taken.
    pub fn bind<T: Any + Send + Sync>(&self, name: &str, instance: Arc<T>) -> Result<bool> {
        self.bind_ref(name, instance)
    }

    /// Bind an already type-erased adapter
    pub fn bind_ref(&self, name: &str, instance: AdapterRef) -> Result<bool> {
        check_name(name)?;

        let mut bound = self.bound.write();
        let mut exposed = self.exposed.write();
        if bound.contains_key(name) || exposed.contains_key(name) {
            return Ok(false);
        }

        exposed.insert(name.to_string(), Arc::clone(&instance));
        bound.insert(name.to_string(), instance);
        Ok(true)
    }

    /// Remove `name` from the registry and the exposed record.
    ///
    /// Names this registry does not own are left alone; returns whether
    /// anything was removed.
    pub fn unbind(&self, name: &str) -> Result<bool> {
        check_name(name)?;

        let mut bound = self.bound.write();
        if bound.remove(name).is_none() {
            return Ok(false);
        }
        self.exposed.write().remove(name);
        Ok(true)
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.bound.read().contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<AdapterRef> {
        self.bound.read().get(name).cloned()
    }

    /// Typed lookup; `None` when unbound or of another type
    pub fn get_as<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        self.get(name).and_then(|adapter| adapter.downcast::<T>().ok())
    }

    /// Bound names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.bound.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.bound.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.read().is_empty()
    }

    pub fn exposed(&self) -> &ExposedRecord {
        &self.exposed
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("bound", &self.names())
            .finish()
    }
}

fn check_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ChainError::config("AdapterRegistry", "adapter name must not be empty"));
    }
    Ok(())
}
