//! Environment variable sources and process identity

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Read access to environment variables.
///
/// The resolver consults this on every call, so implementations must
/// not cache: configuration may change between two `log()` calls.
pub trait EnvSource: Send + Sync + fmt::Debug {
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory environment, mutable through a shared reference
///
/// # Example
///
/// ```
/// use rust_logger_chain::{EnvSource, MapEnv};
///
/// let env = MapEnv::new().with("MIN_LOG_LEVEL", "warn");
/// assert_eq!(env.var("MIN_LOG_LEVEL").as_deref(), Some("warn"));
///
/// env.remove("MIN_LOG_LEVEL");
/// assert_eq!(env.var("MIN_LOG_LEVEL"), None);
/// ```
#[derive(Debug, Default)]
pub struct MapEnv {
    vars: RwLock<HashMap<String, String>>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.write().insert(key.into(), value.into());
    }

    pub fn remove(&self, key: &str) {
        self.vars.write().remove(key);
    }

    pub fn clear(&self) {
        self.vars.write().clear();
    }
}

impl EnvSource for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.read().get(key).cloned()
    }
}

/// Instance number assumed for a single-segment hostname
pub const DEFAULT_INSTANCE_NUMBER: u32 = 1;

/// Identity of the running process, stamped on every message as `instanceId`.
///
/// Taken from `HOSTNAME`, falling back to `USER`. For container-style
/// hostnames (`worker-3`) the trailing segment is the instance number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceIdentity {
    id: String,
    instance_number: Option<u32>,
}

impl InstanceIdentity {
    pub fn from_env(env: &dyn EnvSource) -> Self {
        match env.var("HOSTNAME").filter(|h| !h.is_empty()) {
            Some(hostname) => {
                let segments: Vec<&str> = hostname.split('-').collect();
                let instance_number = if segments.len() == 1 {
                    Some(DEFAULT_INSTANCE_NUMBER)
                } else {
                    segments.last().and_then(|s| s.parse().ok())
                };
                Self {
                    id: hostname,
                    instance_number,
                }
            }
            None => Self {
                id: env.var("USER").unwrap_or_default(),
                instance_number: Some(0),
            },
        }
    }

    /// Identity of this process, resolved once
    pub fn current() -> &'static InstanceIdentity {
        static CURRENT: OnceLock<InstanceIdentity> = OnceLock::new();
        CURRENT.get_or_init(|| InstanceIdentity::from_env(&ProcessEnv))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// `None` when the hostname's last segment is not numeric
    pub fn instance_number(&self) -> Option<u32> {
        self.instance_number
    }
}
