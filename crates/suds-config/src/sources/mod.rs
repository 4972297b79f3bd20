//! Configuration sources
//!
//! The gateway asks its source for the current configuration on every
//! operation, so a source may change what it returns at runtime:
//! - Static: fixed configuration, built once
//! - Shared: atomically replaceable configuration (e.g. after a reload)

mod shared;

pub use shared::SharedConfigSource;

use std::sync::Arc;

use crate::SudsConfig;

/// Trait for configuration sources
pub trait ConfigSource: Send + Sync {
    /// Name of this source (for logging and debugging)
    fn name(&self) -> &str;

    /// Current configuration snapshot
    fn get(&self) -> Arc<SudsConfig>;
}

/// Configuration that never changes after construction.
#[derive(Debug, Clone)]
pub struct StaticConfigSource {
    config: Arc<SudsConfig>,
}

impl StaticConfigSource {
    pub fn new(config: SudsConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl Default for StaticConfigSource {
    fn default() -> Self {
        Self::new(SudsConfig::default())
    }
}

impl ConfigSource for StaticConfigSource {
    fn name(&self) -> &str {
        "static"
    }

    fn get(&self) -> Arc<SudsConfig> {
        Arc::clone(&self.config)
    }
}
