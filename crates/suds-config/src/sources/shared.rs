//! Runtime-replaceable configuration source.

use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::info;

use crate::sources::ConfigSource;
use crate::{ConfigError, SudsConfig};

/// Configuration source whose snapshot can be swapped while readers keep going.
///
/// Readers get an `Arc` of the snapshot current at call time; a replacement
/// only affects operations started afterwards.
pub struct SharedConfigSource {
    current: ArcSwap<SudsConfig>,
}

impl SharedConfigSource {
    pub fn new(config: SudsConfig) -> Self {
        Self {
            current: ArcSwap::from_pointee(config),
        }
    }

    /// Validate and install a new configuration.
    ///
    /// On validation failure the previous configuration stays in place.
    pub fn replace(&self, config: SudsConfig) -> Result<(), ConfigError> {
        config.validate()?;
        info!(
            cache_enabled = config.cache.enabled,
            base_url = %config.suds.base_url,
            "SUDS configuration replaced"
        );
        self.current.store(Arc::new(config));
        Ok(())
    }

    /// Flip only the global cache switch.
    pub fn set_cache_enabled(&self, enabled: bool) {
        self.current.rcu(|cfg| {
            let mut next = SudsConfig::clone(cfg);
            next.cache.enabled = enabled;
            next
        });
        info!(cache_enabled = enabled, "SUDS cache switch changed");
    }
}

impl Default for SharedConfigSource {
    fn default() -> Self {
        Self::new(SudsConfig::default())
    }
}

impl ConfigSource for SharedConfigSource {
    fn name(&self) -> &str {
        "shared"
    }

    fn get(&self) -> Arc<SudsConfig> {
        self.current.load_full()
    }
}

impl std::fmt::Debug for SharedConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedConfigSource")
            .field("config", &*self.current.load())
            .finish()
    }
}
