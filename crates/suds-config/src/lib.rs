//! Configuration for the SUDS access layer.
//!
//! This crate provides:
//! - [`SudsConfig`], the typed settings (cache switch, service address,
//!   endpoint paths, batching budget, HTTP timeout)
//! - a loader merging a TOML file with `SUDS__*` environment overrides
//! - [`ConfigSource`] implementations the gateway reads on every call
//!
//! # Priority
//!
//! ```text
//! defaults  <  suds.toml  <  SUDS__* environment  <  SharedConfigSource::replace
//! ```

pub mod loader;
pub mod settings;
pub mod sources;

// Re-export main types
pub use loader::{load_config, load_config_from_str};
pub use settings::{
    BatchingSettings, CacheSettings, EndpointsSettings, HttpSettings, LivefyreEndpoints,
    ServiceSettings, SudsConfig, UserEndpoints,
};
pub use sources::{ConfigSource, SharedConfigSource, StaticConfigSource};

/// Error types for configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl ConfigError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
