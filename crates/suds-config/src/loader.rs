//! Configuration loading.
//!
//! Layers, lowest priority first: built-in defaults, the TOML file, then
//! environment variables such as `SUDS__CACHE__ENABLED=true` or
//! `SUDS__SUDS__BASE_URL=https://suds.example.com`.

use config::{Config, Environment, File, FileFormat};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::{ConfigError, SudsConfig};

const DEFAULT_PATH: &str = "suds.toml";
const ENV_PREFIX: &str = "SUDS";

/// Load configuration from a TOML file (default `suds.toml`) plus `SUDS__*` overrides.
///
/// A missing file is not an error; defaults and environment still apply. A
/// file that exists but cannot be read is reported as [`ConfigError::Io`].
pub fn load_config(path: Option<&str>) -> Result<SudsConfig, ConfigError> {
    let pathbuf = PathBuf::from(path.unwrap_or(DEFAULT_PATH));
    if !pathbuf.exists() {
        debug!(path = ?pathbuf, "Config file does not exist, using defaults");
        return build(Config::builder());
    }
    let contents = fs::read_to_string(&pathbuf)?;
    load_config_from_str(&contents)
}

/// Load configuration from an in-memory TOML document plus `SUDS__*` overrides.
pub fn load_config_from_str(toml_str: &str) -> Result<SudsConfig, ConfigError> {
    let builder = Config::builder().add_source(File::from_str(toml_str, FileFormat::Toml));
    build(builder)
}

fn build(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<SudsConfig, ConfigError> {
    let cfg = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .separator("__"),
        )
        .build()
        .map_err(|e| ConfigError::parse(format!("config build error: {e}")))?;
    let merged: SudsConfig = cfg
        .try_deserialize()
        .map_err(|e| ConfigError::parse(format!("config deserialize error: {e}")))?;
    merged.validate()?;
    Ok(merged)
}
