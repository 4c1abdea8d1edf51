//! JetClock configuration system.
//!
//! TOML configuration with serde defaults for every section, so a partial
//! file (or none at all) yields a working kiosk setup.
//!
//! ```rust,no_run
//! use jetclock_config::load_config;
//!
//! let config = load_config(None).expect("failed to load config");
//! println!("{}", config.plugins.expose_base);
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

use std::path::Path;

pub use schema::{JetclockConfig, CONFIG_SCHEMA_VERSION};

use jetclock_common::ConfigError;

/// Load config from `path`, or from the platform default path when `None`.
///
/// The default path gets a commented template written on first run. The
/// result is validated before it is returned.
pub fn load_config(path: Option<&Path>) -> Result<JetclockConfig, ConfigError> {
    let config = match path {
        Some(p) => toml_loader::load_from_path(p)?,
        None => toml_loader::load_default()?,
    };
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &JetclockConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
