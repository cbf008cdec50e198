//! Parley configuration system.
//!
//! Provides TOML-based configuration with full validation. All config
//! sections use sensible defaults so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use parley_config::{load_config, config_to_json};
//!
//! let config = load_config(None).expect("failed to load config");
//! let json = config_to_json(&config);
//! println!("{json}");
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{ParleyConfig, CONFIG_SCHEMA_VERSION};

use std::path::Path;

use parley_common::ConfigError;

/// Environment variable that overrides `backend.endpoint`.
pub const BACKEND_URL_ENV: &str = "PARLEY_BACKEND_URL";

/// Load, override and validate the config.
///
/// With `path` set, that file must exist. Otherwise `config.toml` is read
/// from the OS config directory, and a documented default is created if
/// none exists yet.
pub fn load_config(path: Option<&Path>) -> Result<ParleyConfig, ConfigError> {
    let config = load_with_env(path)?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load the config and apply environment overrides without validating,
/// for callers that layer further overrides on top and validate once at
/// the end.
pub fn load_with_env(path: Option<&Path>) -> Result<ParleyConfig, ConfigError> {
    let mut config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Apply environment overrides using `lookup` to resolve variables.
pub fn apply_env_overrides<F>(config: &mut ParleyConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(BACKEND_URL_ENV).filter(|u| !u.trim().is_empty()) {
        tracing::info!("backend endpoint overridden by {BACKEND_URL_ENV}");
        config.backend.endpoint = url.trim().to_string();
    }
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &ParleyConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
