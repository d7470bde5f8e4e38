//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::{GatewayConfig, RunMode};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub const ENV_MODE: &str = "GATEWAY_ENV";
pub const ENV_PRIMARY_URL: &str = "GATEWAY_PRIMARY_URL";
pub const ENV_SECONDARY_URL: &str = "GATEWAY_SECONDARY_URL";
pub const ENV_LOCAL_URL: &str = "GATEWAY_LOCAL_URL";
pub const ENV_BIND: &str = "GATEWAY_BIND";

/// Load configuration from an optional TOML file, apply environment
/// overrides, then validate.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => GatewayConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply `GATEWAY_*` overrides using `lookup` to read variables.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(ENV_MODE) {
        match RunMode::from_env_value(&value) {
            Some(mode) => config.mode = mode,
            None => tracing::warn!(value = %value, "Ignoring unknown {}", ENV_MODE),
        }
    }
    if let Some(url) = lookup(ENV_PRIMARY_URL) {
        config.upstreams.primary_url = url;
    }
    if let Some(url) = lookup(ENV_SECONDARY_URL) {
        config.upstreams.secondary_url = url;
    }
    if let Some(url) = lookup(ENV_LOCAL_URL) {
        config.upstreams.local_url = url;
    }
    if let Some(bind) = lookup(ENV_BIND) {
        config.listener.bind_address = bind;
    }
}
