//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{Environment, GatewayConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the shared secret.
pub const ENV_SECRET: &str = "APP_SECRET";
/// Environment variable selecting the runtime mode.
pub const ENV_MODE: &str = "APP_ENV";
/// Environment variable overriding the bind address.
pub const ENV_BIND_ADDRESS: &str = "APP_BIND_ADDRESS";
/// Environment variable overriding the upstream allow-list.
pub const ENV_ALLOWED_HOST: &str = "APP_ALLOWED_HOST";

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
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load, overlay the environment, and validate.
///
/// Without a path the built-in defaults are used as the base layer.
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

/// Overlay environment values onto a config.
///
/// `lookup` abstracts `std::env::var` so the overlay can be tested without
/// touching the process environment.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(secret) = lookup(ENV_SECRET) {
        config.auth.secret = Some(secret);
    }
    if let Some(mode) = lookup(ENV_MODE) {
        config.environment = Environment::from_env_value(&mode);
    }
    if let Some(addr) = lookup(ENV_BIND_ADDRESS) {
        config.listener.bind_address = addr;
    }
    if let Some(host) = lookup(ENV_ALLOWED_HOST) {
        config.upstream.allowed_host = host;
    }
}
