//! Configuration loading from disk.
//!
//! Loading is a four-step pipeline: read the file, parse the TOML,
//! apply environment overrides for the service-token secrets, validate.
//! Anything that fails here fails the process before it serves a request.

use std::fs;
use std::path::Path;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `service_token.client_id`.
pub const ENV_CLIENT_ID: &str = "GATE_PROXY_CLIENT_ID";

/// Environment variable overriding `service_token.client_secret`.
pub const ENV_CLIENT_SECRET: &str = "GATE_PROXY_CLIENT_SECRET";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
///
/// Service-token secrets may come from the environment instead of the file;
/// the environment wins when both are present.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let mut config: ProxyConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Replace the service-token secrets with their environment counterparts
/// when those are set and non-empty.
pub fn apply_env_overrides(config: &mut ProxyConfig) {
    if let Ok(client_id) = std::env::var(ENV_CLIENT_ID) {
        if !client_id.is_empty() {
            config.service_token.client_id = client_id;
        }
    }
    if let Ok(client_secret) = std::env::var(ENV_CLIENT_SECRET) {
        if !client_secret.is_empty() {
            config.service_token.client_secret = client_secret;
        }
    }
}
