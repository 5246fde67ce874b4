//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::RelayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),

    #[error("invalid origin `{url}`: {reason}")]
    InvalidOrigin { url: String, reason: String },

    #[error("failed to build outbound client: {0}")]
    Client(String),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
///
/// The origin environment binding is applied before validation.
pub fn load_config(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from a TOML document.
pub fn parse_config(content: &str) -> Result<RelayConfig, ConfigError> {
    let mut config: RelayConfig = toml::from_str(content)?;
    config.apply_env();

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
