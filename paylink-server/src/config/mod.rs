//! Configuration module for paylink-server.
//!
//! Handles loading configuration from the TOML file, CLI arguments,
//! and environment variables. The database URL deliberately lives in
//! the environment, not the file.

pub mod file;

use crate::config::file::FileConfig;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("DATABASE_URL environment variable not set")]
    MissingDatabaseUrl,
}

/// Load the configuration file and apply CLI overrides.
pub fn load_config(
    config_path: impl AsRef<Path>,
    listen_override: Option<SocketAddr>,
) -> Result<FileConfig, ConfigError> {
    let config_content = std::fs::read_to_string(config_path.as_ref())?;
    let mut config: FileConfig = toml::from_str(&config_content)?;

    if let Some(listen) = listen_override {
        config.server.listen = listen;
    }

    validate(&config)?;
    Ok(config)
}

fn validate(config: &FileConfig) -> Result<(), ConfigError> {
    if config.payment.link_base.cannot_be_a_base() {
        return Err(ConfigError::ValidationError(
            "payment.link_base must be an absolute http(s) URL".to_string(),
        ));
    }
    if config.rates.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "rates.timeout_secs must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

/// Get the database URL from the environment.
pub fn get_database_url() -> Result<String, ConfigError> {
    std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)
}
