use std::fs;
use tracing::{debug, error, info};

use crate::types::client_config::{AppConfig, ConfigError};

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    info!("Loading configuration from: {}", path);

    let contents = fs::read_to_string(path)?;
    debug!("Processing file: {}", path);

    if contents.trim().is_empty() {
        error!("Configuration file is empty");
        return Err(ConfigError::InvalidConfig("empty file".into()));
    }

    let config: AppConfig = toml::from_str(&contents)?;

    info!("Configuration loaded successfully");
    debug!("Config: {:?}", config);

    validate_config(&config)?;

    info!("Config validated");

    Ok(config)
}

fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    let base_url = config.server.base_url.trim();

    if base_url.is_empty() {
        return Err(ConfigError::InvalidConfig("base_url cannot be empty".into()));
    }

    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ConfigError::InvalidConfig(
            "base_url must start with http:// or https://".into(),
        ));
    }

    // Paths are joined as `{base_url}{path}` with the path carrying the
    // leading slash, so a trailing slash here would produce `//`.
    if base_url.ends_with('/') {
        return Err(ConfigError::InvalidConfig(
            "base_url must not end with a trailing slash".into(),
        ));
    }

    if config.view.page_size == 0 {
        return Err(ConfigError::InvalidConfig(
            "page_size must be greater than 0".into(),
        ));
    }

    if config.uploads.max_bytes == 0 {
        return Err(ConfigError::InvalidConfig(
            "max_bytes must be greater than 0".into(),
        ));
    }

    if config.uploads.allowed_types.is_empty() {
        return Err(ConfigError::InvalidConfig(
            "allowed_types must list at least one MIME type".into(),
        ));
    }

    Ok(())
}
