mod types;
mod validate;

pub use types::*;
pub use validate::validate;

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable that points at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "SCHEMA_RECOVERY_CONFIG";

pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".schema_recovery"))
        .unwrap_or_else(|| PathBuf::from(".schema_recovery"))
}

pub fn config_path() -> PathBuf {
    match std::env::var_os(CONFIG_PATH_ENV) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => config_dir().join("config.toml"),
    }
}

pub fn load() -> Result<RecoveryConfig> {
    load_from(&config_path())
}

pub fn load_from(path: &Path) -> Result<RecoveryConfig> {
    if !path.exists() {
        debug!("Config file not found at {:?}, using defaults", path);
        return Ok(RecoveryConfig::default());
    }

    info!("Loading configuration from {:?}", path);
    let contents = fs::read_to_string(path)?;
    let config: RecoveryConfig = toml::from_str(&contents)?;
    Ok(config)
}

pub fn save(config: &RecoveryConfig) -> Result<()> {
    save_to(config, &config_path())
}

pub fn save_to(config: &RecoveryConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            info!("Creating config directory: {:?}", parent);
            fs::create_dir_all(parent)?;
        }
    }

    let contents = toml::to_string_pretty(config)?;
    fs::write(path, contents)?;
    info!("Configuration saved to {:?}", path);
    Ok(())
}

pub fn exists() -> bool {
    config_path().exists()
}
