//! Configuration management

use crate::error::{JukeboxError, Result};
use crate::types::Config;
use crate::utils::paths::{ensure_dir, get_config_dir, get_config_path};
use std::path::Path;
use tokio::fs;
use tokio::process::Command;

/// Load configuration from the default location
pub async fn load_config() -> Result<Config> {
    load_config_from(&get_config_path()).await
}

/// Load configuration from `path`; missing file or keys fall back to defaults
pub async fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path).await?;
    let config: Config = serde_json::from_str(&content)
        .map_err(|e| JukeboxError::InvalidConfig(format!("{}: {}", path.display(), e)))?;

    validate(&config)?;
    Ok(config)
}

/// Reject values the poll loop or client cannot work with
pub fn validate(config: &Config) -> Result<()> {
    if config.poll_interval_ms == 0 {
        return Err(JukeboxError::InvalidConfig(
            "poll_interval_ms must be greater than 0".into(),
        ));
    }
    if config.server_url.trim().is_empty() {
        return Err(JukeboxError::InvalidConfig("server_url is empty".into()));
    }
    Ok(())
}

/// Save configuration to file
pub async fn save_config(config: &Config) -> Result<()> {
    ensure_dir(&get_config_dir()).await?;
    let content = serde_json::to_string_pretty(config)?;
    fs::write(get_config_path(), content).await?;
    Ok(())
}

/// Open config file in editor
pub async fn edit_config(editor: &str) -> Result<()> {
    let config_path = get_config_path();

    // Ensure config file exists
    if !config_path.exists() {
        save_config(&Config::default()).await?;
    }

    Command::new(editor)
        .arg(&config_path)
        .status()
        .await
        .map_err(|e| JukeboxError::Spawn(format!("Failed to start {}: {}", editor, e)))?;

    Ok(())
}
